//! Interactive side of the microtome print volume viewer
//!
//! This crate turns pointer input into selections and drives the frame loop:
//! - Perspective camera and pixel-to-ray conversion
//! - Pick gesture state machine with selection highlighting and readouts
//! - winit pointer adapter and orbit navigation
//! - Render loop over pluggable backend, scheduler and navigator traits
//! - Lighting configuration and shader sources

pub mod camera;
pub mod input;
pub mod lighting;
pub mod navigation;
pub mod picking;
pub mod renderer;
pub mod shaders;
pub mod viewer;

pub use camera::*;
pub use input::*;
pub use lighting::*;
pub use navigation::*;
pub use picking::*;
pub use renderer::*;
pub use viewer::*;

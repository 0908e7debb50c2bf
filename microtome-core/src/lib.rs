//! Core data structures for microtome
//!
//! This crate models the geometry side of a 3D printer build-volume viewer:
//! - The build volume and its bounding box
//! - Printable meshes with construction-time volume integration
//! - The print scene with overhang-angle propagation
//! - Rays and ray/mesh intersection for picking

pub mod point;
pub mod bounds;
pub mod ray;
pub mod transform;
pub mod mesh;
pub mod material;
pub mod printable;
pub mod volume;
pub mod scene;
pub mod config;
pub mod traits;
pub mod error;

pub use point::*;
pub use bounds::*;
pub use ray::*;
pub use transform::*;
pub use mesh::*;
pub use material::*;
pub use printable::*;
pub use volume::*;
pub use scene::*;
pub use config::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};

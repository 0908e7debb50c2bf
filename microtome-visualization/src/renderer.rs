//! Seams between the view and the platform: drawing, frame scheduling and
//! camera navigation

use microtome_core::{BoundingBox, PrintScene, Result};

use crate::camera::Camera;
use crate::lighting::Lighting;

/// Token identifying one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// A surface the scene can be drawn onto
pub trait RenderBackend {
    /// Size the surface is displayed at, in device pixels
    fn display_size(&self) -> (u32, u32);

    /// Size of the drawing buffer, in device pixels
    fn buffer_size(&self) -> (u32, u32);

    /// Resize the drawing buffer
    fn resize_buffer(&mut self, width: u32, height: u32);

    /// Draw one frame
    fn draw(&mut self, scene: &PrintScene, camera: &Camera, lighting: &Lighting) -> Result<()>;
}

/// Source of "next frame" callbacks
pub trait FrameScheduler {
    /// Schedule a callback for the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a scheduled callback. Cancelling a handle that already fired or
    /// was never issued must be harmless.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Interactive camera controls (orbit, pan, zoom) owned by the platform layer
pub trait CameraNavigator {
    /// Take control of a camera
    fn attach(&mut self, camera: &mut Camera);

    /// Region the navigator orbits around and frames
    fn set_target(&mut self, target: BoundingBox);

    /// Move the camera so the whole target is in view
    fn frame_target(&mut self, camera: &mut Camera);

    fn set_enabled(&mut self, enabled: bool);
}

//! Perspective camera and pointer-to-ray conversion

use microtome_core::Ray;
use nalgebra::{Matrix4, Perspective3, Point2, Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Size of the drawing surface in CSS/logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

impl CanvasBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Convert canvas-relative pixel coordinates to normalized device coordinates.
///
/// The top-left pixel maps to (-1, 1) and the bottom-right to (1, -1).
pub fn ndc_from_pixels(px: f32, py: f32, bounds: &CanvasBounds) -> Point2<f32> {
    let x = (px / bounds.width) * 2.0 - 1.0;
    let y = -(py / bounds.height) * 2.0 + 1.0;
    Point2::new(x, y)
}

/// Initial camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 37.0,
            near: 1.0,
            far: 2000.0,
            position: [0.0, 350.0, 250.0],
            up: [0.0, 0.0, 1.0],
        }
    }
}

/// A perspective camera for viewing the print volume
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    projection: Matrix4<f32>,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Camera at the configured placement, looking at the origin
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self::new(
            Point3::from(config.position),
            Point3::origin(),
            Vector3::from(config.up),
            config.fov_degrees.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        )
    }

    /// Recompute the cached projection after changing fov, aspect or clip planes
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far).into_inner();
    }

    /// Set the aspect ratio and refresh the projection
    pub fn set_aspect(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.update_projection_matrix();
    }

    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    pub fn set_up(&mut self, up: Vector3<f32>) {
        self.up = up;
    }

    /// Orient the camera towards a world-space point
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    /// Build a world-space pick ray through a point in normalized device
    /// coordinates.
    ///
    /// The ray starts at the eye and has unit direction. Returns None when the
    /// view-projection cannot be inverted (degenerate camera setup) or the
    /// coordinates are not finite.
    pub fn ray_from_ndc(&self, ndc: &Point2<f32>) -> Option<Ray> {
        if !ndc.x.is_finite() || !ndc.y.is_finite() {
            return None;
        }
        let inverse = self.view_projection().try_inverse()?;
        let far = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 1.0));
        let direction = (far - self.position).try_normalize(f32::EPSILON)?;
        Some(Ray::new(self.position, direction))
    }

    /// Move the camera forward
    pub fn move_forward(&mut self, distance: f32) {
        let direction = (self.target - self.position).normalize();
        self.position += direction * distance;
        self.target += direction * distance;
    }

    /// Orbit around the target: `horizontal` radians about the up axis,
    /// `vertical` radians about the camera's right axis
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        let offset = self.position - self.target;
        let Some(up) = self.up.try_normalize(f32::EPSILON) else {
            return;
        };
        let yaw = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(up), horizontal);
        let offset = yaw * offset;

        // Elevation is clamped short of the poles so the view never flips over
        let limit = std::f32::consts::FRAC_PI_2 - 0.01;
        let elevation = match offset.try_normalize(f32::EPSILON) {
            Some(dir) => dir.dot(&up).clamp(-1.0, 1.0).asin(),
            None => return,
        };
        let pitch = (elevation + vertical).clamp(-limit, limit) - elevation;

        let right = offset.cross(&up);
        let offset = match Unit::try_new(right, f32::EPSILON) {
            Some(axis) => UnitQuaternion::from_axis_angle(&axis, pitch) * offset,
            None => offset,
        };
        self.position = self.target + offset;
    }

    /// Move towards (positive) or away from the target by a fraction of the
    /// current distance
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let factor = (1.0 - amount).max(0.05);
        self.position = self.target + offset * factor;
    }

    /// Distance from the eye that fits a sphere of `radius` in the vertical
    /// and horizontal field of view
    pub fn framing_distance(&self, radius: f32) -> f32 {
        let half_v = self.fov / 2.0;
        let half_h = (half_v.tan() * self.aspect_ratio).atan();
        radius / half_v.min(half_h).sin()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 1.0)
    }
}

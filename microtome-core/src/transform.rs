//! Object transforms: translation, Euler rotation and non-uniform scale

use crate::point::*;
use nalgebra::{Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Live placement of a print object in the scene.
///
/// The model matrix is `T * Rx * Ry * Rz * S` (Euler angles applied in X, Y, Z
/// order, in radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectTransform {
    pub position: Vector3f,
    pub rotation: Vector3f,
    pub scale: Vector3f,
}

impl ObjectTransform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Identity transform moved to `position`
    pub fn from_position(position: Vector3f) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Rotation part as a rotation matrix
    pub fn rotation_matrix(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.rotation.x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.rotation.z)
    }

    /// Model matrix mapping object space to world space
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * self.rotation_matrix().to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// World-to-object matrix, or None when a scale factor is zero
    pub fn inverse_matrix(&self) -> Option<Matrix4<f32>> {
        if self.scale.iter().any(|s| *s == 0.0) {
            return None;
        }
        let inv_scale = self.scale.map(|s| 1.0 / s);
        Some(
            Matrix4::new_nonuniform_scaling(&inv_scale)
                * self.rotation_matrix().inverse().to_homogeneous()
                * Matrix4::new_translation(&-self.position),
        )
    }

    /// Product of the three scale factors, the factor applied to enclosed volume
    pub fn scale_product(&self) -> f32 {
        self.scale.x * self.scale.y * self.scale.z
    }

    /// Apply the transform to a point
    pub fn transform_point(&self, point: &Point3f) -> Point3f {
        self.matrix().transform_point(point)
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::identity()
    }
}

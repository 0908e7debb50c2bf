//! Rays and ray intersection primitives

use crate::bounds::BoundingBox;
use crate::point::*;
use crate::printable::MeshId;
use nalgebra::Matrix4;

/// A ray `origin + t * direction`.
///
/// `direction` is not required to be unit length; intersection distances are
/// always expressed in units of the ray parameter `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Vector3f,
}

impl Ray {
    pub fn new(origin: Point3f, direction: Vector3f) -> Self {
        Self { origin, direction }
    }

    /// Point along the ray at parameter `t`
    pub fn at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// Map the ray through an affine transform.
    ///
    /// The direction is not renormalised, so a parameter `t` refers to the same
    /// physical point before and after the transform.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        Self {
            origin: matrix.transform_point(&self.origin),
            direction: matrix.transform_vector(&self.direction),
        }
    }
}

/// A hit between a pick ray and a print object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Object that was hit
    pub object: MeshId,
    /// Ray parameter of the hit
    pub distance: f32,
    /// World-space hit point
    pub point: Point3f,
}

/// Ray/AABB intersection using the slab method.
/// Returns the ray parameter of the entry point (or exit point when the origin
/// is inside the box), or None.
///
/// A ray parallel to a slab hits only if its origin lies within that slab,
/// faces included, so a ray grazing a face counts as a hit.
pub fn ray_aabb(ray: &Ray, aabb: &BoundingBox) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let (min, max) = (aabb.min[axis], aabb.max[axis]);
        let dir = ray.direction[axis];

        if dir == 0.0 {
            if origin < min || origin > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (min - origin) * inv;
        let t2 = (max - origin) * inv;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }

    if tmax.is_nan() || tmin.is_nan() || tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray/triangle intersection, double sided.
/// Returns the ray parameter of the hit, or None.
pub fn ray_triangle(ray: &Ray, v0: &Point3f, v1: &Point3f, v2: &Point3f) -> Option<f32> {
    const EPSILON: f32 = 1e-9;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Parallel to the triangle plane
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

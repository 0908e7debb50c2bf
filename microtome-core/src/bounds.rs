//! Axis-aligned bounding boxes

use crate::point::*;
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3f,
    pub max: Point3f,
}

impl BoundingBox {
    /// Create a bounding box from its two corners
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    /// Compute the tightest box around a set of points.
    ///
    /// An empty slice yields a degenerate box at the origin.
    pub fn from_points(points: &[Point3f]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Point3f::origin(), Point3f::origin());
        };

        let mut min = *first;
        let mut max = *first;

        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);

            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }

        Self { min, max }
    }

    /// Center of the box
    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }

    /// Edge lengths along X, Y and Z
    pub fn size(&self) -> Vector3f {
        self.max - self.min
    }

    /// Check whether a point lies inside or on the box
    pub fn contains_point(&self, p: &Point3f) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// Check whether another box lies entirely inside this one
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Point3f; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3f::new(a.x, a.y, a.z),
            Point3f::new(b.x, a.y, a.z),
            Point3f::new(a.x, b.y, a.z),
            Point3f::new(b.x, b.y, a.z),
            Point3f::new(a.x, a.y, b.z),
            Point3f::new(b.x, a.y, b.z),
            Point3f::new(a.x, b.y, b.z),
            Point3f::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box enclosing this box after an affine transform
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point(&c));
        Self::from_points(&corners)
    }
}

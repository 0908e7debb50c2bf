//! The printable build volume
//!
//! All dimensions are in millimetres. The volume sits on the XY plane with its
//! bed centred on the origin and extends upward along +Z. Guide lines are
//! coloured by axis (R-G-B for X-Y-Z).

use crate::bounds::BoundingBox;
use crate::config::PrintVolume;
use crate::point::*;
use crate::{Error, Result};

/// Axis a guide line runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A single boundary segment of the build volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub axis: Axis,
    pub start: Point3f,
    pub end: Point3f,
}

/// Unit-cube line templates as endpoint pairs, scaled by the volume dimensions
const X_LINES: [[f32; 3]; 4] = [
    [-0.5, 0.5, 0.0],
    [0.5, 0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [0.5, -0.5, 0.0],
];
const Y_LINES: [[f32; 3]; 4] = [
    [0.5, 0.5, 0.0],
    [0.5, -0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [-0.5, 0.5, 0.0],
];
const Z_LINES: [[f32; 3]; 4] = [
    [0.5, 0.5, 0.0],
    [0.5, 0.5, 1.0],
    [-0.5, 0.5, 0.0],
    [-0.5, 0.5, 1.0],
];

/// A resizable rectangular build envelope
#[derive(Debug, Clone, PartialEq)]
pub struct BuildVolume {
    width: f32,
    depth: f32,
    height: f32,
    bbox: BoundingBox,
}

impl BuildVolume {
    /// Create a build volume, validating the dimensions
    pub fn new(width: f32, depth: f32, height: f32) -> Result<Self> {
        validate(width, depth, height)?;
        Ok(Self {
            width,
            depth,
            height,
            bbox: compute_bbox(width, depth, height),
        })
    }

    /// Create a build volume from a volume descriptor
    pub fn from_volume(volume: &PrintVolume) -> Result<Self> {
        Self::new(volume.width_mm, volume.depth_mm, volume.height_mm)
    }

    /// Resize to new dimensions.
    ///
    /// Rejects non-finite or non-positive dimensions, leaving the volume as it
    /// was. On success the bounding box is replaced before returning.
    pub fn resize_by_dimensions(&mut self, width: f32, depth: f32, height: f32) -> Result<()> {
        validate(width, depth, height)?;
        self.width = width;
        self.depth = depth;
        self.height = height;
        self.bbox = compute_bbox(width, depth, height);
        tracing::debug!(width, depth, height, "resized build volume");
        Ok(())
    }

    /// Resize from a volume descriptor
    pub fn resize_by_volume(&mut self, volume: &PrintVolume) -> Result<()> {
        self.resize_by_dimensions(volume.width_mm, volume.depth_mm, volume.height_mm)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Current dimensions as a descriptor
    pub fn dimensions(&self) -> PrintVolume {
        PrintVolume::new(self.width, self.depth, self.height)
    }

    /// Scene position of the volume (the centre of the bed)
    pub fn position(&self) -> Point3f {
        Point3f::origin()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Corners of the bed plane at z = 0, counter-clockwise seen from above
    pub fn bed_quad(&self) -> [Point3f; 4] {
        let (hw, hd) = (self.width / 2.0, self.depth / 2.0);
        [
            Point3f::new(-hw, -hd, 0.0),
            Point3f::new(hw, -hd, 0.0),
            Point3f::new(hw, hd, 0.0),
            Point3f::new(-hw, hd, 0.0),
        ]
    }

    /// The twelve boundary edges of the volume, in millimetres
    pub fn guide_lines(&self) -> Vec<GuideLine> {
        let mut lines = Vec::with_capacity(12);
        self.push_line_set(&mut lines, Axis::X, &X_LINES, [0.0, 0.0, 0.0]);
        self.push_line_set(&mut lines, Axis::X, &X_LINES, [0.0, 0.0, 1.0]);
        self.push_line_set(&mut lines, Axis::Y, &Y_LINES, [0.0, 0.0, 0.0]);
        self.push_line_set(&mut lines, Axis::Y, &Y_LINES, [0.0, 0.0, 1.0]);
        self.push_line_set(&mut lines, Axis::Z, &Z_LINES, [0.0, 0.0, 0.0]);
        self.push_line_set(&mut lines, Axis::Z, &Z_LINES, [0.0, -1.0, 0.0]);
        lines
    }

    fn push_line_set(
        &self,
        lines: &mut Vec<GuideLine>,
        axis: Axis,
        template: &[[f32; 3]; 4],
        offset: [f32; 3],
    ) {
        let scale = |p: &[f32; 3]| {
            Point3f::new(
                (p[0] + offset[0]) * self.width,
                (p[1] + offset[1]) * self.depth,
                (p[2] + offset[2]) * self.height,
            )
        };
        for pair in template.chunks_exact(2) {
            lines.push(GuideLine {
                axis,
                start: scale(&pair[0]),
                end: scale(&pair[1]),
            });
        }
    }
}

impl Default for BuildVolume {
    fn default() -> Self {
        let volume = PrintVolume::default();
        Self {
            width: volume.width_mm,
            depth: volume.depth_mm,
            height: volume.height_mm,
            bbox: compute_bbox(volume.width_mm, volume.depth_mm, volume.height_mm),
        }
    }
}

fn validate(width: f32, depth: f32, height: f32) -> Result<()> {
    for (axis, value) in [("width", width), ("depth", depth), ("height", height)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidDimension { axis, value });
        }
    }
    Ok(())
}

fn compute_bbox(width: f32, depth: f32, height: f32) -> BoundingBox {
    let half_width = width / 2.0;
    let half_depth = depth / 2.0;
    BoundingBox::new(
        Point3f::new(-half_width, -half_depth, 0.0),
        Point3f::new(half_width, half_depth, height),
    )
}

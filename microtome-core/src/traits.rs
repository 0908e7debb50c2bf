//! Core traits for microtome

use crate::{bounds::BoundingBox, mesh::*, point::*, printable::PrintableMesh, volume::BuildVolume};

/// Trait for objects with a spatial extent
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> BoundingBox;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        self.bounding_box().center()
    }
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> BoundingBox {
        TriangleMesh::bounding_box(self)
    }
}

impl Drawable for PrintableMesh {
    /// World-space extent under the current transform
    fn bounding_box(&self) -> BoundingBox {
        self.world_bounding_box()
    }
}

impl Drawable for BuildVolume {
    fn bounding_box(&self) -> BoundingBox {
        BuildVolume::bounding_box(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_volume_center_is_mid_height() {
        let volume = BuildVolume::new(100.0, 80.0, 60.0).unwrap();
        assert_eq!(Drawable::center(&volume), Point3f::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn test_printable_mesh_extent_is_world_space() {
        let mut mesh = PrintableMesh::from_geometry(TriangleMesh::cuboid(2.0, 2.0, 2.0));
        mesh.transform.position = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(Drawable::bounding_box(&mesh).min.z, 0.0);
    }
}

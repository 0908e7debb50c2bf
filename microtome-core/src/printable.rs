//! Printable meshes: geometry, live transform, materials and volume

use std::fmt;

use crate::bounds::BoundingBox;
use crate::material::{layered_groups, MaterialGroup, MeshMaterials, SurfaceMaterial};
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::ray::{ray_aabb, ray_triangle, Ray};
use crate::transform::ObjectTransform;
use crate::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a print object within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(Uuid);

impl MeshId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A printable object: immutable geometry placed by a mutable transform.
///
/// The enclosed volume of the untransformed geometry is integrated once at
/// construction; [`PrintableMesh::volume`] only rescales it.
#[derive(Debug, Clone)]
pub struct PrintableMesh {
    id: MeshId,
    geometry: TriangleMesh,
    local_bounds: BoundingBox,
    raw_volume: f64,
    groups: [MaterialGroup; 2],
    pub transform: ObjectTransform,
    pub materials: MeshMaterials,
}

impl PrintableMesh {
    /// Wrap an already indexed geometry
    pub fn from_geometry(geometry: TriangleMesh) -> Self {
        let raw_volume = geometry.signed_volume();
        let local_bounds = geometry.bounding_box();
        let groups = layered_groups(geometry.face_count());
        let id = MeshId::new();
        tracing::debug!(
            %id,
            faces = geometry.face_count(),
            raw_volume,
            "created printable mesh"
        );
        Self {
            id,
            geometry,
            local_bounds,
            raw_volume,
            groups,
            transform: ObjectTransform::identity(),
            materials: MeshMaterials::default(),
        }
    }

    /// Build from a vertex list and an indexed face list
    pub fn from_indexed_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Result<Self> {
        Ok(Self::from_geometry(TriangleMesh::from_indexed_faces(vertices, faces)?))
    }

    /// Build from a flat vertex buffer with implicit faces
    pub fn from_flat_vertices(buffer: &[f32]) -> Result<Self> {
        Ok(Self::from_geometry(TriangleMesh::from_flat_vertices(buffer)?))
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    /// The untransformed geometry
    pub fn geometry(&self) -> &TriangleMesh {
        &self.geometry
    }

    /// Face groups, one per material layer
    pub fn groups(&self) -> &[MaterialGroup; 2] {
        &self.groups
    }

    /// Signed volume of the untransformed geometry, in mm³
    pub fn raw_volume(&self) -> f64 {
        self.raw_volume
    }

    /// Volume under the current scale, in mm³
    pub fn volume(&self) -> f64 {
        self.raw_volume * self.transform.scale_product() as f64
    }

    /// Bounding box of the untransformed geometry
    pub fn bounding_box(&self) -> BoundingBox {
        self.local_bounds
    }

    /// World-space box around the transformed geometry
    pub fn world_bounding_box(&self) -> BoundingBox {
        self.local_bounds.transformed(&self.transform.matrix())
    }

    pub fn is_selected(&self) -> bool {
        self.materials.is_selected()
    }

    /// Swap between the selection highlight and the layered object materials
    pub fn set_selected(&mut self, selected: bool) {
        self.materials.surface = if selected {
            SurfaceMaterial::Selected
        } else {
            SurfaceMaterial::Layered
        };
    }

    /// Set the overhang shader's threshold uniform from an angle in radians
    pub fn apply_overhang_angle(&mut self, angle_rad: f32) {
        self.materials.overhang.cos_angle_rad = angle_rad.cos();
    }

    /// Nearest intersection of a world-space ray with the transformed surface.
    ///
    /// Returns the ray parameter of the hit. Faces are hit from either side.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inverse = self.transform.inverse_matrix()?;
        let local = ray.transformed(&inverse);

        ray_aabb(&local, &self.local_bounds)?;

        self.geometry
            .triangles()
            .filter_map(|[a, b, c]| ray_triangle(&local, a, b, c))
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Format a volume in mm³ as cm³ with one decimal place
pub fn format_volume(volume_mm3: f64) -> String {
    format!("{:.1}", volume_mm3 / 1000.0)
}

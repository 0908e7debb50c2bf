//! Triangle mesh geometry

use crate::bounds::BoundingBox;
use crate::point::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of floats describing one triangle in a flat vertex buffer
pub const FLOATS_PER_TRIANGLE: usize = 9;

/// An indexed triangle mesh, the canonical geometry representation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from a vertex list and an indexed face list.
    ///
    /// Every face index must refer to an existing vertex.
    pub fn from_indexed_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if let Some((face_idx, face)) = faces
            .iter()
            .enumerate()
            .find(|(_, f)| f.iter().any(|&i| i >= vertices.len()))
        {
            return Err(Error::InvalidData(format!(
                "face {} references vertex {:?} but mesh has {} vertices",
                face_idx,
                face,
                vertices.len()
            )));
        }
        Ok(Self { vertices, faces })
    }

    /// Create a mesh from a flat vertex buffer.
    ///
    /// Every nine floats describe one triangle (`x1 y1 z1 x2 y2 z2 x3 y3 z3`);
    /// faces are implicit and vertices are not shared between triangles.
    pub fn from_flat_vertices(buffer: &[f32]) -> Result<Self> {
        let triangles: &[[f32; FLOATS_PER_TRIANGLE]] =
            bytemuck::try_cast_slice(buffer).map_err(|_| {
                Error::InvalidData(format!(
                    "flat vertex buffer length {} is not a multiple of {}",
                    buffer.len(),
                    FLOATS_PER_TRIANGLE
                ))
            })?;

        let mut mesh = Self {
            vertices: Vec::with_capacity(triangles.len() * 3),
            faces: Vec::with_capacity(triangles.len()),
        };
        for tri in triangles {
            let base = mesh.vertices.len();
            mesh.vertices.push(Point3f::new(tri[0], tri[1], tri[2]));
            mesh.vertices.push(Point3f::new(tri[3], tri[4], tri[5]));
            mesh.vertices.push(Point3f::new(tri[6], tri[7], tri[8]));
            mesh.faces.push([base, base + 1, base + 2]);
        }
        Ok(mesh)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Iterate over the corner positions of every face
    pub fn triangles(&self) -> impl Iterator<Item = [&Point3f; 3]> + '_ {
        self.faces
            .iter()
            .map(|f| [&self.vertices[f[0]], &self.vertices[f[1]], &self.vertices[f[2]]])
    }

    /// Signed volume enclosed by the surface, about the origin.
    ///
    /// Sums the signed tetrahedra spanned by the origin and each face. A closed,
    /// outward-wound surface gives a positive result; open or self-intersecting
    /// surfaces give an undefined value.
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0_f64;
        for [v1, v2, v3] in self.triangles() {
            let (x1, y1, z1) = (v1.x as f64, v1.y as f64, v1.z as f64);
            let (x2, y2, z2) = (v2.x as f64, v2.y as f64, v2.z as f64);
            let (x3, y3, z3) = (v3.x as f64, v3.y as f64, v3.z as f64);
            volume += (-(x3 * y2 * z1) + (x2 * y3 * z1) + (x3 * y1 * z2)
                - (x1 * y3 * z2)
                - (x2 * y1 * z3)
                + (x1 * y2 * z3))
                / 6.0;
        }
        volume
    }

    /// Calculate face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.triangles()
            .map(|[v0, v1, v2]| (v1 - v0).cross(&(v2 - v0)).normalize())
            .collect()
    }

    /// Bounding box of the vertices
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Build an axis-aligned, outward-wound box centred at the origin.
    pub fn cuboid(width: f32, depth: f32, height: f32) -> Self {
        let (hx, hy, hz) = (width / 2.0, depth / 2.0, height / 2.0);
        let vertices = vec![
            Point3f::new(-hx, -hy, -hz),
            Point3f::new(hx, -hy, -hz),
            Point3f::new(hx, hy, -hz),
            Point3f::new(-hx, hy, -hz),
            Point3f::new(-hx, -hy, hz),
            Point3f::new(hx, -hy, hz),
            Point3f::new(hx, hy, hz),
            Point3f::new(-hx, hy, hz),
        ];
        let faces = vec![
            // bottom (-z)
            [0, 2, 1],
            [0, 3, 2],
            // top (+z)
            [4, 5, 6],
            [4, 6, 7],
            // front (-y)
            [0, 1, 5],
            [0, 5, 4],
            // back (+y)
            [3, 7, 6],
            [3, 6, 2],
            // left (-x)
            [0, 4, 7],
            [0, 7, 3],
            // right (+x)
            [1, 2, 6],
            [1, 6, 5],
        ];
        Self { vertices, faces }
    }

    /// Flatten into a non-indexed vertex buffer (nine floats per face)
    pub fn to_flat_vertices(&self) -> Vec<f32> {
        self.triangles()
            .flat_map(|[a, b, c]| [a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z])
            .collect()
    }
}

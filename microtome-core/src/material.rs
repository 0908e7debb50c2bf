//! Material bindings for print objects
//!
//! The shading itself belongs to the render backend; this module only tracks
//! which predefined material variants a mesh is drawn with and the value of the
//! overhang shader's threshold uniform.

use serde::{Deserialize, Serialize};

/// Predefined material variants understood by the render backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Default shading for print objects
    Object,
    /// Highlight used for the current selection
    Selected,
    /// Overhang shader flagging faces that need supports
    Overhang,
}

/// Uniform block of the overhang shader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverhangMaterial {
    /// Cosine of the overhang threshold angle
    pub cos_angle_rad: f32,
}

impl Default for OverhangMaterial {
    fn default() -> Self {
        // An angle of zero
        Self { cos_angle_rad: 1.0 }
    }
}

/// Material bound to the primary face group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceMaterial {
    /// Object shading layered with the overhang shader
    Layered,
    /// Selection highlight replacing both layers
    Selected,
}

/// A range of faces drawn with one entry of the material list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialGroup {
    pub start: usize,
    pub count: usize,
    pub material_index: usize,
}

/// The material state of one print object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshMaterials {
    pub surface: SurfaceMaterial,
    pub overhang: OverhangMaterial,
}

impl MeshMaterials {
    /// Material list the backend should draw with, in group order
    pub fn layers(&self) -> Vec<MaterialKind> {
        match self.surface {
            SurfaceMaterial::Layered => vec![MaterialKind::Object, MaterialKind::Overhang],
            SurfaceMaterial::Selected => vec![MaterialKind::Selected],
        }
    }

    pub fn is_selected(&self) -> bool {
        self.surface == SurfaceMaterial::Selected
    }
}

impl Default for MeshMaterials {
    fn default() -> Self {
        Self {
            surface: SurfaceMaterial::Layered,
            overhang: OverhangMaterial::default(),
        }
    }
}

/// Two groups covering every face, one per layer, so both materials render the
/// whole mesh on top of each other.
pub fn layered_groups(face_count: usize) -> [MaterialGroup; 2] {
    [
        MaterialGroup {
            start: 0,
            count: face_count,
            material_index: 0,
        },
        MaterialGroup {
            start: 0,
            count: face_count,
            material_index: 1,
        },
    ]
}

//! Shader sources and uniform layouts for the print volume view

use bytemuck::{Pod, Zeroable};
use microtome_core::{MaterialKind, OverhangMaterial};
use nalgebra::Matrix4;

use crate::lighting::Lighting;

/// Name of the overhang shader's threshold uniform
pub const OVERHANG_COS_UNIFORM: &str = "cosAngleRad";

/// Vertex shader shared by all print object materials
pub const OBJECT_VERTEX_SHADER: &str = r#"
#version 450

layout(location = 0) in vec3 position;
layout(location = 1) in vec3 normal;

layout(set = 0, binding = 0) uniform Transforms {
    mat4 view_proj;
    mat4 model;
};

layout(location = 0) out vec3 v_normal;

void main() {
    gl_Position = view_proj * model * vec4(position, 1.0);
    v_normal = mat3(transpose(inverse(model))) * normal;
}
"#;

/// Hemisphere-lit object shading
pub const OBJECT_FRAGMENT_SHADER: &str = r#"
#version 450

layout(location = 0) in vec3 v_normal;

layout(set = 1, binding = 0) uniform Lights {
    vec4 scatter_color;
    vec4 sky_color;
    vec4 ground_color;
};

layout(set = 2, binding = 0) uniform Surface {
    vec4 base_color;
};

layout(location = 0) out vec4 f_color;

void main() {
    float up = normalize(v_normal).z;
    vec3 sky = sky_color.rgb * sky_color.a * max(up, 0.0);
    vec3 ground = ground_color.rgb * ground_color.a * max(-up, 0.0);
    vec3 light = scatter_color.rgb * scatter_color.a + sky + ground;
    f_color = vec4(base_color.rgb * light, base_color.a);
}
"#;

/// Vertex shader of the overhang layer
pub const OVERHANG_VERTEX_SHADER: &str = r#"
#version 450

layout(location = 0) in vec3 position;
layout(location = 1) in vec3 normal;

layout(set = 0, binding = 0) uniform Transforms {
    mat4 view_proj;
    mat4 model;
};

layout(location = 0) out vec3 v_world_normal;

void main() {
    gl_Position = view_proj * model * vec4(position, 1.0);
    v_world_normal = normalize(mat3(transpose(inverse(model))) * normal);
}
"#;

/// Paints faces whose downward tilt exceeds the overhang angle, discards the rest
pub const OVERHANG_FRAGMENT_SHADER: &str = r#"
#version 450

layout(location = 0) in vec3 v_world_normal;

layout(set = 3, binding = 0) uniform Overhang {
    float cosAngleRad;
    vec3 overhangColor;
};

layout(location = 0) out vec4 f_color;

void main() {
    float downward = dot(normalize(v_world_normal), vec3(0.0, 0.0, -1.0));
    if (downward < cosAngleRad) {
        discard;
    }
    f_color = vec4(overhangColor, 1.0);
}
"#;

/// Base colour of unselected print objects
pub const OBJECT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
/// Base colour of the selection highlight
pub const SELECTED_COLOR: [f32; 4] = [0.35, 0.6, 1.0, 1.0];
/// Colour painted on overhanging faces
pub const OVERHANG_COLOR: [f32; 3] = [1.0, 0.2, 0.2];

/// Vertex and fragment source of one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

/// Shader pair implementing a material variant
pub fn shader_for(kind: MaterialKind) -> ShaderSource {
    match kind {
        MaterialKind::Object | MaterialKind::Selected => ShaderSource {
            vertex: OBJECT_VERTEX_SHADER,
            fragment: OBJECT_FRAGMENT_SHADER,
        },
        MaterialKind::Overhang => ShaderSource {
            vertex: OVERHANG_VERTEX_SHADER,
            fragment: OVERHANG_FRAGMENT_SHADER,
        },
    }
}

/// Base colour of the object shader for a surface material; None for the
/// overhang layer, which carries its own colour
pub fn base_color(kind: MaterialKind) -> Option<[f32; 4]> {
    match kind {
        MaterialKind::Object => Some(OBJECT_COLOR),
        MaterialKind::Selected => Some(SELECTED_COLOR),
        MaterialKind::Overhang => None,
    }
}

/// Per-object transform uniforms
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TransformUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(view_proj: &Matrix4<f32>, model: &Matrix4<f32>) -> Self {
        Self {
            view_proj: (*view_proj).into(),
            model: (*model).into(),
        }
    }
}

/// Light colours with the intensity stored in alpha
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightsUniform {
    pub scatter_color: [f32; 4],
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
}

impl From<&Lighting> for LightsUniform {
    fn from(lighting: &Lighting) -> Self {
        let pack = |c: [f32; 3], i: f32| [c[0], c[1], c[2], i];
        Self {
            scatter_color: pack(lighting.scatter.color, lighting.scatter.intensity),
            sky_color: pack(lighting.sky.color, lighting.sky.intensity),
            ground_color: pack(lighting.ground.color, lighting.ground.intensity),
        }
    }
}

/// Uniform block of the overhang shader, std140 aligned
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OverhangUniform {
    pub cos_angle_rad: f32,
    pub _padding: [f32; 3],
    pub overhang_color: [f32; 3],
    pub _padding2: f32,
}

impl From<&OverhangMaterial> for OverhangUniform {
    fn from(material: &OverhangMaterial) -> Self {
        Self {
            cos_angle_rad: material.cos_angle_rad,
            _padding: [0.0; 3],
            overhang_color: OVERHANG_COLOR,
            _padding2: 0.0,
        }
    }
}

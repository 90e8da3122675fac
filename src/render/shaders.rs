use crate::uniforms::{UniformDecl, UniformKind};

use super::common::ProgramSource;

/// Per-fragment Phong lighting with a single point light and a diffuse
/// texture.
pub const PHONG: ProgramSource = ProgramSource {
    label: "phong",
    vertex: PHONG_VERTEX,
    fragment: PHONG_FRAGMENT,
    uniforms: PHONG_UNIFORMS,
};

/// Member order of the `Uniforms` struct declared by both stages.
const PHONG_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::new("u_worldViewProjection", UniformKind::Mat4),
    UniformDecl::new("u_world", UniformKind::Mat4),
    UniformDecl::new("u_viewInverse", UniformKind::Mat4),
    UniformDecl::new("u_worldInverseTranspose", UniformKind::Mat4),
    UniformDecl::new("u_lightWorldPos", UniformKind::Vec3),
    UniformDecl::new("u_shininess", UniformKind::Float),
    UniformDecl::new("u_lightColor", UniformKind::Vec4),
    UniformDecl::new("u_ambient", UniformKind::Vec4),
    UniformDecl::new("u_specular", UniformKind::Vec4),
    UniformDecl::new("u_specularFactor", UniformKind::Float),
    UniformDecl::new("u_diffuse", UniformKind::Texture),
];

const PHONG_VERTEX: &str = r#"
struct Uniforms {
    world_view_projection: mat4x4<f32>,
    world: mat4x4<f32>,
    view_inverse: mat4x4<f32>,
    world_inverse_transpose: mat4x4<f32>,
    light_world_pos: vec3<f32>,
    shininess: f32,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
    specular: vec4<f32>,
    specular_factor: f32,
}

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) texcoord: vec2<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) surface_to_light: vec3<f32>,
    @location(3) surface_to_view: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let position = vec4<f32>(input.position, 1.0);
    let world_position = u.world * position;
    let clip = u.world_view_projection * position;

    // GL clip depth (-w..w) to wgpu's 0..w
    out.position = vec4<f32>(clip.xy, (clip.z + clip.w) * 0.5, clip.w);
    out.texcoord = input.texcoord;
    out.normal = (u.world_inverse_transpose * vec4<f32>(input.normal, 0.0)).xyz;
    out.surface_to_light = u.light_world_pos - world_position.xyz;
    out.surface_to_view = (u.view_inverse[3] - world_position).xyz;
    return out;
}
"#;

const PHONG_FRAGMENT: &str = r#"
struct Uniforms {
    world_view_projection: mat4x4<f32>,
    world: mat4x4<f32>,
    view_inverse: mat4x4<f32>,
    world_inverse_transpose: mat4x4<f32>,
    light_world_pos: vec3<f32>,
    shininess: f32,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
    specular: vec4<f32>,
    specular_factor: f32,
}

@group(0) @binding(0)
var<uniform> u: Uniforms;

@group(1) @binding(0)
var u_diffuse: texture_2d<f32>;

@group(1) @binding(1)
var u_diffuse_sampler: sampler;

struct FragmentInput {
    @location(0) texcoord: vec2<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) surface_to_light: vec3<f32>,
    @location(3) surface_to_view: vec3<f32>,
}

// x: ambient, y: diffuse, z: specular
fn lit(l: f32, h: f32, m: f32) -> vec4<f32> {
    var specular: f32 = 0.0;
    if (l > 0.0) {
        specular = pow(max(0.0, h), m);
    }
    return vec4<f32>(1.0, max(l, 0.0), specular, 1.0);
}

@fragment
fn fs_main(input: FragmentInput) -> @location(0) vec4<f32> {
    let diffuse_color = textureSample(u_diffuse, u_diffuse_sampler, input.texcoord);
    let normal = normalize(input.normal);
    let surface_to_light = normalize(input.surface_to_light);
    let surface_to_view = normalize(input.surface_to_view);
    let half_vector = normalize(surface_to_light + surface_to_view);
    let lighting = lit(
        dot(normal, surface_to_light),
        dot(normal, half_vector),
        u.shininess
    );
    let color = u.light_color * (diffuse_color * lighting.y
        + diffuse_color * u.ambient
        + u.specular * lighting.z * u.specular_factor);
    return vec4<f32>(color.rgb, diffuse_color.a);
}
"#;

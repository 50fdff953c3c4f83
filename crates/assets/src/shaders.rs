/// WGSL vertex stage for the textured cubes.
///
/// Attribute 0 is the position, attribute 1 the texcoord; the per-draw
/// uniform block at group 0 carries the combined transform and the texture
/// mix balance.
pub const CUBE_VERTEX: &str = r#"
struct DrawUniforms {
    transform: mat4x4<f32>,
    mix_balance: f32,
};

@group(0) @binding(0)
var<uniform> draw: DrawUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) tex_coord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = draw.transform * vec4<f32>(vertex.position, 1.0);
    out.tex_coord = vertex.tex_coord;
    return out;
}
"#;

/// WGSL fragment stage blending the two bound textures by the mix balance.
pub const CUBE_FRAGMENT: &str = r#"
struct DrawUniforms {
    transform: mat4x4<f32>,
    mix_balance: f32,
};

@group(0) @binding(0)
var<uniform> draw: DrawUniforms;

@group(1) @binding(0)
var texture1: texture_2d<f32>;
@group(1) @binding(1)
var texture2: texture_2d<f32>;
@group(1) @binding(2)
var cube_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let first = textureSample(texture1, cube_sampler, in.tex_coord);
    let second = textureSample(texture2, cube_sampler, in.tex_coord);
    return mix(first, second, draw.mix_balance);
}
"#;

/// WGSL lighting shader: shades the cube from the ten material channels
/// with a single directional light, writing HDR color to the offscreen
/// target. Channel bindings follow `ChannelKind::slot()` order.
pub const LIGHTING_SHADER: &str = r#"
struct SceneUniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    params: vec4<f32>, // x: elapsed seconds
};

struct ModelUniforms {
    model: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> scene: SceneUniforms;

@group(1) @binding(0)
var<uniform> entity: ModelUniforms;

@group(2) @binding(0) var t_albedo: texture_2d<f32>;
@group(2) @binding(1) var t_opacity: texture_2d<f32>;
@group(2) @binding(2) var t_normal: texture_2d<f32>;
@group(2) @binding(3) var t_f0: texture_2d<f32>;
@group(2) @binding(4) var t_smoothness: texture_2d<f32>;
@group(2) @binding(5) var t_height: texture_2d<f32>;
@group(2) @binding(6) var t_porosity: texture_2d<f32>;
@group(2) @binding(7) var t_translucence: texture_2d<f32>;
@group(2) @binding(8) var t_ao: texture_2d<f32>;
@group(2) @binding(9) var t_emission: texture_2d<f32>;
@group(2) @binding(10) var s_material: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = entity.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = scene.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize((entity.model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vertex.uv;
    return out;
}

// Cotangent frame from screen-space derivatives; good enough for a
// preview cube, avoids authoring tangents.
fn tangent_frame(n: vec3<f32>, p: vec3<f32>, uv: vec2<f32>) -> mat3x3<f32> {
    let dp1 = dpdx(p);
    let dp2 = dpdy(p);
    let duv1 = dpdx(uv);
    let duv2 = dpdy(uv);
    let dp2perp = cross(dp2, n);
    let dp1perp = cross(n, dp1);
    let t = dp2perp * duv1.x + dp1perp * duv2.x;
    let b = dp2perp * duv1.y + dp1perp * duv2.y;
    let invmax = inverseSqrt(max(dot(t, t), dot(b, b)) + 1e-8);
    return mat3x3<f32>(t * invmax, b * invmax, n);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let geom_normal = normalize(in.world_normal);
    let view_dir = normalize(scene.camera_pos.xyz - in.world_pos);
    let tbn = tangent_frame(geom_normal, in.world_pos, in.uv);

    // Height-based parallax offset, applied before sampling the surface
    // channels.
    let height = textureSample(t_height, s_material, in.uv).r;
    let view_ts = normalize(transpose(tbn) * view_dir);
    let uv = in.uv + (height - 0.5) * 0.04 * (view_ts.xy / max(view_ts.z, 0.25));

    let albedo_in = textureSample(t_albedo, s_material, uv).rgb;
    let opacity = textureSample(t_opacity, s_material, uv).r;
    let normal_ts = textureSample(t_normal, s_material, uv).rgb * 2.0 - 1.0;
    let f0_in = textureSample(t_f0, s_material, uv).r;
    let smoothness = textureSample(t_smoothness, s_material, uv).r;
    let porosity = textureSample(t_porosity, s_material, uv).r;
    let translucence = textureSample(t_translucence, s_material, uv).r;
    let ao = textureSample(t_ao, s_material, uv).r;
    let emission = textureSample(t_emission, s_material, uv).rgb;

    // Porosity soaks up both base color and specular response.
    let albedo = albedo_in * (1.0 - 0.3 * porosity);
    let f0 = f0_in * (1.0 - porosity);

    let n = normalize(tbn * normal_ts);
    let l = normalize(-scene.light_dir.xyz);
    let h = normalize(l + view_dir);

    // Wrap lighting: translucence softens the terminator.
    let ndotl = dot(n, l);
    let diffuse = clamp((ndotl + translucence) / (1.0 + translucence), 0.0, 1.0);

    let fresnel = f0 + (1.0 - f0) * pow(1.0 - max(dot(h, view_dir), 0.0), 5.0);
    let shininess = mix(4.0, 256.0, smoothness * smoothness);
    let specular = fresnel * pow(max(dot(n, h), 0.0), shininess)
        * (shininess + 8.0) / 8.0 * step(0.0, ndotl);

    let light_color = vec3<f32>(1.0);
    let ambient = 0.25 * ao;
    var color = albedo * (ambient + diffuse) * light_color;
    color += specular * light_color;
    color += emission * 2.0;

    return vec4<f32>(color, opacity);
}
"#;

/// WGSL background shader: fullscreen backdrop drawn first in the
/// lighting pass, sampling the selected background texture. A flat color
/// background is a 1x1 texture.
pub const BACKGROUND_SHADER: &str = r#"
@group(2) @binding(0) var t_background: texture_2d<f32>;
@group(2) @binding(1) var s_background: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(vertex.position.xy, 1.0, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(textureSample(t_background, s_background, in.uv).rgb, 1.0);
}
"#;

/// WGSL combine shader: fullscreen pass sampling the lighting output,
/// applying exposure tonemapping. The surface format handles gamma.
pub const COMBINE_SHADER: &str = r#"
@group(2) @binding(0) var t_frame: texture_2d<f32>;
@group(2) @binding(1) var s_frame: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(vertex.position.xy, 0.0, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let hdr = textureSample(t_frame, s_frame, in.uv).rgb;
    // Reinhard with a touch of exposure.
    let exposed = hdr * 1.2;
    let mapped = exposed / (exposed + vec3<f32>(1.0));
    return vec4<f32>(mapped, 1.0);
}
"#;

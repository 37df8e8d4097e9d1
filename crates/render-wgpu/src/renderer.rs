use crate::entity::{Entity, MaterialId};
use crate::framebuffer::OffscreenTarget;
use crate::geometry::{Geometry, Vertex};
use crate::material::Material;
use crate::shaders;
use crate::texture::GpuTexture;
use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use std::sync::Arc;
use texview_channels::{Background, ChannelKind, ChannelSet};
use texview_render::PreviewSession;

const LIGHTING: MaterialId = 0;
const COMBINE: MaterialId = 1;
const BACKGROUND: MaterialId = 2;

/// Cube spin in radians per second of elapsed preview time.
const CUBE_ROTATE_SPEED: f32 = 0.1;

const GROUP_SCENE: u32 = 0;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
    params: [f32; 4],
}

/// The two passes of a frame, in execution order: the backdrop and the
/// lit cube go into the offscreen target, then the fullscreen quad
/// combines that target to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Lighting,
    Combine,
}

pub const FRAME_PASSES: [PassKind; 2] = [PassKind::Lighting, PassKind::Combine];

/// wgpu preview renderer: owns the scene (cube, backdrop, fullscreen
/// quad), its materials, the offscreen target, and the per-slot GPU
/// textures mirrored from the session's channel set.
///
/// Channel and background changes are picked up once at the start of each
/// tick by comparing revisions, so a swap never lands mid-frame.
pub struct PreviewRenderer {
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    materials: Vec<Material>,
    cube: Entity,
    backdrop: Entity,
    quad: Entity,
    target: OffscreenTarget,
    channel_textures: Vec<Arc<GpuTexture>>,
    seen_revisions: [u64; ChannelKind::COUNT],
    seen_background: u64,
}

impl PreviewRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        session: &PreviewSession,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let viewport = session.viewport();

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene_buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bind_group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let model_layout = Entity::model_layout(device);

        // One GPU texture per channel slot, seeded from the session's
        // current channel set.
        let channels = session.channels();
        let channel_textures: Vec<Arc<GpuTexture>> = ChannelKind::ALL
            .iter()
            .map(|kind| {
                Arc::new(GpuTexture::from_image(
                    device,
                    queue,
                    channels.image(*kind),
                    kind.is_srgb(),
                    kind.label(),
                ))
            })
            .collect();
        let seen_revisions = ChannelKind::ALL.map(|kind| channels.revision(kind));

        let background = session.background();
        let background_texture = Arc::new(GpuTexture::from_image(
            device,
            queue,
            background.image(),
            true,
            "background",
        ));
        let seen_background = background.revision();

        let lighting_texture_layout =
            Material::texture_layout(device, ChannelKind::COUNT as u32, "lighting_texture_layout");
        let combine_texture_layout = Material::texture_layout(device, 1, "combine_texture_layout");
        let background_texture_layout =
            Material::texture_layout(device, 1, "background_texture_layout");

        let target = OffscreenTarget::new(device, viewport.width(), viewport.height());

        let lighting_pipeline = build_pipeline(
            device,
            "lighting_pipeline",
            shaders::LIGHTING_SHADER,
            &[&scene_layout, &model_layout, &lighting_texture_layout],
            OffscreenTarget::COLOR_FORMAT,
            DepthMode::ReadWrite,
        );
        let combine_pipeline = build_pipeline(
            device,
            "combine_pipeline",
            shaders::COMBINE_SHADER,
            &[&scene_layout, &model_layout, &combine_texture_layout],
            surface_format,
            DepthMode::None,
        );
        let background_pipeline = build_pipeline(
            device,
            "background_pipeline",
            shaders::BACKGROUND_SHADER,
            &[&scene_layout, &model_layout, &background_texture_layout],
            OffscreenTarget::COLOR_FORMAT,
            DepthMode::Behind,
        );

        let material_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let frame_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("frame_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let background_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("background_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let materials = vec![
            Material::new(
                "lighting_material",
                lighting_pipeline,
                lighting_texture_layout,
                material_sampler,
                channel_textures.clone(),
            ),
            Material::new(
                "combine_material",
                combine_pipeline,
                combine_texture_layout,
                frame_sampler,
                vec![target.color()],
            ),
            Material::new(
                "background_material",
                background_pipeline,
                background_texture_layout,
                background_sampler,
                vec![background_texture],
            ),
        ];

        let cube_geometry = Arc::new(Geometry::cube(device));
        let quad_geometry = Arc::new(Geometry::fullscreen_quad(device));
        let cube = Entity::new(device, "cube", &model_layout, cube_geometry, LIGHTING);
        let backdrop = Entity::new(
            device,
            "backdrop",
            &model_layout,
            Arc::clone(&quad_geometry),
            BACKGROUND,
        );
        let quad = Entity::new(device, "quad", &model_layout, quad_geometry, COMBINE);

        tracing::info!(
            "preview renderer initialized at {}x{}",
            viewport.width(),
            viewport.height()
        );

        Self {
            scene_buffer,
            scene_bind_group,
            materials,
            cube,
            backdrop,
            quad,
            target,
            channel_textures,
            seen_revisions,
            seen_background,
        }
    }

    /// Mirror channel-set changes into GPU textures and the lighting
    /// material. Swaps both together, once per tick; dropping the old Arc
    /// releases the previous GPU texture when the material rebinds.
    fn sync_channels(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, channels: &ChannelSet) {
        for kind in ChannelKind::ALL {
            let slot = kind.slot();
            let revision = channels.revision(kind);
            if revision == self.seen_revisions[slot] {
                continue;
            }
            let texture = Arc::new(GpuTexture::from_image(
                device,
                queue,
                channels.image(kind),
                kind.is_srgb(),
                kind.label(),
            ));
            self.channel_textures[slot] = Arc::clone(&texture);
            self.materials[LIGHTING].set_texture(slot, texture);
            self.seen_revisions[slot] = revision;
            tracing::debug!("{} rebound (revision {revision})", kind.label());
        }
    }

    /// Mirror a background change into the backdrop material's texture.
    fn sync_background(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        background: &Background,
    ) {
        let revision = background.revision();
        if revision == self.seen_background {
            return;
        }
        let texture = Arc::new(GpuTexture::from_image(
            device,
            queue,
            background.image(),
            true,
            "background",
        ));
        self.materials[BACKGROUND].set_texture(0, texture);
        self.seen_background = revision;
        tracing::debug!("background rebound (revision {revision})");
    }

    /// Render one frame into `surface_view`.
    ///
    /// Applies pending channel swaps and viewport changes first, then
    /// encodes the passes in [`FRAME_PASSES`] order.
    pub fn tick(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        session: &PreviewSession,
    ) {
        let viewport = session.viewport();

        self.sync_channels(device, queue, session.channels());
        self.sync_background(device, queue, session.background());

        if self
            .target
            .resize(device, viewport.width(), viewport.height())
        {
            self.materials[COMBINE].set_texture(0, self.target.color());
        }

        for material in &mut self.materials {
            material.refresh(device);
        }

        self.cube
            .transform_mut()
            .set_rotation(Quat::from_rotation_y(session.elapsed() * CUBE_ROTATE_SPEED));

        let matrices = session.matrices();
        let light_dir = Vec3::new(-0.4, -0.8, -0.45).normalize();
        queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms {
                view_proj: matrices.view_projection().to_cols_array_2d(),
                camera_pos: session.camera().eye().extend(1.0).to_array(),
                light_dir: light_dir.extend(0.0).to_array(),
                params: [session.elapsed(), 0.0, 0.0, 0.0],
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("preview_encoder"),
        });

        for pass_kind in FRAME_PASSES {
            match pass_kind {
                PassKind::Lighting => {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("lighting_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: self.target.color_view(),
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: 0.03,
                                    g: 0.03,
                                    b: 0.04,
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: self.target.depth_view(),
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        ..Default::default()
                    });
                    pass.set_bind_group(GROUP_SCENE, &self.scene_bind_group, &[]);
                    // Backdrop first; it draws at the far plane without
                    // touching depth, the cube covers it where closer.
                    self.backdrop.render(queue, &self.materials, &mut pass);
                    self.cube.render(queue, &self.materials, &mut pass);
                }
                PassKind::Combine => {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("combine_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: surface_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });
                    pass.set_bind_group(GROUP_SCENE, &self.scene_bind_group, &[]);
                    self.quad.render(queue, &self.materials, &mut pass);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Depth handling for a pipeline: the cube tests and writes, the backdrop
/// draws at the far plane without writing, the combine pass has no depth
/// attachment at all.
#[derive(Clone, Copy)]
enum DepthMode {
    None,
    ReadWrite,
    Behind,
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_source: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    color_format: wgpu::TextureFormat,
    depth: DepthMode,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: match depth {
            DepthMode::None => None,
            DepthMode::ReadWrite => Some(wgpu::DepthStencilState {
                format: OffscreenTarget::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            DepthMode::Behind => Some(wgpu::DepthStencilState {
                format: OffscreenTarget::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
        },
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighting_pass_precedes_combine() {
        let lighting = FRAME_PASSES
            .iter()
            .position(|p| *p == PassKind::Lighting)
            .unwrap();
        let combine = FRAME_PASSES
            .iter()
            .position(|p| *p == PassKind::Combine)
            .unwrap();
        assert!(lighting < combine);
    }

    #[test]
    fn material_ids_match_build_order() {
        // Entities index into the material vec; the constants must agree
        // with the order materials are pushed in `new`.
        assert_eq!((LIGHTING, COMBINE, BACKGROUND), (0, 1, 2));
    }

    #[test]
    fn scene_uniforms_are_std140_sized() {
        // mat4 + three vec4s, no implicit padding.
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 64 + 16 * 3);
    }
}

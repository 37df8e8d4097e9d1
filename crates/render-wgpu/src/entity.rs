use crate::{Geometry, Material};
use bytemuck::{Pod, Zeroable};
use std::sync::Arc;
use texview_common::Transform;
use wgpu::util::DeviceExt;

/// Index into the renderer-owned material list. Entities reference
/// materials by handle rather than owning them, so material and texture
/// lifetimes never cycle.
pub type MaterialId = usize;

pub(crate) const GROUP_MODEL: u32 = 1;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
}

/// A drawable scene object: a transform, shared geometry, a material
/// handle, and an exclusively owned model-matrix uniform buffer. No other
/// entity ever writes this buffer.
pub struct Entity {
    transform: Transform,
    geometry: Arc<Geometry>,
    material: MaterialId,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
}

impl Entity {
    /// Bind group layout for the per-entity model matrix, shared by all
    /// pipelines at group 1.
    pub fn model_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    pub fn new(
        device: &wgpu::Device,
        label: &str,
        model_layout: &wgpu::BindGroupLayout,
        geometry: Arc<Geometry>,
        material: MaterialId,
    ) -> Self {
        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_model_buffer")),
            contents: bytemuck::bytes_of(&ModelUniforms {
                model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}_model_bind_group")),
            layout: model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });
        Self {
            transform: Transform::default(),
            geometry,
            material,
            model_buffer,
            model_bind_group,
        }
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    pub fn set_geometry(&mut self, geometry: Arc<Geometry>) {
        self.geometry = geometry;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Draw this entity: upload the current model matrix into the entity's
    /// own uniform buffer, bind the material, draw the geometry.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        materials: &[Material],
        pass: &mut wgpu::RenderPass<'_>,
    ) {
        queue.write_buffer(
            &self.model_buffer,
            0,
            bytemuck::bytes_of(&ModelUniforms {
                model: self.transform.model_matrix().to_cols_array_2d(),
            }),
        );
        let Some(material) = materials.get(self.material) else {
            tracing::warn!("entity references missing material {}", self.material);
            return;
        };
        material.bind(pass);
        pass.set_bind_group(GROUP_MODEL, &self.model_bind_group, &[]);
        self.geometry.draw(pass);
    }
}

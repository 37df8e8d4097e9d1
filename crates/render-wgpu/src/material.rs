use crate::GpuTexture;
use std::sync::Arc;

/// Bind group index every pipeline reserves for material textures.
/// Group 0 is scene uniforms, group 1 the per-entity model matrix.
pub(crate) const GROUP_TEXTURES: u32 = 2;

/// A shader pipeline plus its slot-ordered texture bindings.
///
/// Texture slots are rebound in ascending slot order whenever a binding
/// changes, so binding the same material twice in a frame produces
/// identical GPU state. Setting a slot the pipeline does not declare is
/// silently inert; materials are data-driven and shader mismatches are
/// not surfaced past pipeline creation.
pub struct Material {
    label: String,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    slots: Vec<Arc<GpuTexture>>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Material {
    /// Bind group layout for `count` sampled textures at bindings
    /// `0..count` and one filtering sampler at binding `count`.
    pub fn texture_layout(device: &wgpu::Device, count: u32, label: &str) -> wgpu::BindGroupLayout {
        let mut entries: Vec<wgpu::BindGroupLayoutEntry> = (0..count)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            })
            .collect();
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: count,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &entries,
        })
    }

    pub fn new(
        label: impl Into<String>,
        pipeline: wgpu::RenderPipeline,
        texture_layout: wgpu::BindGroupLayout,
        sampler: wgpu::Sampler,
        slots: Vec<Arc<GpuTexture>>,
    ) -> Self {
        Self {
            label: label.into(),
            pipeline,
            texture_layout,
            sampler,
            slots,
            bind_group: None,
        }
    }

    /// Replace one texture binding. Out-of-range slots are ignored.
    pub fn set_texture(&mut self, slot: usize, texture: Arc<GpuTexture>) {
        match self.slots.get_mut(slot) {
            Some(bound) => {
                *bound = texture;
                self.bind_group = None;
            }
            None => {
                tracing::trace!("{}: no slot {slot}, texture ignored", self.label);
            }
        }
    }

    /// Rebuild the texture bind group if any slot changed since the last
    /// refresh. Called once per tick, before any pass encodes.
    pub fn refresh(&mut self, device: &wgpu::Device) {
        if self.bind_group.is_some() {
            return;
        }
        let mut entries: Vec<wgpu::BindGroupEntry> = self
            .slots
            .iter()
            .enumerate()
            .map(|(slot, texture)| wgpu::BindGroupEntry {
                binding: slot as u32,
                resource: wgpu::BindingResource::TextureView(texture.view()),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: self.slots.len() as u32,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&self.label),
            layout: &self.texture_layout,
            entries: &entries,
        }));
    }

    /// Activate the pipeline and bind the texture set in slot order.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        if let Some(bind_group) = &self.bind_group {
            pass.set_bind_group(GROUP_TEXTURES, bind_group, &[]);
        }
    }
}

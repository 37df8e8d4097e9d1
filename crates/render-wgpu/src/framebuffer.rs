use crate::GpuTexture;
use std::sync::Arc;

/// Offscreen target for the lighting pass: an HDR color attachment the
/// combine pass samples, plus a depth attachment.
///
/// Dimensions always match the current viewport; `resize` reallocates only
/// when the requested size differs.
pub struct OffscreenTarget {
    color: Arc<GpuTexture>,
    depth_view: wgpu::TextureView,
}

impl OffscreenTarget {
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            color: Arc::new(GpuTexture::render_target(
                device,
                width,
                height,
                Self::COLOR_FORMAT,
                "lighting_color",
            )),
            depth_view: create_depth_view(device, width, height),
        }
    }

    /// Reallocate the attachments for a new size. Returns `false` without
    /// touching GPU memory when the clamped size is unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        let width = width.max(1);
        let height = height.max(1);
        let (cur_width, cur_height) = self.color.size();
        if width == cur_width && height == cur_height {
            return false;
        }
        tracing::debug!("offscreen target {cur_width}x{cur_height} -> {width}x{height}");
        *self = Self::new(device, width, height);
        true
    }

    /// Shared handle to the color attachment, for sampling in the combine
    /// pass. Holders from before a resize keep the old texture alive until
    /// they rebind.
    pub fn color(&self) -> Arc<GpuTexture> {
        Arc::clone(&self.color)
    }

    /// Color attachment view for the lighting pass.
    pub fn color_view(&self) -> &wgpu::TextureView {
        self.color.view()
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("lighting_depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OffscreenTarget::DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

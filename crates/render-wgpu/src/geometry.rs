use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x2,
];

impl Vertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRS,
        }
    }
}

/// Immutable vertex/index buffers for one drawable mesh, shared between
/// entities that use the same base shape.
pub struct Geometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Geometry {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u16]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Unit cube, 24 vertices with per-face normals and uvs.
    pub fn cube(device: &wgpu::Device) -> Self {
        let p = 0.5_f32;
        #[rustfmt::skip]
        let vertices = [
            // +Z face
            Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0], uv: [0.0, 1.0] },
            Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0], uv: [1.0, 1.0] },
            Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0], uv: [1.0, 0.0] },
            Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0], uv: [0.0, 0.0] },
            // -Z face
            Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0], uv: [0.0, 1.0] },
            Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0], uv: [1.0, 1.0] },
            Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0], uv: [1.0, 0.0] },
            Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0], uv: [0.0, 0.0] },
            // +X face
            Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0], uv: [0.0, 1.0] },
            Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0], uv: [1.0, 1.0] },
            Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0], uv: [1.0, 0.0] },
            Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0], uv: [0.0, 0.0] },
            // -X face
            Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0], uv: [0.0, 1.0] },
            Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0], uv: [1.0, 1.0] },
            Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0], uv: [1.0, 0.0] },
            Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0], uv: [0.0, 0.0] },
            // +Y face
            Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0], uv: [0.0, 1.0] },
            Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0], uv: [1.0, 1.0] },
            Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0], uv: [1.0, 0.0] },
            Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0], uv: [0.0, 0.0] },
            // -Y face
            Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0], uv: [0.0, 1.0] },
            Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0], uv: [1.0, 1.0] },
            Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0], uv: [1.0, 0.0] },
            Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0], uv: [0.0, 0.0] },
        ];
        #[rustfmt::skip]
        let indices: [u16; 36] = [
            0,1,2, 2,3,0,       // +Z
            4,5,6, 6,7,4,       // -Z
            8,9,10, 10,11,8,    // +X
            12,13,14, 14,15,12, // -X
            16,17,18, 18,19,16, // +Y
            20,21,22, 22,23,20, // -Y
        ];
        Self::new(device, "cube", &vertices, &indices)
    }

    /// Two-triangle quad covering the whole surface in clip space.
    pub fn fullscreen_quad(device: &wgpu::Device) -> Self {
        let n = [0.0, 0.0, 1.0];
        let vertices = [
            Vertex { position: [-1.0, -1.0, 0.0], normal: n, uv: [0.0, 1.0] },
            Vertex { position: [ 1.0, -1.0, 0.0], normal: n, uv: [1.0, 1.0] },
            Vertex { position: [ 1.0,  1.0, 0.0], normal: n, uv: [1.0, 0.0] },
            Vertex { position: [-1.0,  1.0, 0.0], normal: n, uv: [0.0, 0.0] },
        ];
        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
        Self::new(device, "fullscreen_quad", &vertices, &indices)
    }

    /// Issue the draw call. The pipeline and bind groups must already be
    /// set on the pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

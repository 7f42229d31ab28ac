use std::marker::PhantomData;

use wgpu::util::DeviceExt;

use super::{mesh::Mesh, Vertex};


/// Vertex and index buffers of a mesh, uploaded once.
pub struct Model<V: Vertex> {
    vbuf: wgpu::Buffer,
    ibuf: wgpu::Buffer,
    pub num_indices: usize,
    phantom: PhantomData<V>,
}

impl<V: Vertex> Model<V> {
    /// Returns `None` for an empty mesh, wgpu rejects zero-sized draws.
    pub fn new(device: &wgpu::Device, mesh: &Mesh<V>) -> Option<Self> {
        if mesh.is_empty() {
            return None;
        }

        let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Vertex Buffer"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Index Buffer"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Some(Self {
            vbuf,
            ibuf,
            num_indices: mesh.indices().len(),
            phantom: PhantomData,
        })
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vbuf.slice(..));
        render_pass.set_index_buffer(self.ibuf.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.num_indices as u32, 0, 0..1);
    }
}

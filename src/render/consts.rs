use std::marker::PhantomData;

use bytemuck::Pod;
use wgpu::util::DeviceExt;


/// A uniform buffer holding `len` values of `T`.
pub struct Consts<T: Copy + Pod> {
    buf: wgpu::Buffer,
    len: usize,
    phantom: PhantomData<T>,
}

impl<T: Copy + Pod> Consts<T> {
    pub fn new(device: &wgpu::Device, vals: &[T]) -> Self {
        let buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Consts Buffer"),
            contents: bytemuck::cast_slice(vals),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self { buf, len: vals.len(), phantom: PhantomData }
    }

    /// Overwrites values starting at element `offset`.
    pub fn update(&mut self, queue: &wgpu::Queue, vals: &[T], offset: usize) {
        debug_assert!(offset + vals.len() <= self.len);
        if vals.is_empty() {
            return;
        }
        queue.write_buffer(
            &self.buf,
            (offset * std::mem::size_of::<T>()) as wgpu::BufferAddress,
            bytemuck::cast_slice(vals),
        );
    }

    pub fn buf(&self) -> &wgpu::Buffer { &self.buf }
}

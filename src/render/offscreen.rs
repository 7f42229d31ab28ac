use anyhow::{ensure, Context, Result};
use image::RgbaImage;

use super::{
    consts::Consts,
    context,
    mesh::Mesh,
    model::Model,
    pipelines::{atlas::{create_atlas_pipeline, AtlasVertex}, GlobalModel, Globals, GlobalsLayouts},
    texture::Texture,
};


/// Renders atlas meshes into an RGBA texture and reads the pixels back.
pub struct OffscreenRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layouts: GlobalsLayouts,
    pipeline: wgpu::RenderPipeline,
    target: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl OffscreenRenderer {
    pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(device: wgpu::Device, queue: wgpu::Queue, width: u32, height: u32) -> Result<Self> {
        ensure!(width > 0 && height > 0, "offscreen target must not be empty");

        let layouts = GlobalsLayouts::new(&device);
        let shader = device.create_shader_module(wgpu::include_wgsl!("../../assets/shaders/atlas.wgsl"));
        let pipeline = create_atlas_pipeline(&device, &layouts, &shader, Self::TARGET_FORMAT, false);

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self { device, queue, layouts, pipeline, target, view, width, height })
    }

    /// Acquires its own adapter and device.
    pub fn headless(width: u32, height: u32) -> Result<Self> {
        let (device, queue) = context::headless()?;
        Self::new(device, queue, width, height)
    }

    pub fn device(&self) -> &wgpu::Device { &self.device }

    pub fn queue(&self) -> &wgpu::Queue { &self.queue }

    pub fn size(&self) -> (u32, u32) { (self.width, self.height) }

    pub fn render(&self, atlas: &Texture, mesh: &Mesh<AtlasVertex>, globals: Globals) -> Result<RgbaImage> {
        let model = Model::new(&self.device, mesh).context("nothing to render, mesh is empty")?;
        let global_model = GlobalModel {
            globals: Consts::new(&self.device, &[globals]),
        };
        let globals_bind_group = self.layouts.bind(&self.device, &global_model);
        let atlas_bind_group = self.layouts.bind_atlas_texture(&self.device, atlas);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Offscreen Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Offscreen Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &globals_bind_group, &[]);
            render_pass.set_bind_group(1, &atlas_bind_group, &[]);
            model.draw(&mut render_pass);
        }

        let padded_row = padded_bytes_per_row(self.width);
        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Offscreen Readback"),
            size: (padded_row * self.height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        encoder.copy_texture_to_buffer(
            self.target.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .context("readback callback dropped")?
            .context("mapping readback buffer")?;

        let pixels = {
            let data = slice.get_mapped_range();
            depad_rows(&data, self.width, self.height, padded_row)
        };
        readback.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels)
            .context("readback size does not match the target")
    }
}


fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

fn depad_rows(data: &[u8], width: u32, height: u32, padded_row: u32) -> Vec<u8> {
    let row = (width * 4) as usize;
    let mut pixels = Vec::with_capacity(row * height as usize);
    for chunk in data.chunks(padded_row as usize).take(height as usize) {
        pixels.extend_from_slice(&chunk[..row]);
    }
    pixels
}

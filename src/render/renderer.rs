use anyhow::{Context, Result};
use bytemuck::Pod;
use winit::window::Window;

use super::{consts::Consts, context, pipelines::GlobalsLayouts, texture::DepthTexture};


pub trait Draw {
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, globals: &wgpu::BindGroup);
}


pub struct Renderer<'a> {
    surface: wgpu::Surface<'a>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub layouts: GlobalsLayouts,
    depth_texture: DepthTexture,
}

impl<'a> Renderer<'a> {
    pub fn new(window: &'a Window) -> Result<Self> {
        let size = window.inner_size();

        let instance = context::create_instance();
        let surface = instance
            .create_surface(window)
            .context("creating window surface")?;
        let adapter = context::request_adapter(&instance, Some(&surface))?;
        let (device, queue) = context::request_device(&adapter)?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The atlas is uploaded as sRGB, so present to an sRGB surface as well
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let layouts = GlobalsLayouts::new(&device);
        let depth_texture = DepthTexture::new(&device, config.width, config.height, "depth_texture");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            layouts,
            depth_texture,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = DepthTexture::new(&self.device, self.config.width, self.config.height, "depth_texture");
        }
    }

    pub fn create_consts<T: Copy + Pod>(&self, vals: &[T]) -> Consts<T> {
        Consts::new(&self.device, vals)
    }

    pub fn update_consts<T: Copy + Pod>(&self, consts: &mut Consts<T>, vals: &[T]) {
        consts.update(&self.queue, vals, 0)
    }

    pub fn render(&mut self, drawable: &impl Draw, globals: &wgpu::BindGroup) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.2,
                            b: 0.3,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            drawable.draw(&mut render_pass, globals);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

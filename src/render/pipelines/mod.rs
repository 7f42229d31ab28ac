pub mod atlas;

use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix4, SquareMatrix};
use wgpu::BindGroup;

use super::{atlas::VerticalFlip, consts::Consts, texture::Texture};

#[repr(C)]
#[derive(Copy, Clone, Debug, Zeroable, Pod)]
pub struct Globals {
    /// Transformation from world space to clip space
    view_proj: [[f32; 4]; 4],
    /// Non-zero when the wrapped vertical tile coordinate is inverted
    flip_v: u32,
    _pad: [u32; 3],
}

impl Globals {
    /// Create global consts from the provided parameters.
    pub fn new(view_proj: [[f32; 4]; 4], flip: VerticalFlip) -> Self {
        Self {
            view_proj,
            flip_v: flip.is_enabled() as u32,
            _pad: [0; 3],
        }
    }

    pub fn flip(&self) -> VerticalFlip {
        VerticalFlip::from(self.flip_v != 0)
    }
}

impl Default for Globals {
    fn default() -> Self {
        Self::new(Matrix4::identity().into(), VerticalFlip::default())
    }
}


// Global scene data.
pub struct GlobalModel {
    pub globals: Consts<Globals>,
}

pub struct GlobalsLayouts {
    pub globals: wgpu::BindGroupLayout,
    pub atlas_layout: wgpu::BindGroupLayout,
}

impl GlobalsLayouts {
    pub fn base_globals_layout() -> Vec<wgpu::BindGroupLayoutEntry> {
        vec![
            // Global uniform
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ]
    }

    pub fn new(device: &wgpu::Device) -> Self {
        let globals = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals layout"),
            entries: &Self::base_globals_layout(),
        });

        // Filterable so the same layout serves nearest and linear samplers
        let atlas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("atlas_bind_group_layout"),
        });

        Self {
            globals,
            atlas_layout,
        }
    }

    fn base_global_entries(global_model: &GlobalModel) -> Vec<wgpu::BindGroupEntry<'_>> {
        vec![
            // Global uniform
            wgpu::BindGroupEntry {
                binding: 0,
                resource: global_model.globals.buf().as_entire_binding(),
            },
        ]
    }

    pub fn bind(&self, device: &wgpu::Device, global_model: &GlobalModel) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &self.globals,
            entries: &Self::base_global_entries(global_model),
        })
    }

    pub fn bind_atlas_texture(&self, device: &wgpu::Device, texture: &Texture) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas_bind_group"),
            layout: &self.atlas_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }
}

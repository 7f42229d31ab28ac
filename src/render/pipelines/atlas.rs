use cgmath::Vector2;
use wgpu::RenderPipeline;

use super::GlobalsLayouts;
use crate::render::{atlas::{SubRect, TileCoord}, mesh::Mesh, texture::DepthTexture, Vertex};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AtlasVertex {
    pub pos: [f32; 3],
    /// Local tile coordinate, may exceed [0, 1] to repeat the tile
    pub tile_coord: [f32; 2],
    /// (x_min, y_min, x_max, y_max) of the tile inside the atlas
    pub sub_rect: [f32; 4],
}

impl AtlasVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x4];

    pub fn new(pos: [f32; 3], tile_coord: [f32; 2], rect: SubRect) -> Self {
        Self { pos, tile_coord, sub_rect: rect.to_array() }
    }
}

impl Vertex for AtlasVertex {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<AtlasVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}


pub fn create_atlas_pipeline(
    device: &wgpu::Device,
    global_layout: &GlobalsLayouts,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    depth: bool,
) -> RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Atlas Pipeline Layout"),
        bind_group_layouts: &[
            &global_layout.globals,
            &global_layout.atlas_layout,
        ],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Atlas Pipeline"),
        layout: Some(&pipeline_layout),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[AtlasVertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // the sampled color is written as is
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        depth_stencil: depth.then(|| wgpu::DepthStencilState {
            format: DepthTexture::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}


/// A full-viewport quad showing `rect` repeated `repeats.x` by `repeats.y` times.
/// Tile coordinates grow rightwards and upwards from the bottom-left corner.
pub fn tile_quad(rect: SubRect, repeats: Vector2<f32>) -> Mesh<AtlasVertex> {
    tile_quad_spanning(rect, Vector2::new(0.0, 0.0), repeats)
}

/// A full-viewport quad whose tile coordinates run from `from` at the
/// bottom-left corner to `to` at the top-right one.
pub fn tile_quad_spanning(rect: SubRect, from: TileCoord, to: TileCoord) -> Mesh<AtlasVertex> {
    let mut mesh = Mesh::new();
    mesh.push_quad([
        // Bottom Left
        AtlasVertex::new([-1.0, -1.0, 0.0], [from.x, from.y], rect),
        // Bottom Right
        AtlasVertex::new([1.0, -1.0, 0.0], [to.x, from.y], rect),
        // Top Right
        AtlasVertex::new([1.0, 1.0, 0.0], [to.x, to.y], rect),
        // Top Left
        AtlasVertex::new([-1.0, 1.0, 0.0], [from.x, to.y], rect),
    ]);
    mesh
}

pub mod atlas;
pub mod binding;
pub mod consts;
pub mod context;
pub mod mesh;
pub mod model;
pub mod offscreen;
pub mod pipelines;
pub mod renderer;
pub mod texture;


pub trait Vertex: Clone + bytemuck::Pod {
    fn desc<'a>() -> wgpu::VertexBufferLayout<'a>;
}

use wgpu::BindGroup;

use crate::render::{pipelines::GlobalModel, renderer::Renderer, texture::Texture};

impl<'a> Renderer<'a> {
    pub fn bind_globals(&self, global_model: &GlobalModel) -> BindGroup {
        self.layouts.bind(&self.device, global_model)
    }

    pub fn bind_atlas_texture(&self, tex: &Texture) -> BindGroup {
        self.layouts.bind_atlas_texture(&self.device, tex)
    }
}

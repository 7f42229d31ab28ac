use anyhow::{Context, Result};
use cgmath::{Matrix4, SquareMatrix, Vector2};
use image::{Rgba, RgbaImage};
use wgpu::BindGroup;

use crate::{
    render::{
        atlas::{AtlasImage, FilterMode, SubRect, VerticalFlip},
        model::Model,
        pipelines::{
            atlas::{create_atlas_pipeline, tile_quad, AtlasVertex},
            GlobalModel, Globals,
        },
        renderer::{Draw, Renderer},
        texture::Texture,
    },
    settings::Settings,
};

const DEMO_TILE_SIZE: u32 = 16;


/// One quad repeating a single atlas entry across the window.
pub struct Scene {
    pub data: GlobalModel,
    pub globals_bind_group: BindGroup,
    pipeline: wgpu::RenderPipeline,
    atlas_bind_group: BindGroup,
    model: Model<AtlasVertex>,
    flip: VerticalFlip,
}

impl Scene {
    pub fn new(renderer: &Renderer<'_>, settings: &Settings) -> Result<Self> {
        let flip = settings.sampler.vertical_flip();
        let data = GlobalModel {
            globals: renderer.create_consts(&[Globals::new(Matrix4::identity().into(), flip)]),
        };
        let globals_bind_group = renderer.bind_globals(&data);

        let atlas_image = match &settings.demo.atlas_path {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading atlas {}", path.display()))?;
                AtlasImage::from_bytes(&bytes, settings.sampler.filter)?
            }
            None => demo_atlas(settings.sampler.filter),
        };
        let atlas = Texture::from_atlas(&renderer.device, &renderer.queue, &atlas_image, "atlas")?;
        let atlas_bind_group = renderer.bind_atlas_texture(&atlas);

        let [x_min, y_min, x_max, y_max] = settings.demo.tile;
        let rect = SubRect::new(x_min, y_min, x_max, y_max).context("demo tile")?;
        let [rx, ry] = settings.demo.repeats;
        let model = Model::new(&renderer.device, &tile_quad(rect, Vector2::new(rx, ry)))
            .context("demo quad is empty")?;

        let shader = renderer.device.create_shader_module(
            wgpu::include_wgsl!("../assets/shaders/atlas.wgsl")
        );
        let pipeline = create_atlas_pipeline(
            &renderer.device,
            &renderer.layouts,
            &shader,
            renderer.config.format,
            true,
        );

        Ok(Self {
            data,
            globals_bind_group,
            pipeline,
            atlas_bind_group,
            model,
            flip,
        })
    }

    pub fn toggle_flip(&mut self, renderer: &Renderer<'_>) {
        self.flip = match self.flip {
            VerticalFlip::Flip => VerticalFlip::Keep,
            VerticalFlip::Keep => VerticalFlip::Flip,
        };
        log::info!("vertical flip: {:?}", self.flip);
        renderer.update_consts(
            &mut self.data.globals,
            &[Globals::new(Matrix4::identity().into(), self.flip)],
        );
    }
}

impl Draw for Scene {
    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, globals: &wgpu::BindGroup) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, globals, &[]);
        render_pass.set_bind_group(1, &self.atlas_bind_group, &[]);
        self.model.draw(render_pass);
    }
}


/// A 2x2 tile atlas. Each tile has a dark band along its top rows so an
/// upside-down sample is easy to spot.
pub fn demo_atlas(filter: FilterMode) -> AtlasImage {
    const COLORS: [[u8; 3]; 4] = [[200, 60, 60], [60, 180, 80], [60, 90, 200], [220, 200, 80]];

    let size = DEMO_TILE_SIZE * 2;
    let image = RgbaImage::from_fn(size, size, |x, y| {
        let tile = (y / DEMO_TILE_SIZE) * 2 + x / DEMO_TILE_SIZE;
        let [r, g, b] = COLORS[tile as usize];
        if y % DEMO_TILE_SIZE < DEMO_TILE_SIZE / 4 {
            Rgba([r / 3, g / 3, b / 3, 255])
        } else {
            Rgba([r, g, b, 255])
        }
    });
    AtlasImage::new(image, filter)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::atlas::shade;

    #[test]
    fn demo_atlas_tiles_have_a_dark_top_band() {
        let atlas = demo_atlas(FilterMode::Nearest);
        assert_eq!(atlas.dimensions(), (32, 32));

        let first_tile = SubRect::from_pixels(0, 0, DEMO_TILE_SIZE, DEMO_TILE_SIZE, 32, 32).unwrap();
        let near_top = shade(Vector2::new(0.5, 0.95), &first_tile, &atlas, VerticalFlip::Flip);
        let near_bottom = shade(Vector2::new(0.5, 0.05), &first_tile, &atlas, VerticalFlip::Flip);

        assert_eq!(near_top, Rgba([66, 20, 20, 255]));
        assert_eq!(near_bottom, Rgba([200, 60, 60, 255]));
    }

    #[test]
    fn scene_draws_through_the_renderer() {
        fn drawable<T: Draw>() {}
        drawable::<Scene>();
    }
}

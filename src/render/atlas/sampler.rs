use anyhow::{Context, Result};
use cgmath::Vector2;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{remap_to_atlas, SubRect, TileCoord, VerticalFlip};

/// Filtering policy of the atlas resource. Mirrors the sampler the renderer
/// binds; the remap itself does not depend on it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Nearest,
    Linear,
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}


/// CPU copy of an atlas, sampled with clamp-to-edge addressing like the GPU sampler.
#[derive(Clone, Debug)]
pub struct AtlasImage {
    image: RgbaImage,
    filter: FilterMode,
}

impl AtlasImage {
    pub fn new(image: RgbaImage, filter: FilterMode) -> Self {
        Self { image, filter }
    }

    pub fn from_bytes(bytes: &[u8], filter: FilterMode) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .context("decoding atlas image")?
            .to_rgba8();
        Ok(Self::new(image, filter))
    }

    pub fn image(&self) -> &RgbaImage { &self.image }

    pub fn filter(&self) -> FilterMode { self.filter }

    pub fn dimensions(&self) -> (u32, u32) { self.image.dimensions() }

    /// Samples at normalized `uv` with the image's filter mode.
    /// An empty image samples as transparent black.
    pub fn sample(&self, uv: Vector2<f32>) -> Rgba<u8> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Rgba([0; 4]);
        }

        match self.filter {
            FilterMode::Nearest => self.sample_nearest(uv),
            FilterMode::Linear => self.sample_linear(uv),
        }
    }

    fn texel(&self, x: i64, y: i64) -> Rgba<u8> {
        let (width, height) = self.image.dimensions();
        let x = x.clamp(0, width as i64 - 1) as u32;
        let y = y.clamp(0, height as i64 - 1) as u32;
        *self.image.get_pixel(x, y)
    }

    fn sample_nearest(&self, uv: Vector2<f32>) -> Rgba<u8> {
        let (width, height) = self.image.dimensions();
        let x = (uv.x * width as f32).floor() as i64;
        let y = (uv.y * height as f32).floor() as i64;
        self.texel(x, y)
    }

    // Bilinear between texel centers, in stored (encoded) space.
    fn sample_linear(&self, uv: Vector2<f32>) -> Rgba<u8> {
        let (width, height) = self.image.dimensions();
        let fx = uv.x * width as f32 - 0.5;
        let fy = uv.y * height as f32 - 0.5;
        let (x0, y0) = (fx.floor(), fy.floor());
        let (tx, ty) = (fx - x0, fy - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x0 + 1, y0);
        let c01 = self.texel(x0, y0 + 1);
        let c11 = self.texel(x0 + 1, y0 + 1);

        let mut out = [0u8; 4];
        for (i, channel) in out.iter_mut().enumerate() {
            let top = c00[i] as f32 * (1.0 - tx) + c10[i] as f32 * tx;
            let bottom = c01[i] as f32 * (1.0 - tx) + c11[i] as f32 * tx;
            *channel = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
        }
        Rgba(out)
    }
}

/// Interpolated inputs of one fragment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fragment {
    pub tile: TileCoord,
    pub rect: SubRect,
}

impl Fragment {
    pub fn new(tile: TileCoord, rect: SubRect) -> Self {
        Self { tile, rect }
    }
}

/// Output color of the atlas sampler stage for one fragment.
pub fn shade(tile: TileCoord, rect: &SubRect, atlas: &AtlasImage, flip: VerticalFlip) -> Rgba<u8> {
    atlas.sample(remap_to_atlas(tile, rect, flip))
}

/// Shades every fragment independently. Output order matches input order.
pub fn shade_fragments(fragments: &[Fragment], atlas: &AtlasImage, flip: VerticalFlip) -> Vec<Rgba<u8>> {
    fragments
        .par_iter()
        .map(|fragment| shade(fragment.tile, &fragment.rect, atlas, flip))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    // red | green
    // ----+------
    // blue| white
    fn quadrant_atlas(filter: FilterMode) -> AtlasImage {
        let image = RgbaImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => RED,
            (1, 0) => GREEN,
            (0, 1) => BLUE,
            _ => WHITE,
        });
        AtlasImage::new(image, filter)
    }

    #[test]
    fn nearest_returns_stored_texel_unmodified() {
        let atlas = quadrant_atlas(FilterMode::Nearest);
        assert_eq!(atlas.sample(Vector2::new(0.25, 0.25)), RED);
        assert_eq!(atlas.sample(Vector2::new(0.75, 0.25)), GREEN);
        assert_eq!(atlas.sample(Vector2::new(0.25, 0.75)), BLUE);
        assert_eq!(atlas.sample(Vector2::new(0.75, 0.75)), WHITE);
    }

    #[test]
    fn nearest_clamps_the_far_edge() {
        let atlas = quadrant_atlas(FilterMode::Nearest);
        assert_eq!(atlas.sample(Vector2::new(1.0, 1.0)), WHITE);
        assert_eq!(atlas.sample(Vector2::new(0.0, 1.0)), BLUE);
    }

    #[test]
    fn linear_blends_between_texel_centers() {
        let atlas = quadrant_atlas(FilterMode::Linear);
        assert_eq!(atlas.sample(Vector2::new(0.25, 0.25)), RED);
        assert_eq!(atlas.sample(Vector2::new(0.5, 0.25)), Rgba([128, 128, 0, 255]));
        assert_eq!(atlas.sample(Vector2::new(0.5, 0.5)), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn empty_atlas_samples_transparent_black() {
        let atlas = AtlasImage::new(RgbaImage::new(0, 0), FilterMode::Nearest);
        assert_eq!(atlas.sample(Vector2::new(0.5, 0.5)), Rgba([0; 4]));
    }

    #[test]
    fn single_colored_tile_shades_to_its_color() {
        let atlas = quadrant_atlas(FilterMode::Nearest);
        let green_tile = SubRect::new_unchecked(0.5, 0.0, 1.0, 0.5);
        for tile in [(0.1, 0.1), (3.7, -2.2), (-0.5, 0.99), (12.0, 4.5)] {
            let color = shade(Vector2::new(tile.0, tile.1), &green_tile, &atlas, VerticalFlip::Flip);
            assert_eq!(color, GREEN, "tile coordinate {tile:?}");
        }
    }

    #[test]
    fn flip_puts_the_top_of_the_tile_at_the_top_of_the_atlas() {
        let atlas = quadrant_atlas(FilterMode::Nearest);
        // upper half of tile space
        let top = Vector2::new(0.25, 0.75);
        assert_eq!(shade(top, &SubRect::FULL, &atlas, VerticalFlip::Flip), RED);
        assert_eq!(shade(top, &SubRect::FULL, &atlas, VerticalFlip::Keep), BLUE);
    }

    #[test]
    fn shades_fragments_in_input_order() {
        let atlas = quadrant_atlas(FilterMode::Nearest);
        let fragments: Vec<Fragment> = (0..256)
            .map(|i| {
                let tx = i as f32 * 0.5 + 0.25;
                Fragment::new(Vector2::new(tx, 0.75), SubRect::FULL)
            })
            .collect();

        let colors = shade_fragments(&fragments, &atlas, VerticalFlip::Flip);

        assert_eq!(colors.len(), fragments.len());
        for (i, color) in colors.iter().enumerate() {
            let expected = if i % 2 == 0 { RED } else { GREEN };
            assert_eq!(*color, expected, "fragment {i}");
        }
    }

    #[test]
    fn decodes_png_atlases() {
        let mut bytes = Vec::new();
        quadrant_atlas(FilterMode::Nearest)
            .image()
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();

        let atlas = AtlasImage::from_bytes(&bytes, FilterMode::Nearest).unwrap();
        assert_eq!(atlas.dimensions(), (2, 2));
        assert_eq!(atlas.sample(Vector2::new(0.75, 0.75)), WHITE);
    }
}

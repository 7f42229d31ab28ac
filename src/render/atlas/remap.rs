use cgmath::Vector2;
use serde::{Deserialize, Serialize};

use super::{SubRect, TileCoord};


/// Whether the wrapped vertical coordinate is inverted before the remap.
///
/// Tile space has its origin at the bottom-left while atlas images store row 0
/// at the top. Pipelines whose image loader already flips rows on load should
/// use [`VerticalFlip::Keep`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalFlip {
    #[default]
    Flip,
    Keep,
}

impl VerticalFlip {
    pub fn is_enabled(self) -> bool {
        self == VerticalFlip::Flip
    }

    pub fn apply(self, wrapped: f32) -> f32 {
        match self {
            VerticalFlip::Flip => 1.0 - wrapped,
            VerticalFlip::Keep => wrapped,
        }
    }
}

impl From<bool> for VerticalFlip {
    fn from(flip: bool) -> Self {
        if flip { VerticalFlip::Flip } else { VerticalFlip::Keep }
    }
}

/// Non-negative fractional part of `x`, always in `[0, 1)`.
///
/// Integers map to 0, never 1. `x - floor(x)` rounds up to exactly 1.0 for
/// tiny negative inputs, which is folded back to 0. Non-finite input yields 0.
pub fn wrap(x: f32) -> f32 {
    let f = x - x.floor();
    if (0.0..1.0).contains(&f) { f } else { 0.0 }
}

pub fn lerp(a: f32, b: f32, s: f32) -> f32 {
    a + s * (b - a)
}

/// Maps a repeating tile coordinate to the atlas coordinate to sample.
///
/// This is the host-side twin of `remap_to_atlas` in `atlas.wgsl`.
pub fn remap_to_atlas(tile: TileCoord, rect: &SubRect, flip: VerticalFlip) -> Vector2<f32> {
    let wrapped = Vector2::new(wrap(tile.x), flip.apply(wrap(tile.y)));
    rect.lerp(wrapped)
}

use cgmath::Vector2;
use thiserror::Error;

pub mod remap;
pub mod sampler;

pub use remap::{lerp, remap_to_atlas, wrap, VerticalFlip};
pub use sampler::{shade, shade_fragments, AtlasImage, FilterMode, Fragment};


/// Local texture coordinate of a tile, before atlas remapping.
/// Values outside [0, 1] repeat the tile.
pub type TileCoord = Vector2<f32>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubRectError {
    #[error("sub-rectangle has a non-finite bound")]
    NotFinite,
    #[error("sub-rectangle bound {value} lies outside [0, 1]")]
    OutOfRange { value: f32 },
    #[error("sub-rectangle is inverted on the {axis:?} axis ({min} > {max})")]
    Inverted { axis: Axis, min: f32, max: f32 },
    #[error("atlas has zero width or height")]
    EmptyAtlas,
    #[error("frame at ({x}, {y}) sized {width}x{height} does not fit a {atlas_width}x{atlas_height} atlas")]
    FrameOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        atlas_width: u32,
        atlas_height: u32,
    },
}

/// Bounds of one tile's image inside the shared atlas, in normalized
/// atlas coordinates. `y_min` is the top edge (row 0 of the image).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubRect {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl SubRect {
    /// The whole atlas.
    pub const FULL: Self = Self::new_unchecked(0.0, 0.0, 1.0, 1.0);

    /// Validating constructor for code that builds sub-rectangles.
    /// The sampler itself never checks these bounds.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Result<Self, SubRectError> {
        let bounds = [x_min, y_min, x_max, y_max];

        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(SubRectError::NotFinite);
        }

        if let Some(&value) = bounds.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(SubRectError::OutOfRange { value });
        }

        if x_min > x_max {
            return Err(SubRectError::Inverted { axis: Axis::X, min: x_min, max: x_max });
        }
        if y_min > y_max {
            return Err(SubRectError::Inverted { axis: Axis::Y, min: y_min, max: y_max });
        }

        Ok(Self::new_unchecked(x_min, y_min, x_max, y_max))
    }

    pub const fn new_unchecked(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// Normalized bounds of a frame placed at pixel `(x, y)` of an atlas.
    ///
    /// Animated textures are stored as vertical strips of square frames, so the
    /// height is clamped to the width and only the first frame is addressed.
    pub fn from_pixels(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        atlas_width: u32,
        atlas_height: u32,
    ) -> Result<Self, SubRectError> {
        if atlas_width == 0 || atlas_height == 0 {
            return Err(SubRectError::EmptyAtlas);
        }

        let frame_height = height.min(width);
        let fits = x.checked_add(width).is_some_and(|right| right <= atlas_width)
            && y.checked_add(frame_height).is_some_and(|bottom| bottom <= atlas_height);
        if !fits {
            return Err(SubRectError::FrameOutOfBounds {
                x,
                y,
                width,
                height,
                atlas_width,
                atlas_height,
            });
        }

        let (aw, ah) = (atlas_width as f32, atlas_height as f32);
        Self::new(
            x as f32 / aw,
            y as f32 / ah,
            (x + width) as f32 / aw,
            (y + frame_height) as f32 / ah,
        )
    }

    /// Linear remap of an already wrapped coordinate into this rectangle.
    pub fn lerp(&self, wrapped: Vector2<f32>) -> Vector2<f32> {
        Vector2::new(
            lerp(self.x_min, self.x_max, wrapped.x),
            lerp(self.y_min, self.y_max, wrapped.y),
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.x_min == self.x_max || self.y_min == self.y_max
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }
}

impl From<[f32; 4]> for SubRect {
    fn from(v: [f32; 4]) -> Self {
        Self::new_unchecked(v[0], v[1], v[2], v[3])
    }
}

impl Default for SubRect {
    fn default() -> Self {
        Self::FULL
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn accepts_valid_rectangles() {
        let rect = SubRect::new(0.25, 0.5, 0.75, 1.0).unwrap();
        assert_eq!(rect.to_array(), [0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn accepts_degenerate_rectangles() {
        let rect = SubRect::new(0.5, 0.5, 0.5, 0.5).unwrap();
        assert!(rect.is_degenerate());
    }

    #[test]
    fn rejects_inverted_rectangles() {
        assert_eq!(
            SubRect::new(0.75, 0.0, 0.25, 1.0),
            Err(SubRectError::Inverted { axis: Axis::X, min: 0.75, max: 0.25 })
        );
        assert_eq!(
            SubRect::new(0.0, 0.9, 1.0, 0.1),
            Err(SubRectError::Inverted { axis: Axis::Y, min: 0.9, max: 0.1 })
        );
    }

    #[test]
    fn rejects_out_of_range_and_non_finite_bounds() {
        assert_eq!(
            SubRect::new(-0.1, 0.0, 0.5, 0.5),
            Err(SubRectError::OutOfRange { value: -0.1 })
        );
        assert_eq!(
            SubRect::new(0.0, 0.0, 1.5, 0.5),
            Err(SubRectError::OutOfRange { value: 1.5 })
        );
        assert_eq!(SubRect::new(f32::NAN, 0.0, 0.5, 0.5), Err(SubRectError::NotFinite));
        assert_eq!(SubRect::new(0.0, 0.0, f32::INFINITY, 0.5), Err(SubRectError::NotFinite));
    }

    #[test]
    fn converts_pixel_frames_to_normalized_bounds() {
        let rect = SubRect::from_pixels(16, 32, 16, 16, 64, 64).unwrap();
        assert_eq!(rect, SubRect::new_unchecked(0.25, 0.5, 0.5, 0.75));
    }

    #[test]
    fn animated_strips_address_only_the_first_square_frame() {
        // 16 px wide, 4 frames stacked vertically
        let rect = SubRect::from_pixels(0, 0, 16, 64, 64, 64).unwrap();
        assert_abs_diff_eq!(rect.y_max, 0.25);
        assert_abs_diff_eq!(rect.x_max, 0.25);
    }

    #[test]
    fn rejects_frames_outside_the_atlas() {
        assert_eq!(SubRect::from_pixels(0, 0, 16, 16, 0, 64), Err(SubRectError::EmptyAtlas));
        assert!(matches!(
            SubRect::from_pixels(56, 0, 16, 16, 64, 64),
            Err(SubRectError::FrameOutOfBounds { .. })
        ));
        assert!(matches!(
            SubRect::from_pixels(u32::MAX, 0, 16, 16, 64, 64),
            Err(SubRectError::FrameOutOfBounds { .. })
        ));
    }

    #[test]
    fn lerp_maps_unit_square_corners_to_bounds() {
        let rect = SubRect::new_unchecked(0.25, 0.5, 0.75, 1.0);
        assert_abs_diff_eq!(rect.lerp(Vector2::new(0.0, 0.0)), Vector2::new(0.25, 0.5));
        assert_abs_diff_eq!(rect.lerp(Vector2::new(1.0, 1.0)), Vector2::new(0.75, 1.0));
    }
}

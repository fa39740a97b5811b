//! Pixel-level transforms.
//!
//! Every function takes a decoded [`PixelBuffer`] by reference and returns a
//! new one; none of them keep state between calls. Resampling quality is an
//! explicit [`InterpolationMode`] argument.

use super::calculations::{resolve_resize_dimensions, scale_dimensions};
use super::params::InterpolationMode;
use super::pixels::{BYTES_PER_PIXEL, Color, PixelBuffer, Rect};
use image::imageops;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransformError {
    #[error("Empty image: every pixel has the crop color")]
    EmptyImage,
    #[error("Invalid target dimensions {width}x{height} for a {source_width}x{source_height} image")]
    InvalidDimensions {
        width: u32,
        height: u32,
        source_width: u32,
        source_height: u32,
    },
    #[error("Rectangle {rect:?} is outside the {width}x{height} image")]
    RectOutOfBounds { rect: Rect, width: u32, height: u32 },
    #[error("Crop margins leave no pixels of the {width}x{height} image")]
    DegenerateCrop { width: u32, height: u32 },
}

/// Largest resize output accepted, in bytes of RGBA pixels (1 GiB).
pub const MAX_OUTPUT_BYTES: u64 = 1 << 30;

/// Result type for pixel transforms.
pub type Result<T> = std::result::Result<T, TransformError>;

/// A source → target color substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub source: Color,
    pub target: Color,
}

impl ColorPair {
    pub const fn new(source: Color, target: Color) -> Self {
        Self { source, target }
    }
}

/// Resize to absolute dimensions.
///
/// One of `width`/`height` may be 0: it is then derived from the other,
/// keeping the source aspect ratio. Both 0 is rejected.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    mode: InterpolationMode,
) -> Result<PixelBuffer> {
    let (width, height) = resolve_resize_dimensions(image.dimensions(), (width, height))
        .ok_or(TransformError::InvalidDimensions {
            width,
            height,
            source_width: image.width(),
            source_height: image.height(),
        })?;
    resize_exact(image, width, height, mode)
}

/// Resize by independent width and height factors (`0.5` = 50%).
pub fn resize_factor(
    image: &PixelBuffer,
    width_factor: f64,
    height_factor: f64,
    mode: InterpolationMode,
) -> Result<PixelBuffer> {
    let (width, height) = scale_dimensions(image.dimensions(), (width_factor, height_factor));
    resize_exact(image, width, height, mode)
}

fn resize_exact(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    mode: InterpolationMode,
) -> Result<PixelBuffer> {
    let output_bytes = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL as u64));
    let too_large = output_bytes.is_none_or(|bytes| bytes > MAX_OUTPUT_BYTES);
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 || too_large {
        return Err(TransformError::InvalidDimensions {
            width,
            height,
            source_width: image.width(),
            source_height: image.height(),
        });
    }
    debug!(
        from_w = image.width(),
        from_h = image.height(),
        width,
        height,
        ?mode,
        "resizing"
    );
    let resized = imageops::resize(&image.to_rgba_image(), width, height, mode.filter());
    Ok(PixelBuffer::from(resized))
}

/// Remap colors over the whole image.
pub fn remap_colors(image: &PixelBuffer, color_map: &[ColorPair]) -> Result<PixelBuffer> {
    remap_colors_and_crop(image, color_map, Rect::full(image.width(), image.height()))
}

/// Copy `crop` out of `image`, substituting colors through `color_map`.
///
/// A pixel matches a pair when its RGB channels equal the pair's source color
/// (the pixel's own alpha is not compared). The first matching pair wins and
/// its full RGBA target is written. Unmatched pixels are copied unchanged.
pub fn remap_colors_and_crop(
    image: &PixelBuffer,
    color_map: &[ColorPair],
    crop: Rect,
) -> Result<PixelBuffer> {
    if !crop.fits_within(image.width(), image.height()) {
        return Err(TransformError::RectOutOfBounds {
            rect: crop,
            width: image.width(),
            height: image.height(),
        });
    }
    debug!(?crop, pairs = color_map.len(), "remapping colors");

    let mut target = PixelBuffer::new(crop.width, crop.height, Color::rgba(0, 0, 0, 0));
    let first = crop.x as usize * BYTES_PER_PIXEL;
    let last = first + crop.width as usize * BYTES_PER_PIXEL;

    for y in 0..crop.height {
        let source_row = &image.row(crop.y + y)[first..last];
        let target_row = target.row_mut(y);
        target_row.copy_from_slice(source_row);

        if color_map.is_empty() {
            continue;
        }
        for pixel in target_row.chunks_exact_mut(BYTES_PER_PIXEL) {
            let color = Color::rgba(pixel[0], pixel[1], pixel[2], pixel[3]);
            if let Some(pair) = color_map.iter().find(|p| p.source.same_rgb(color)) {
                pixel.copy_from_slice(&[pair.target.r, pair.target.g, pair.target.b, pair.target.a]);
            }
        }
    }

    Ok(target)
}

/// Copy a sub-rectangle.
pub fn crop(image: &PixelBuffer, rect: Rect) -> Result<PixelBuffer> {
    remap_colors_and_crop(image, &[], rect)
}

/// Rotate the image by 180 degrees.
pub fn rotate_180(image: &PixelBuffer) -> PixelBuffer {
    PixelBuffer::from(imageops::rotate180(&image.to_rgba_image()))
}

/// Find the content rectangle inside a border of `crop_color`.
///
/// Rows are scanned from the top down and from the bottom up, then columns
/// (restricted to the rows found) from the left and from the right, each
/// stopping at the first line holding a pixel different from `crop_color`.
/// Each edge is then pushed outwards by `margin` pixels, clamped to the image,
/// so that a border of that width survives when there is room for it.
pub fn cropped_rectangle(image: &PixelBuffer, crop_color: Color, margin: u32) -> Result<Rect> {
    let (width, height) = image.dimensions();
    let row_has_content = |y: u32| image.row_pixels(y).any(|c| c != crop_color);

    let top = (0..height)
        .find(|&y| row_has_content(y))
        .ok_or(TransformError::EmptyImage)?;
    // A content row exists, so the reverse scans below always succeed.
    let bottom = (top..height).rev().find(|&y| row_has_content(y)).unwrap_or(top);

    let column_has_content = |x: u32| (top..=bottom).any(|y| image.pixel(x, y) != crop_color);
    let left = (0..width).find(|&x| column_has_content(x)).unwrap_or(0);
    let right = (left..width)
        .rev()
        .find(|&x| column_has_content(x))
        .unwrap_or(left);

    let left = left.saturating_sub(margin);
    let top = top.saturating_sub(margin);
    let right = right.saturating_add(margin).min(width - 1);
    let bottom = bottom.saturating_add(margin).min(height - 1);

    let rect = Rect::new(left, top, right - left + 1, bottom - top + 1);
    debug!(?rect, ?crop_color, margin, "detected content rectangle");
    Ok(rect)
}

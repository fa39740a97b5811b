//! Shared test utilities for the conditioner test suite.
//!
//! Synthetic pixel buffers with known content, for transform and profile
//! tests that should not depend on encoded image files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = framed_buffer(10, 8, Color::WHITE, Rect::new(3, 2, 4, 3), Color::BLACK);
//! assert_eq!(cropped_rectangle(&img, Color::WHITE, 0), Ok(Rect::new(3, 2, 4, 3)));
//! ```

use crate::imaging::{Color, PixelBuffer, Rect};

// =========================================================================
// Synthetic buffers
// =========================================================================

/// A `width` × `height` image of `background` with `rect` filled in `fill`.
pub fn framed_buffer(
    width: u32,
    height: u32,
    background: Color,
    rect: Rect,
    fill: Color,
) -> PixelBuffer {
    assert!(
        rect.fits_within(width, height),
        "frame {rect:?} does not fit a {width}x{height} image"
    );
    let mut img = PixelBuffer::new(width, height, background);
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            img.set_pixel(x, y, fill);
        }
    }
    img
}

/// An image where every pixel differs from its neighbours, alpha included.
///
/// Channels stay below 250, so `rgb(250, 250, 250)` never occurs.
pub fn gradient_buffer(width: u32, height: u32) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height, Color::BLACK);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 37 + y * 11) % 240) as u8;
            let g = ((x * 13 + y * 53) % 240) as u8;
            let b = ((x * 7 + y * 29 + 5) % 240) as u8;
            let a = (255 - (x + y) % 200) as u8;
            img.set_pixel(x, y, Color::rgba(r, g, b, a));
        }
    }
    img
}

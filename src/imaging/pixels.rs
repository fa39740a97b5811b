//! Stride-aware 32-bit pixel buffer.
//!
//! Every transform works on a [`PixelBuffer`]: RGBA, one byte per channel,
//! rows laid out `stride` bytes apart. The stride may exceed `width * 4` when
//! rows are padded for alignment, so all access goes through the row and
//! pixel accessors below, never through raw offsets computed elsewhere.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Bytes per pixel. Fixed: all buffers are 32 bpp.
pub const BYTES_PER_PIXEL: usize = 4;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const DARK_BLUE: Color = Color::rgb(0x00, 0x00, 0x8B);
    pub const DARK_RED: Color = Color::rgb(0x8B, 0x00, 0x00);
    pub const DARK_MAGENTA: Color = Color::rgb(0x8B, 0x00, 0x8B);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color channels, ignoring alpha.
    pub fn same_rgb(self, other: Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    fn write_bytes(self, bytes: &mut [u8]) {
        bytes[0] = self.r;
        bytes[1] = self.g;
        bytes[2] = self.b;
        bytes[3] = self.a;
    }
}

/// Axis-aligned rectangle in pixel coordinates.
///
/// `Rect::default()` (all zeros) is the degenerate rectangle returned by
/// [`parse_deflating_rect`](crate::extra_data::parse_deflating_rect) when the
/// margins leave nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width` × `height` image.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies completely inside a `width` × `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }

    /// The rectangle left of a `width` × `height` image once `margins` are
    /// taken off its edges, or `None` if nothing is left.
    pub fn deflated(width: u32, height: u32, margins: Margins) -> Option<Rect> {
        let inner_width = u64::from(width)
            .checked_sub(u64::from(margins.left) + u64::from(margins.right))
            .filter(|&w| w > 0)?;
        let inner_height = u64::from(height)
            .checked_sub(u64::from(margins.top) + u64::from(margins.bottom))
            .filter(|&h| h > 0)?;
        Some(Rect::new(
            margins.left,
            margins.top,
            inner_width as u32,
            inner_height as u32,
        ))
    }
}

/// Four independent edge margins, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Margins {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Owned RGBA pixel buffer with an explicit row stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Tightly packed buffer filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self::with_stride(width, height, width as usize * BYTES_PER_PIXEL, fill)
    }

    /// Buffer whose rows are `stride` bytes apart.
    ///
    /// The stride is raised to `width * 4` if smaller. Padding bytes are zero.
    pub fn with_stride(width: u32, height: u32, stride: usize, fill: Color) -> Self {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let stride = stride.max(row_bytes);
        let mut buffer = Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        };
        for y in 0..height {
            for pixel in buffer.row_mut(y).chunks_exact_mut(BYTES_PER_PIXEL) {
                fill.write_bytes(pixel);
            }
        }
        buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte distance between the starts of two consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel bytes of row `y`, without trailing padding.
    ///
    /// # Panics
    /// If `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Mutable pixel bytes of row `y`, without trailing padding.
    ///
    /// # Panics
    /// If `y` is out of bounds.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y as usize * self.stride;
        let len = self.width as usize * BYTES_PER_PIXEL;
        &mut self.data[start..start + len]
    }

    /// Color at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = x as usize * BYTES_PER_PIXEL;
        Some(Color::from_bytes(
            &self.row(y)[offset..offset + BYTES_PER_PIXEL],
        ))
    }

    /// Color at `(x, y)`.
    ///
    /// # Panics
    /// If the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.get(x, y).unwrap_or_else(|| {
            panic!(
                "pixel ({x}, {y}) out of bounds ({}x{})",
                self.width, self.height
            )
        })
    }

    /// Overwrite the color at `(x, y)`.
    ///
    /// # Panics
    /// If the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        assert!(
            x < self.width,
            "pixel ({x}, {y}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        let offset = x as usize * BYTES_PER_PIXEL;
        color.write_bytes(&mut self.row_mut(y)[offset..offset + BYTES_PER_PIXEL]);
    }

    /// Iterate the colors of row `y`, left to right.
    pub fn row_pixels(&self, y: u32) -> impl Iterator<Item = Color> + '_ {
        self.row(y)
            .chunks_exact(BYTES_PER_PIXEL)
            .map(Color::from_bytes)
    }

    /// Copy a decoded image into a tightly packed buffer.
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            stride: width as usize * BYTES_PER_PIXEL,
            data: image.as_raw().clone(),
        }
    }

    /// Pack the rows (dropping any padding) into an `image` crate buffer.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut packed = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            packed.extend_from_slice(self.row(y));
        }
        RgbaImage::from_raw(self.width, self.height, packed)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            stride: width as usize * BYTES_PER_PIXEL,
            data: image.into_raw(),
        }
    }
}

//! Block-letter text stamping.
//!
//! Text is drawn with a built-in 5×7 bitmap font, scaled up by an integer
//! factor so the text spans roughly three fifths of the image width (and at
//! most half its height), centered, and alpha-blended over the source.
//! Only `A`–`Z` (case-insensitive) have glyphs; anything else is blank.

use super::pixels::{Color, PixelBuffer};
use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// Blank columns between two glyphs.
const GLYPH_SPACING: u32 = 1;

#[rustfmt::skip]
const LETTERS: [[u8; 7]; 26] = [
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
];

fn glyph(c: char) -> Option<&'static [u8; 7]> {
    let c = c.to_ascii_uppercase();
    c.is_ascii_uppercase()
        .then(|| &LETTERS[(c as u8 - b'A') as usize])
}

/// Stamp `text` centered on a copy of `image` in `ink`.
///
/// `ink.a` is the stamp opacity. The glyphs are drawn into a transparent
/// layer that `imageops::overlay` composites onto the image. Images too small
/// to hold the text at 1:1 are returned unchanged.
pub fn stamp_watermark(image: &PixelBuffer, text: &str, ink: Color) -> PixelBuffer {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let text_cols = chars.len() as u32 * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING;
    if text_cols > width || GLYPH_HEIGHT > height {
        debug!(text, width, height, "image too small for watermark");
        return image.clone();
    }
    let scale = (width * 3 / 5 / text_cols)
        .min(height / 2 / GLYPH_HEIGHT)
        .max(1);
    let origin_x = (width - text_cols * scale) / 2;
    let origin_y = (height - GLYPH_HEIGHT * scale) / 2;
    debug!(text, scale, origin_x, origin_y, "stamping watermark");

    let Some(layer) = glyph_layer(&chars, scale, ink) else {
        return image.clone();
    };
    let mut target = image.to_rgba_image();
    imageops::overlay(&mut target, &layer, i64::from(origin_x), i64::from(origin_y));
    PixelBuffer::from(target)
}

/// Transparent layer with the glyph cells of `chars` filled in `ink`.
///
/// `None` when no character has a glyph.
fn glyph_layer(chars: &[char], scale: u32, ink: Color) -> Option<RgbaImage> {
    let text_cols = chars.len() as u32 * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING;
    let mut layer = RgbaImage::new(text_cols * scale, GLYPH_HEIGHT * scale);
    let ink = Rgba([ink.r, ink.g, ink.b, ink.a]);
    let mut drawn = false;

    for (index, c) in chars.iter().enumerate() {
        let Some(rows) = glyph(*c) else {
            continue;
        };
        let glyph_x = index as u32 * (GLYPH_WIDTH + GLYPH_SPACING) * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let cell_x = glyph_x + col * scale;
                let cell_y = row as u32 * scale;
                for y in cell_y..cell_y + scale {
                    for x in cell_x..cell_x + scale {
                        layer.put_pixel(x, y, ink);
                    }
                }
                drawn = true;
            }
        }
    }

    drawn.then_some(layer)
}

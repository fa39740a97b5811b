//! The built-in profile table.
//!
//! Oscilloscope capture profiles turn the dark on-screen palette into a
//! printable one (black on white, dark trace colors) and cut away the
//! instrument's window chrome with fixed margins.

use super::{Profile, ProfileError};
use crate::extra_data::{parse_deflating_rect, parse_image_size};
use crate::imaging::{
    Color, ColorPair, InterpolationMode, Margins, PixelBuffer, Rect, TargetFormat,
    TransformError, crop, cropped_rectangle, remap_colors, remap_colors_and_crop, resize,
    rotate_180, stamp_watermark,
};

const WATERMARK_TEXT: &str = "DRAFT";
const WATERMARK_INK: Color = Color::rgba(0xFF, 0x00, 0x00, 70);
const TRANSPARENT_MARKER: Color = Color::rgba(0xFF, 0x00, 0x00, 0x00);
const GRID_GRAY: Color = Color::rgb(0x60, 0x60, 0x60);

const HANTEK_6022_COLORS: &[ColorPair] = &[
    // Background and border background
    ColorPair::new(Color::BLACK, Color::WHITE),
    ColorPair::new(Color::rgb(0x32, 0x32, 0x32), Color::WHITE),
    // Graph frame
    ColorPair::new(Color::rgb(0x71, 0x6F, 0x64), Color::BLACK),
    ColorPair::new(Color::rgb(0xF1, 0xEF, 0xE2), Color::BLACK),
    ColorPair::new(Color::rgb(0xAC, 0xA8, 0x99), Color::BLACK),
    // Axes
    ColorPair::new(Color::rgb(0xC8, 0xC8, 0xC8), GRID_GRAY),
    // Grid points
    ColorPair::new(Color::WHITE, Color::BLACK),
    // CH1, CH2
    ColorPair::new(Color::rgb(0xFF, 0xFF, 0x00), Color::DARK_BLUE),
    ColorPair::new(Color::rgb(0x00, 0xFF, 0x00), Color::DARK_RED),
    // Cursor
    ColorPair::new(Color::rgb(0x00, 0xC8, 0xFF), Color::DARK_MAGENTA),
    // Time scale
    ColorPair::new(Color::rgb(0xFF, 0x80, 0x00), Color::BLACK),
];

const HANTEK_DSO2090_COLORS: &[ColorPair] = &[
    ColorPair::new(Color::BLACK, Color::WHITE),
    ColorPair::new(Color::rgb(0x00, 0x4E, 0x98), Color::WHITE),
    // Text
    ColorPair::new(Color::WHITE, Color::BLACK),
    ColorPair::new(Color::rgb(0xAC, 0xA8, 0x99), Color::BLACK),
    // Grid
    ColorPair::new(Color::rgb(0x64, 0x64, 0x64), GRID_GRAY),
    // CH1
    ColorPair::new(Color::rgb(0x00, 0xFF, 0x00), Color::DARK_BLUE),
];

const PUTTY_COLORS: &[ColorPair] = &[
    ColorPair::new(Color::BLACK, Color::WHITE),
    ColorPair::new(Color::rgb(0xBB, 0xBB, 0xBB), Color::BLACK),
];

/// Every built-in profile, in listing order.
pub fn builtin_profiles() -> Vec<Profile> {
    vec![
        Profile::parameterized("resize", "Resize [Default Quality]", "50%", resize_to_size),
        Profile::parameterized("resize_hq", "Resize [HQ]", "W=64", resize_to_size)
            .interpolation(InterpolationMode::HighQualityBicubic),
        Profile::simple("crop_background", "Auto crop background +1", crop_background),
        Profile::parameterized(
            "crop_dimensions",
            "Crop dimensions",
            "10,20,10,20",
            crop_dimensions,
        ),
        Profile::simple(
            "make_background_transparent",
            "Make background transparent",
            make_background_transparent,
        ),
        Profile::simple("rotate_180", "Rotate 180º", rotate),
        Profile::simple("add_watermark", "Add watermark", add_watermark),
        Profile::with_format(
            "hantek6022_recolor_crop_annotations",
            "Hantek 6022 capture: Recolor + Crop to graph with annotations",
            hantek6022_annotations,
        ),
        Profile::with_format(
            "hantek6022_recolor_crop_graph",
            "Hantek 6022 capture: Recolor + Crop to graph",
            hantek6022_graph,
        ),
        Profile::with_format(
            "hantek_dso2090_recolor_crop_annotations",
            "Hantek DSO-2090 screenshot: Recolor + Crop to annotations",
            hantek_dso2090_annotations,
        ),
        Profile::with_format(
            "hantek_dso2090_recolor_crop_graph",
            "Hantek DSO-2090 screenshot: Recolor + Crop to graph",
            hantek_dso2090_graph,
        ),
        Profile::simple("putty_recolor", "Putty screenshot: Recolor", putty_recolor),
        Profile::simple(
            "custom_example",
            "A custom transformation example",
            resize_to_icon,
        )
        .hidden()
        .interpolation(InterpolationMode::HighQualityBicubic),
    ]
}

fn background_color(image: &PixelBuffer) -> Result<Color, TransformError> {
    image.get(0, 0).ok_or(TransformError::EmptyImage)
}

fn resize_to_size(
    image: &PixelBuffer,
    extra_data: &str,
    mode: InterpolationMode,
) -> Result<(PixelBuffer, Option<TargetFormat>), ProfileError> {
    let size = parse_image_size(extra_data, image.dimensions())?;
    Ok((resize(image, size.width, size.height, mode)?, None))
}

/// Crop away the border colored like pixel (0, 0), keeping one pixel of it.
fn crop_background(image: &PixelBuffer, _: InterpolationMode) -> Result<PixelBuffer, ProfileError> {
    let rect = cropped_rectangle(image, background_color(image)?, 1)?;
    Ok(crop(image, rect)?)
}

fn crop_dimensions(
    image: &PixelBuffer,
    extra_data: &str,
    _: InterpolationMode,
) -> Result<(PixelBuffer, Option<TargetFormat>), ProfileError> {
    let rect = parse_deflating_rect(extra_data, image.dimensions())?;
    if rect.is_empty() {
        return Err(TransformError::DegenerateCrop {
            width: image.width(),
            height: image.height(),
        }
        .into());
    }
    Ok((crop(image, rect)?, None))
}

/// The red marker color shows where transparency is unsupported.
///
/// Colors match on RGB, so every pixel sharing the corner's RGB is cleared
/// whatever the alpha of either.
fn make_background_transparent(
    image: &PixelBuffer,
    _: InterpolationMode,
) -> Result<PixelBuffer, ProfileError> {
    let map = [ColorPair::new(background_color(image)?, TRANSPARENT_MARKER)];
    Ok(remap_colors(image, &map)?)
}

fn rotate(image: &PixelBuffer, _: InterpolationMode) -> Result<PixelBuffer, ProfileError> {
    Ok(rotate_180(image))
}

fn add_watermark(image: &PixelBuffer, _: InterpolationMode) -> Result<PixelBuffer, ProfileError> {
    Ok(stamp_watermark(image, WATERMARK_TEXT, WATERMARK_INK))
}

fn recolor_within_margins(
    image: &PixelBuffer,
    color_map: &[ColorPair],
    margins: Margins,
) -> Result<(PixelBuffer, TargetFormat), ProfileError> {
    let rect = Rect::deflated(image.width(), image.height(), margins).ok_or(
        TransformError::DegenerateCrop {
            width: image.width(),
            height: image.height(),
        },
    )?;
    Ok((
        remap_colors_and_crop(image, color_map, rect)?,
        TargetFormat::Png,
    ))
}

fn hantek6022_annotations(
    image: &PixelBuffer,
    _: InterpolationMode,
) -> Result<(PixelBuffer, TargetFormat), ProfileError> {
    recolor_within_margins(image, HANTEK_6022_COLORS, Margins::new(0, 43, 17, 4))
}

fn hantek6022_graph(
    image: &PixelBuffer,
    _: InterpolationMode,
) -> Result<(PixelBuffer, TargetFormat), ProfileError> {
    recolor_within_margins(image, HANTEK_6022_COLORS, Margins::new(0, 43, 17, 23))
}

fn hantek_dso2090_annotations(
    image: &PixelBuffer,
    _: InterpolationMode,
) -> Result<(PixelBuffer, TargetFormat), ProfileError> {
    recolor_within_margins(image, HANTEK_DSO2090_COLORS, Margins::new(6, 50, 28, 26))
}

fn hantek_dso2090_graph(
    image: &PixelBuffer,
    _: InterpolationMode,
) -> Result<(PixelBuffer, TargetFormat), ProfileError> {
    recolor_within_margins(image, HANTEK_DSO2090_COLORS, Margins::new(6, 85, 28, 56))
}

fn putty_recolor(image: &PixelBuffer, _: InterpolationMode) -> Result<PixelBuffer, ProfileError> {
    Ok(remap_colors(image, PUTTY_COLORS)?)
}

fn resize_to_icon(image: &PixelBuffer, mode: InterpolationMode) -> Result<PixelBuffer, ProfileError> {
    Ok(resize(image, 64, 64, mode)?)
}

//! Image processing: pixel transforms and an `image`-crate codec.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate, behind [`ImageBackend`] |
//! | **Resize** | `image::imageops::resize`, filter from [`InterpolationMode`] |
//! | **Remap colors + crop** | stride-aware row copy over [`PixelBuffer`] |
//! | **Auto-crop detection** | border scan in [`cropped_rectangle`] |
//! | **Rotate 180°** | `image::imageops::rotate180` |
//! | **Watermark** | built-in bitmap font, `imageops::overlay` |
//!
//! The module is split into:
//! - **Pixels**: [`PixelBuffer`], [`Color`], [`Rect`], [`Margins`]
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: [`Quality`], [`InterpolationMode`], [`TargetFormat`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: the transforms profiles are built from

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod pixels;
pub mod rust_backend;
mod watermark;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{percent_of, resolve_resize_dimensions, scale_dimensions};
pub use operations::{
    ColorPair, TransformError, crop, cropped_rectangle, remap_colors, remap_colors_and_crop,
    resize, resize_factor, rotate_180,
};
pub use params::{InterpolationMode, Quality, TargetFormat};
pub use pixels::{Color, Margins, PixelBuffer, Rect};
pub use rust_backend::{RustBackend, supported_input_extensions};
pub use watermark::stamp_watermark;

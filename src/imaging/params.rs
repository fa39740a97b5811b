//! Parameter types for image operations.
//!
//! These types describe *how* a transform or an encode should behave, not the
//! pixels themselves. They sit between the profiles (which pick the values)
//! and the [`operations`](super::operations) and [`backend`](super::backend)
//! code (which act on them).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`InterpolationMode`]: Resampling quality used by resizes, chosen per profile.
//! - [`TargetFormat`]: Output file format with its canonical extension.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Resampling quality used when an image is resized.
///
/// Each profile declares one; it is fixed when the profile is activated and
/// handed explicitly to [`resize`](super::operations::resize).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    #[default]
    Default,
    NearestNeighbor,
    Bilinear,
    Bicubic,
    HighQualityBicubic,
}

impl InterpolationMode {
    /// Resampling filter of the `image` crate implementing this mode.
    pub fn filter(self) -> FilterType {
        match self {
            InterpolationMode::Default | InterpolationMode::Bilinear => FilterType::Triangle,
            InterpolationMode::NearestNeighbor => FilterType::Nearest,
            InterpolationMode::Bicubic => FilterType::CatmullRom,
            InterpolationMode::HighQualityBicubic => FilterType::Lanczos3,
        }
    }
}

/// Output file format of a conditioned image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Bmp,
    Png,
    Gif,
    Jpeg,
    Wmf,
    Tiff,
}

impl TargetFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Bmp => "bmp",
            TargetFormat::Png => "png",
            TargetFormat::Gif => "gif",
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Wmf => "wmf",
            TargetFormat::Tiff => "tiff",
        }
    }

    /// Infer the output format from a source extension.
    ///
    /// Only BMP, PNG and GIF are kept as-is; anything else is written as JPEG.
    pub fn infer_from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("bmp") {
            TargetFormat::Bmp
        } else if ext.eq_ignore_ascii_case("png") {
            TargetFormat::Png
        } else if ext.eq_ignore_ascii_case("gif") {
            TargetFormat::Gif
        } else {
            TargetFormat::Jpeg
        }
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TargetFormat::Bmp => "BMP",
            TargetFormat::Png => "PNG",
            TargetFormat::Gif => "GIF",
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Wmf => "WMF",
            TargetFormat::Tiff => "TIFF",
        };
        f.write_str(name)
    }
}

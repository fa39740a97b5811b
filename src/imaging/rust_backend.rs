//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (BMP, GIF, JPEG, PNG, TIFF) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha dropped, configurable quality) |
//! | Encode → BMP, GIF, PNG, TIFF | `image::DynamicImage::write_to` |
//! | Encode → WMF | not available, reported as [`BackendError::UnsupportedFormat`] |

use super::backend::{BackendError, ImageBackend};
use super::params::{Quality, TargetFormat};
use super::pixels::PixelBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const DECODABLE_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    DECODABLE_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Codec backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    jpeg_quality: Quality,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::with_quality(Quality::default())
    }

    pub fn with_quality(jpeg_quality: Quality) -> Self {
        Self { jpeg_quality }
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn image_format(format: TargetFormat) -> Option<ImageFormat> {
    match format {
        TargetFormat::Bmp => Some(ImageFormat::Bmp),
        TargetFormat::Png => Some(ImageFormat::Png),
        TargetFormat::Gif => Some(ImageFormat::Gif),
        TargetFormat::Jpeg => Some(ImageFormat::Jpeg),
        TargetFormat::Tiff => Some(ImageFormat::Tiff),
        TargetFormat::Wmf => None,
    }
}

fn write_image(
    image: DynamicImage,
    file: File,
    path: &Path,
    format: ImageFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let mut writer = BufWriter::new(file);
    let result = if format == ImageFormat::Jpeg {
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value() as u8);
        DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
    } else {
        image.write_to(&mut writer, format)
    };
    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })?;
    writer.flush()?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError> {
        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(PixelBuffer::from(image.into_rgba8()))
    }

    fn encode(
        &self,
        image: &PixelBuffer,
        path: &Path,
        format: TargetFormat,
    ) -> Result<(), BackendError> {
        let image_format = image_format(format).ok_or(BackendError::UnsupportedFormat(format))?;
        let file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(BackendError::TargetExists(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let result = write_image(
            DynamicImage::ImageRgba8(image.to_rgba_image()),
            file,
            path,
            image_format,
            self.jpeg_quality,
        );
        if result.is_err() {
            // The file was created above, so only our truncated output goes.
            let _ = std::fs::remove_file(path);
        }
        result
    }
}

//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the conditioning
//! engine needs from its imaging collaborator: decode a file into a
//! [`PixelBuffer`] and encode a buffer to a file of a given [`TargetFormat`].
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::TargetFormat;
use super::pixels::PixelBuffer;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("No encoder available for {0}")]
    UnsupportedFormat(TargetFormat),
    #[error("Target already exists: {}", .0.display())]
    TargetExists(PathBuf),
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Decode an image file into RGBA pixels.
    fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError>;

    /// Encode `image` to `path` in `format`, creating the file, never replacing one.
    ///
    /// A file already at `path` is left untouched and reported as
    /// [`BackendError::TargetExists`].
    fn encode(
        &self,
        image: &PixelBuffer,
        path: &Path,
        format: TargetFormat,
    ) -> Result<(), BackendError>;
}

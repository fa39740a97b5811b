//! Conditioning orchestration: one source image in, at most one new file out.
//!
//! ## Per-image flow
//!
//! ```text
//! resolve target path ──exists──▶ SkippedExisting (source not decoded)
//!        │
//!      decode ─▶ run profile ─▶ pick format ─▶ re-check target ──exists──▶ SkippedExisting
//!                                                    │
//!                                                  encode ─▶ Ok
//! ```
//!
//! The target is checked twice because a profile that chooses its own output
//! format changes the target extension (`shot.jpg` → `shot.png`), and that new
//! path may be taken already. A file that exists at the final target path is
//! never written to: the backend creates the target exclusively, so a file
//! that shows up after the last check still turns into `SkippedExisting`.
//!
//! ## Formats
//!
//! Profiles that leave the format open get one inferred from the source
//! extension (`bmp`, `png`, `gif` kept, anything else JPEG) and the target
//! keeps the source extension. An explicit format replaces the extension with
//! the canonical one for that format.
//!
//! Images are processed one at a time. Decoded buffers are owned by the call
//! and released before it returns, including on error paths.

use crate::imaging::{BackendError, ImageBackend, PixelBuffer, TargetFormat};
use crate::naming::{infer_format, target_path, with_format_extension};
use crate::profiles::{Capability, Profile, ProfileError, ProfileRegistry, RegistryError};
use crate::types::{ConditioningResult, ImageInfo, Operation};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Suffix inserted before the extension when writing next to the source.
pub const DEFAULT_SAME_DIR_SUFFIX: &str = "new";

#[derive(Error, Debug)]
pub enum ConditionError {
    #[error("No profile has been started")]
    NotStarted,
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Profile failed: {0}")]
    Profile(#[from] ProfileError),
    #[error("Image codec error: {0}")]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source path has no file name: {}", .0.display())]
    InvalidSource(PathBuf),
}

/// The profile selected for a batch, with its settings fixed.
#[derive(Debug, Clone)]
struct ActiveProfile<'a> {
    profile: &'a Profile,
    extra_data: Option<String>,
}

impl ActiveProfile<'_> {
    fn apply(
        &self,
        image: &PixelBuffer,
    ) -> Result<(PixelBuffer, Option<TargetFormat>), ProfileError> {
        let mode = self.profile.interpolation;
        match self.profile.capability {
            Capability::Simple(run) => Ok((run(image, mode)?, None)),
            Capability::WithFormat(run) => {
                let (conditioned, format) = run(image, mode)?;
                Ok((conditioned, Some(format)))
            }
            Capability::Parameterized(run) => {
                run(image, self.extra_data.as_deref().unwrap_or_default(), mode)
            }
        }
    }
}

/// Runs the selected profile over source images.
///
/// ```rust,no_run
/// use image_conditioner::condition::Conditioner;
/// use image_conditioner::imaging::RustBackend;
/// use image_conditioner::profiles::ProfileRegistry;
/// use std::path::Path;
///
/// let registry = ProfileRegistry::builtin()?;
/// let backend = RustBackend::new();
/// let mut conditioner = Conditioner::new(&registry, &backend);
/// conditioner.start("resize", Some("W=800"))?;
/// let result = conditioner.condition_image(Path::new("in/a.jpg"), Path::new("in/New"))?;
/// println!("{result}");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Conditioner<'a, B: ImageBackend> {
    registry: &'a ProfileRegistry,
    backend: &'a B,
    same_dir_suffix: String,
    active: Option<ActiveProfile<'a>>,
}

impl<'a, B: ImageBackend> Conditioner<'a, B> {
    pub fn new(registry: &'a ProfileRegistry, backend: &'a B) -> Self {
        Self {
            registry,
            backend,
            same_dir_suffix: DEFAULT_SAME_DIR_SUFFIX.to_string(),
            active: None,
        }
    }

    pub fn with_same_dir_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.same_dir_suffix = suffix.into();
        self
    }

    /// Select the profile used by subsequent calls.
    ///
    /// A parameterized profile started without extra data uses its default.
    /// Extra data given to a profile that takes none is ignored.
    pub fn start(
        &mut self,
        profile_id: &str,
        extra_data: Option<&str>,
    ) -> Result<&'a Profile, ConditionError> {
        let registry = self.registry;
        let profile = registry.get(profile_id)?;
        let extra_data = if profile.capability.takes_extra_data() {
            extra_data
                .or(profile.default_extra_data)
                .map(str::to_string)
        } else {
            if let Some(ignored) = extra_data {
                warn!(
                    profile = profile.identifier,
                    extra_data = ignored,
                    "profile takes no extra data, ignoring it"
                );
            }
            None
        };
        info!(
            profile = profile.identifier,
            capability = profile.capability.kind(),
            interpolation = ?profile.interpolation,
            extra_data = extra_data.as_deref(),
            "profile started"
        );
        self.active = Some(ActiveProfile {
            profile,
            extra_data,
        });
        Ok(profile)
    }

    pub fn active_profile(&self) -> Option<&'a Profile> {
        self.active.as_ref().map(|a| a.profile)
    }

    /// Extra data the active profile runs with, after default resolution.
    pub fn active_extra_data(&self) -> Option<&str> {
        self.active.as_ref().and_then(|a| a.extra_data.as_deref())
    }

    /// Condition one image into `target_dir`.
    ///
    /// `target_dir` must exist unless it is the source's own directory.
    #[instrument(skip_all, fields(source = %source.display()))]
    pub fn condition_image(
        &self,
        source: &Path,
        target_dir: &Path,
    ) -> Result<ConditioningResult, ConditionError> {
        let active = self.active.as_ref().ok_or(ConditionError::NotStarted)?;
        let mut target = target_path(source, target_dir, &self.same_dir_suffix)
            .ok_or_else(|| ConditionError::InvalidSource(source.to_path_buf()))?;
        if is_occupied(&target) {
            info!(target = %target.display(), "target exists, skipping");
            return Ok(ConditioningResult::skipped(source, target));
        }

        let (conditioned, explicit_format, source_image) = {
            let image = self.backend.decode(source)?;
            let source_image = ImageInfo {
                path: source.to_path_buf(),
                width: image.width(),
                height: image.height(),
                file_size: std::fs::metadata(source)?.len(),
            };
            debug!(
                width = source_image.width,
                height = source_image.height,
                "decoded"
            );
            let (conditioned, format) = active.apply(&image)?;
            (conditioned, format, source_image)
        };

        let format = match explicit_format {
            Some(format) => {
                target = with_format_extension(&target, format);
                if is_occupied(&target) {
                    info!(target = %target.display(), "target exists after format change, skipping");
                    return Ok(ConditioningResult {
                        operation: Operation::SkippedExisting,
                        source_image,
                        target_image: ImageInfo::at(target),
                    });
                }
                format
            }
            None => infer_format(source),
        };

        match self.backend.encode(&conditioned, &target, format) {
            Err(BackendError::TargetExists(_)) => {
                info!(target = %target.display(), "target appeared before encoding, skipping");
                return Ok(ConditioningResult {
                    operation: Operation::SkippedExisting,
                    source_image,
                    target_image: ImageInfo::at(target),
                });
            }
            result => result?,
        }
        let target_image = ImageInfo {
            width: conditioned.width(),
            height: conditioned.height(),
            file_size: std::fs::metadata(&target)?.len(),
            path: target,
        };
        info!(
            target = %target_image.path.display(),
            %format,
            width = target_image.width,
            height = target_image.height,
            "conditioned"
        );
        Ok(ConditioningResult {
            operation: Operation::Ok,
            source_image,
            target_image,
        })
    }

    /// Condition `sources` in order into `target_dir`, creating it if needed.
    ///
    /// A failing image is reported in its slot and does not stop the rest.
    pub fn condition_batch(
        &self,
        sources: &[PathBuf],
        target_dir: &Path,
    ) -> Result<Vec<Result<ConditioningResult, ConditionError>>, ConditionError> {
        if self.active.is_none() {
            return Err(ConditionError::NotStarted);
        }
        std::fs::create_dir_all(target_dir)?;

        Ok(sources
            .iter()
            .map(|source| {
                let result = self.condition_image(source, target_dir);
                if let Err(e) = &result {
                    warn!(source = %source.display(), error = %e, "conditioning failed");
                }
                result
            })
            .collect())
    }
}

/// Anything at `path`, dangling symlinks included, blocks the write.
fn is_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{Color, Rect, TransformError};
    use crate::test_helpers::framed_buffer;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> ProfileRegistry {
        ProfileRegistry::builtin().unwrap()
    }

    /// A source file on disk; the mock backend never reads its content.
    fn source_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; 2048]).unwrap();
        path
    }

    fn encodes(backend: &MockBackend) -> Vec<RecordedOp> {
        backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Encode { .. }))
            .collect()
    }

    #[test]
    fn condition_before_start_fails() {
        let registry = registry();
        let backend = MockBackend::new();
        let conditioner = Conditioner::new(&registry, &backend);
        let tmp = TempDir::new().unwrap();

        assert!(matches!(
            conditioner.condition_image(&tmp.path().join("a.png"), tmp.path()),
            Err(ConditionError::NotStarted)
        ));
        assert!(matches!(
            conditioner.condition_batch(&[], tmp.path()),
            Err(ConditionError::NotStarted)
        ));
    }

    #[test]
    fn start_unknown_profile_fails() {
        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend);
        assert!(matches!(
            conditioner.start("sharpen", None),
            Err(ConditionError::Registry(RegistryError::UnknownProfile(_)))
        ));
        assert!(conditioner.active_profile().is_none());
    }

    #[test]
    fn start_resolves_default_extra_data() {
        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend);

        conditioner.start("resize", None).unwrap();
        assert_eq!(conditioner.active_extra_data(), Some("50%"));

        conditioner.start("resize", Some("W=10")).unwrap();
        assert_eq!(conditioner.active_extra_data(), Some("W=10"));

        conditioner.start("rotate_180", Some("ignored")).unwrap();
        assert_eq!(conditioner.active_extra_data(), None);
        assert_eq!(conditioner.active_profile().unwrap().identifier, "rotate_180");
    }

    #[test]
    fn second_run_skips_existing_target() {
        let tmp = TempDir::new().unwrap();
        let target_dir = tmp.path().join("New");
        fs::create_dir(&target_dir).unwrap();
        let source = source_file(tmp.path(), "a.png");

        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("rotate_180", None).unwrap();

        let first = conditioner.condition_image(&source, &target_dir).unwrap();
        assert_eq!(first.operation, Operation::Ok);
        assert_eq!(first.source_image.file_size, 2048);
        assert_eq!((first.source_image.width, first.source_image.height), (4, 4));
        assert_eq!(first.target_image.path, target_dir.join("a.png"));
        let written = fs::read(&first.target_image.path).unwrap();

        let second = conditioner.condition_image(&source, &target_dir).unwrap();
        assert_eq!(second.operation, Operation::SkippedExisting);
        assert_eq!(second.target_image.path, target_dir.join("a.png"));
        assert_eq!(fs::read(target_dir.join("a.png")).unwrap(), written);

        let decodes = backend
            .get_operations()
            .iter()
            .filter(|op| matches!(op, RecordedOp::Decode(_)))
            .count();
        assert_eq!(decodes, 1, "skipped image must not be decoded");
    }

    #[test]
    fn same_directory_inserts_suffix() {
        let tmp = TempDir::new().unwrap();
        let source = source_file(tmp.path(), "x.png");

        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("rotate_180", None).unwrap();

        let result = conditioner.condition_image(&source, tmp.path()).unwrap();
        assert_eq!(result.target_image.path, tmp.path().join("x.new.png"));
        assert!(tmp.path().join("x.new.png").exists());
    }

    #[test]
    fn custom_same_dir_suffix() {
        let tmp = TempDir::new().unwrap();
        let source = source_file(tmp.path(), "x.gif");

        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend).with_same_dir_suffix("done");
        conditioner.start("rotate_180", None).unwrap();

        let result = conditioner.condition_image(&source, tmp.path()).unwrap();
        assert_eq!(result.target_image.path, tmp.path().join("x.done.gif"));
    }

    #[test]
    fn explicit_format_changes_extension() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        let source = source_file(tmp.path(), "shot.jpg");

        let registry = registry();
        let backend = MockBackend::with_images(vec![PixelBuffer::new(100, 100, Color::BLACK)]);
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("hantek6022_recolor_crop_graph", None).unwrap();

        let result = conditioner.condition_image(&source, &out).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.target_image.path, out.join("shot.png"));
        assert_eq!(
            encodes(&backend),
            vec![RecordedOp::Encode {
                output: out.join("shot.png").to_string_lossy().to_string(),
                width: 83,
                height: 34,
                format: TargetFormat::Png,
            }]
        );
    }

    #[test]
    fn explicit_format_collision_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("shot.png"), b"keep me").unwrap();
        let source = source_file(tmp.path(), "shot.jpg");

        let registry = registry();
        let backend = MockBackend::with_images(vec![PixelBuffer::new(100, 100, Color::BLACK)]);
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("hantek6022_recolor_crop_graph", None).unwrap();

        let result = conditioner.condition_image(&source, &out).unwrap();
        assert_eq!(result.operation, Operation::SkippedExisting);
        assert_eq!(result.source_image.width, 100);
        assert_eq!(result.target_image.path, out.join("shot.png"));
        assert_eq!(fs::read(out.join("shot.png")).unwrap(), b"keep me");
        assert!(encodes(&backend).is_empty());
    }

    /// Puts a foreign file at `occupy` while the source is being decoded.
    struct OccupyOnDecode {
        inner: MockBackend,
        occupy: PathBuf,
    }

    impl ImageBackend for OccupyOnDecode {
        fn decode(&self, path: &Path) -> Result<PixelBuffer, BackendError> {
            fs::write(&self.occupy, b"written by someone else")?;
            self.inner.decode(path)
        }

        fn encode(
            &self,
            image: &PixelBuffer,
            path: &Path,
            format: TargetFormat,
        ) -> Result<(), BackendError> {
            self.inner.encode(image, path, format)
        }
    }

    #[test]
    fn target_appearing_after_the_checks_is_skipped_and_kept() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        let source = source_file(tmp.path(), "shot.png");

        let registry = registry();
        let backend = OccupyOnDecode {
            inner: MockBackend::new(),
            occupy: out.join("shot.png"),
        };
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("rotate_180", None).unwrap();

        let result = conditioner.condition_image(&source, &out).unwrap();
        assert_eq!(result.operation, Operation::SkippedExisting);
        assert_eq!(result.target_image.path, out.join("shot.png"));
        assert_eq!(
            fs::read(out.join("shot.png")).unwrap(),
            b"written by someone else"
        );
    }

    #[test]
    fn inferred_format_keeps_source_extension() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        let bmp = source_file(tmp.path(), "a.BMP");
        let tiff = source_file(tmp.path(), "b.tiff");

        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("rotate_180", None).unwrap();

        conditioner.condition_image(&bmp, &out).unwrap();
        let result = conditioner.condition_image(&tiff, &out).unwrap();
        assert_eq!(result.target_image.path, out.join("b.tiff"));

        let formats: Vec<TargetFormat> = encodes(&backend)
            .into_iter()
            .map(|op| match op {
                RecordedOp::Encode { format, .. } => format,
                RecordedOp::Decode(_) => unreachable!(),
            })
            .collect();
        assert_eq!(formats, vec![TargetFormat::Bmp, TargetFormat::Jpeg]);
    }

    #[test]
    fn parameterized_profile_uses_default_when_started_without_extra_data() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        let source = source_file(tmp.path(), "a.png");

        let registry = registry();
        let backend = MockBackend::with_images(vec![PixelBuffer::new(200, 100, Color::RED)]);
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("resize", None).unwrap();

        let result = conditioner.condition_image(&source, &out).unwrap();
        assert_eq!(
            (result.target_image.width, result.target_image.height),
            (100, 50)
        );
    }

    #[test]
    fn malformed_extra_data_fails_without_writing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        let source = source_file(tmp.path(), "a.png");

        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("resize", Some("huge")).unwrap();

        assert!(matches!(
            conditioner.condition_image(&source, &out),
            Err(ConditionError::Profile(ProfileError::Format(_)))
        ));
        assert!(!out.join("a.png").exists());
    }

    #[test]
    fn missing_source_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let registry = registry();
        let backend = MockBackend::new();
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("rotate_180", None).unwrap();

        let out = tmp.path().join("out");
        fs::create_dir(&out).unwrap();
        assert!(matches!(
            conditioner.condition_image(&tmp.path().join("ghost.png"), &out),
            Err(ConditionError::Io(_))
        ));
    }

    #[test]
    fn batch_creates_target_dir_and_continues_after_failure() {
        let tmp = TempDir::new().unwrap();
        let sources = vec![
            source_file(tmp.path(), "framed.png"),
            source_file(tmp.path(), "blank.png"),
        ];
        let target_dir = tmp.path().join("New");

        // The mock hands out buffers last-first.
        let backend = MockBackend::with_images(vec![
            PixelBuffer::new(6, 6, Color::WHITE),
            framed_buffer(6, 6, Color::WHITE, Rect::new(2, 2, 2, 2), Color::BLACK),
        ]);
        let registry = registry();
        let mut conditioner = Conditioner::new(&registry, &backend);
        conditioner.start("crop_background", None).unwrap();

        let results = conditioner.condition_batch(&sources, &target_dir).unwrap();
        assert_eq!(results.len(), 2);

        let first = results[0].as_ref().unwrap();
        assert_eq!((first.target_image.width, first.target_image.height), (4, 4));
        assert!(matches!(
            results[1],
            Err(ConditionError::Profile(ProfileError::Transform(
                TransformError::EmptyImage
            )))
        ));
        assert!(target_dir.join("framed.png").exists());
        assert!(!target_dir.join("blank.png").exists());
    }
}

//! Result types shared by the orchestrator, the console output and the
//! JSON batch report.
//!
//! Front-ends only read these; they are created once per processed image.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to one source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Nothing was attempted.
    #[default]
    None,
    Ok,
    /// A file already existed at the target path and was left untouched.
    SkippedExisting,
}

/// Path, pixel dimensions and on-disk size of one image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
}

impl ImageInfo {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// File size in whole KiB.
    pub fn kilobytes(&self) -> u64 {
        self.file_size >> 10
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditioningResult {
    pub operation: Operation,
    pub source_image: ImageInfo,
    pub target_image: ImageInfo,
}

impl ConditioningResult {
    /// The target at `target` already exists; `source` was not decoded.
    pub fn skipped(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            operation: Operation::SkippedExisting,
            source_image: ImageInfo::at(source),
            target_image: ImageInfo::at(target),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.operation == Operation::Ok
    }

    pub fn is_skipped(&self) -> bool {
        self.operation == Operation::SkippedExisting
    }
}

/// One tab-separated console line.
///
/// ```text
/// 640x480 120KB	320x240 35KB	photo.jpg
/// Skipped because existing! photo.jpg
/// ```
impl fmt::Display for ConditioningResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (source, target) = (&self.source_image, &self.target_image);
        match self.operation {
            Operation::Ok => write!(
                f,
                "{}x{} {}KB\t{}x{} {}KB\t{}",
                source.width,
                source.height,
                source.kilobytes(),
                target.width,
                target.height,
                target.kilobytes(),
                target.file_name()
            ),
            Operation::SkippedExisting => {
                write!(f, "Skipped because existing! {}", target.file_name())
            }
            Operation::None => Ok(()),
        }
    }
}

/// JSON report written after a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<String>,
    pub target_dir: PathBuf,
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub source: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ConditioningResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportEntry {
    pub fn new<E: fmt::Display>(
        source: impl Into<PathBuf>,
        outcome: &Result<ConditioningResult, E>,
    ) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result.clone()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            source: source.into(),
            result,
            error,
        }
    }
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.count(|r| r.is_ok())
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| r.is_skipped())
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    fn count(&self, predicate: impl Fn(&ConditioningResult) -> bool) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref())
            .filter(|r| predicate(r))
            .count()
    }
}

//! CLI output formatting.
//!
//! # Output Format
//!
//! ## list
//!
//! ```text
//! resize                        Resize [Default Quality]  [default: 50%]
//! crop_background               Auto crop background +1
//! ```
//!
//! ## run
//!
//! ```text
//! Profile: Resize [Default Quality] (resize)
//!     Extra data: 50%
//!     Target: shots/New
//! 640x480 120KB	320x240 35KB	a.jpg
//! Skipped because existing! b.png
//! Failed c.png: Profile failed: Empty image: every pixel has the crop color
//!
//! Conditioned 1, skipped 1, failed 1
//! ```
//!
//! Result lines are the tab-separated [`ConditioningResult`] display form, so
//! they can be piped into `cut` or a spreadsheet.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::profiles::{Profile, ProfileRegistry};
use crate::types::{BatchReport, ConditioningResult};
use std::fmt::Display;
use std::path::Path;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// list
// ============================================================================

/// One line per visible profile: identifier, caption, default extra data.
pub fn format_profile_list(registry: &ProfileRegistry) -> Vec<String> {
    let width = registry
        .list()
        .map(|p| p.identifier.len())
        .max()
        .unwrap_or(0);
    registry
        .list()
        .map(|p| profile_line(p, width))
        .collect()
}

fn profile_line(profile: &Profile, width: usize) -> String {
    let line = format!("{:<width$}  {}", profile.identifier, profile.caption);
    match profile.default_extra_data {
        Some(extra) => format!("{line}  [default: {extra}]"),
        None => line,
    }
}

pub fn print_profile_list(registry: &ProfileRegistry) {
    for line in format_profile_list(registry) {
        println!("{line}");
    }
}

// ============================================================================
// run
// ============================================================================

pub fn format_run_header(
    profile: &Profile,
    extra_data: Option<&str>,
    target_dir: &Path,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Profile: {} ({})",
        profile.caption, profile.identifier
    )];
    if let Some(extra) = extra_data {
        lines.push(format!("    Extra data: {extra}"));
    }
    lines.push(format!("    Target: {}", target_dir.display()));
    lines
}

pub fn print_run_header(profile: &Profile, extra_data: Option<&str>, target_dir: &Path) {
    for line in format_run_header(profile, extra_data, target_dir) {
        println!("{line}");
    }
}

/// The console line for one conditioned source.
pub fn format_result_line<E: Display>(
    source: &Path,
    outcome: &Result<ConditioningResult, E>,
) -> String {
    match outcome {
        Ok(result) => result.to_string(),
        Err(e) => format!("Failed {}: {e}", file_name(source)),
    }
}

pub fn print_result_line<E: Display>(source: &Path, outcome: &Result<ConditioningResult, E>) {
    println!("{}", format_result_line(source, outcome));
}

pub fn format_summary(report: &BatchReport) -> String {
    format!(
        "Conditioned {}, skipped {}, failed {}",
        report.succeeded(),
        report.skipped(),
        report.failed()
    )
}

pub fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", format_summary(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageInfo, Operation, ReportEntry};
    use pretty_assertions::assert_eq;

    #[test]
    fn profile_list_aligns_captions_and_shows_defaults() {
        let registry = ProfileRegistry::builtin().unwrap();
        let lines = format_profile_list(&registry);

        assert_eq!(lines.len(), 12);
        let width = "hantek_dso2090_recolor_crop_annotations".len();
        assert_eq!(
            lines[0],
            format!(
                "{:<width$}  Resize [Default Quality]  [default: 50%]",
                "resize"
            )
        );
        assert!(lines.iter().all(|l| !l.starts_with("custom_example")));
        assert!(
            lines
                .iter()
                .any(|l| l.starts_with("rotate_180") && !l.contains("[default:"))
        );
    }

    #[test]
    fn run_header_with_and_without_extra_data() {
        let registry = ProfileRegistry::builtin().unwrap();
        let resize = registry.get("resize").unwrap();
        assert_eq!(
            format_run_header(resize, Some("W=64"), Path::new("out")),
            vec![
                "Profile: Resize [Default Quality] (resize)",
                "    Extra data: W=64",
                "    Target: out",
            ]
        );

        let rotate = registry.get("rotate_180").unwrap();
        assert_eq!(format_run_header(rotate, None, Path::new("out")).len(), 2);
    }

    #[test]
    fn result_lines() {
        let ok = ConditioningResult {
            operation: Operation::Ok,
            source_image: ImageInfo {
                path: "in/a.png".into(),
                width: 4,
                height: 2,
                file_size: 4096,
            },
            target_image: ImageInfo {
                path: "out/a.png".into(),
                width: 2,
                height: 1,
                file_size: 2048,
            },
        };
        assert_eq!(
            format_result_line(Path::new("in/a.png"), &Ok::<_, String>(ok)),
            "4x2 4KB\t2x1 2KB\ta.png"
        );
        assert_eq!(
            format_result_line(
                Path::new("in/b.png"),
                &Err::<ConditioningResult, _>("decode failed")
            ),
            "Failed b.png: decode failed"
        );
    }

    #[test]
    fn summary_counts() {
        let report = BatchReport {
            profile: "rotate_180".into(),
            extra_data: None,
            target_dir: "out".into(),
            entries: vec![
                ReportEntry::new(
                    "a.png",
                    &Ok::<_, String>(ConditioningResult::skipped("a.png", "out/a.png")),
                ),
                ReportEntry::new("b.png", &Err::<ConditioningResult, _>("bad")),
            ],
        };
        assert_eq!(format_summary(&report), "Conditioned 0, skipped 1, failed 1");
    }
}

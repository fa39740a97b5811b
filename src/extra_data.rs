//! Parsers for the free-form "extra data" strings of parameterized profiles.
//!
//! A profile that takes parameters receives them as one caller-owned string
//! (`"50%"`, `"800x600"`, `"10,20,10,20"`). The string means nothing until the
//! profile hands it to one of the parsers here, together with the size of the
//! image it applies to, so relative values can be resolved.
//!
//! ## Size grammar
//!
//! Tried in order:
//!
//! | Input | Width | Height |
//! |-------|-------|--------|
//! | `800x600` | 800 | 600 |
//! | `W=800` / `w=800` | 800 | 0 (derived later) |
//! | `H=600` | 0 (derived later) | 600 |
//! | `50%` | 50% of source | 50% of source |
//!
//! Any field may be a percentage of the matching source dimension
//! (`50%x100`), rounded half away from zero.
//!
//! ## Deflating rectangle grammar
//!
//! `left,top,right,bottom` margins, all non-negative integers. When the
//! margins leave no pixels the result is the zero [`Rect`], which callers must
//! check for explicitly.

use crate::imaging::{Margins, Rect, percent_of};
use thiserror::Error;

const SIZE_GRAMMAR: &str = "'width x height', 'percentage %', 'W=width' or 'H=height'";
const SIZE_EXAMPLES: &str = "Examples: '800x600', '50%', 'W=800', 'H=600'";
const RECT_GRAMMAR: &str = "'left_margin, top_margin, right_margin, bottom_margin'";
const RECT_EXAMPLES: &str = "Example: '10,20,10,20'";

/// Malformed extra data. The message echoes the accepted grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Extra data must have the format {grammar}\n{examples}\n\nAdditional info:\n{detail}")]
pub struct FormatError {
    pub grammar: &'static str,
    pub examples: &'static str,
    pub detail: String,
}

impl FormatError {
    fn size(detail: impl Into<String>) -> Self {
        Self {
            grammar: SIZE_GRAMMAR,
            examples: SIZE_EXAMPLES,
            detail: detail.into(),
        }
    }

    fn rect(detail: impl Into<String>) -> Self {
        Self {
            grammar: RECT_GRAMMAR,
            examples: RECT_EXAMPLES,
            detail: detail.into(),
        }
    }
}

/// Absolute target size. A 0 side means "derive from the aspect ratio".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Parse a size specifier against the size of the source image.
pub fn parse_image_size(text: &str, source: (u32, u32)) -> Result<TargetSize, FormatError> {
    if text.is_empty() {
        return Err(FormatError::size("'ExtraData' cannot be an empty string"));
    }

    let (width_text, height_text) = split_size_fields(text);
    let width = parse_dimension(width_text, source.0)?;
    let height = parse_dimension(height_text, source.1)?;

    if width == 0 && height == 0 {
        return Err(FormatError::size(
            "No valid values provided for width and height",
        ));
    }
    Ok(TargetSize::new(width, height))
}

/// Pick the width and height fields out of a size specifier.
fn split_size_fields(text: &str) -> (&str, &str) {
    let by_x: Vec<&str> = text.split('x').collect();
    if let [width, height] = by_x.as_slice() {
        return (*width, *height);
    }

    let by_eq: Vec<&str> = text.split('=').collect();
    if let [dimension, value] = by_eq.as_slice() {
        return match dimension.trim() {
            d if d.eq_ignore_ascii_case("W") => (*value, "0"),
            d if d.eq_ignore_ascii_case("H") => ("0", *value),
            _ => ("0", "0"),
        };
    }

    (text, text)
}

/// Parse one dimension: a plain integer or a percentage of `source`.
fn parse_dimension(field: &str, source: u32) -> Result<u32, FormatError> {
    if field.contains('%') {
        let number = field.trim_end_matches(['%', ' ']).trim();
        let percent: f64 = number
            .parse()
            .map_err(|e| FormatError::size(format!("Invalid percentage '{field}': {e}")))?;
        if !percent.is_finite() || percent < 0.0 {
            return Err(FormatError::size(format!(
                "Invalid percentage '{field}': must be a non-negative number"
            )));
        }
        return Ok(percent_of(percent, source));
    }

    field
        .trim()
        .parse::<u32>()
        .map_err(|e| FormatError::size(format!("Invalid dimension '{field}': {e}")))
}

/// Parse deflating margins and apply them to a `source`-sized rectangle.
///
/// Returns `Rect::default()` (all zeros) when the margins leave no pixels.
pub fn parse_deflating_rect(text: &str, source: (u32, u32)) -> Result<Rect, FormatError> {
    let fields: Vec<&str> = text.split(',').collect();
    let [left, top, right, bottom] = fields.as_slice() else {
        return Err(FormatError::rect(format!(
            "Expected 4 comma-separated values, found {}",
            fields.len()
        )));
    };
    let margins = Margins::new(
        parse_margin(left)?,
        parse_margin(top)?,
        parse_margin(right)?,
        parse_margin(bottom)?,
    );
    Ok(Rect::deflated(source.0, source.1, margins).unwrap_or_default())
}

fn parse_margin(field: &str) -> Result<u32, FormatError> {
    field
        .trim()
        .parse::<u32>()
        .map_err(|e| FormatError::rect(format!("Invalid margin '{field}': {e}")))
}

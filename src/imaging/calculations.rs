//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Rounding is half away from zero (`f64::round`) throughout, so `2.5 → 3`.

/// Round a non-negative floating-point dimension to the nearest pixel count.
///
/// Negative and NaN inputs collapse to 0; values past `u32::MAX` saturate.
pub fn round_dimension(value: f64) -> u32 {
    // `as` saturates and maps NaN to 0.
    value.round() as u32
}

/// Resolve a resize target where one side may be 0 ("keep aspect ratio").
///
/// Returns `None` when both targets are 0 or the source is empty.
///
/// # Examples
/// ```
/// # use image_conditioner::imaging::resolve_resize_dimensions;
/// // 400x200 → width 800, height derived
/// assert_eq!(resolve_resize_dimensions((400, 200), (800, 0)), Some((800, 400)));
///
/// // 400x200 → height 50, width derived
/// assert_eq!(resolve_resize_dimensions((400, 200), (0, 50)), Some((100, 50)));
/// ```
pub fn resolve_resize_dimensions(source: (u32, u32), target: (u32, u32)) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if src_w == 0 || src_h == 0 {
        return None;
    }

    match (tgt_w, tgt_h) {
        (0, 0) => None,
        (0, h) => Some((round_dimension(src_w as f64 * h as f64 / src_h as f64), h)),
        (w, 0) => Some((w, round_dimension(src_h as f64 * w as f64 / src_w as f64))),
        (w, h) => Some((w, h)),
    }
}

/// Scale both source dimensions by independent factors.
pub fn scale_dimensions(source: (u32, u32), factors: (f64, f64)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (w_factor, h_factor) = factors;
    (
        round_dimension(src_w as f64 * w_factor),
        round_dimension(src_h as f64 * h_factor),
    )
}

/// Resolve a percentage of a source dimension (`50.0` → half).
pub fn percent_of(percent: f64, dimension: u32) -> u32 {
    round_dimension(percent / 100.0 * dimension as f64)
}

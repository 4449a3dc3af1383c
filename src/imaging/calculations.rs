//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every derived pixel value goes through [`round_dimension`], so the whole
//! crate shares one rounding policy: round half away from zero, clamp to ≥ 1.

use crate::types::SizeUnit;

/// Smallest allowed scale, in percent.
pub const MIN_PERCENTAGE: f64 = 1.0;
/// Largest allowed scale, in percent.
pub const MAX_PERCENTAGE: f64 = 500.0;

/// Round a derived dimension to whole pixels, never below 1.
///
/// # Examples
/// ```
/// # use pixfit::imaging::calculations::round_dimension;
/// assert_eq!(round_dimension(539.5), 540);
/// assert_eq!(round_dimension(0.2), 1);
/// ```
pub fn round_dimension(value: f64) -> u32 {
    let rounded = value.round();
    if rounded < 1.0 {
        1
    } else if rounded > u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Accept a raw form value as a pixel count.
///
/// Returns `None` for NaN, infinities, and anything that is not strictly
/// positive, which is how a half-typed or cleared field shows up.
pub fn parse_dimension(value: f64) -> Option<u32> {
    if value.is_finite() && value > 0.0 {
        Some(round_dimension(value))
    } else {
        None
    }
}

/// Height that keeps `aspect` (`width / height`) for a given width.
pub fn height_for_width(width: u32, aspect: f64) -> u32 {
    round_dimension(width as f64 / aspect)
}

/// Width that keeps `aspect` (`width / height`) for a given height.
pub fn width_for_height(height: u32, aspect: f64) -> u32 {
    round_dimension(height as f64 * aspect)
}

/// Whole-number percentage of `original` that `value` represents.
pub fn percentage_of(value: u32, original: u32) -> f64 {
    (value as f64 / original as f64 * 100.0).round()
}

/// Clamp a percentage into the supported `[1, 500]` range.
pub fn clamp_percentage(percentage: f64) -> f64 {
    percentage.clamp(MIN_PERCENTAGE, MAX_PERCENTAGE)
}

/// Scale original dimensions by a percentage.
///
/// # Examples
/// ```
/// # use pixfit::imaging::calculations::scale_dimensions;
/// assert_eq!(scale_dimensions((1920, 1080), 150.0), (2880, 1620));
/// ```
pub fn scale_dimensions(original: (u32, u32), percentage: f64) -> (u32, u32) {
    let (w, h) = original;
    let factor = percentage / 100.0;
    (
        round_dimension(w as f64 * factor),
        round_dimension(h as f64 * factor),
    )
}

/// Convert a user-facing size target to bytes.
///
/// Returns `None` unless `size` is a positive finite number.
pub fn target_bytes(size: f64, unit: SizeUnit) -> Option<u64> {
    if !size.is_finite() || size <= 0.0 {
        return None;
    }
    let bytes = (size * unit.bytes() as f64).round();
    if bytes < 1.0 { None } else { Some(bytes as u64) }
}

//! Value axis bounds for the savings and balance charts.
//!
//! The floor prefers the smallest positive sample: financial series are
//! dominated by positive magnitudes, and a single zero or negative entry
//! should not drag the whole axis down. Zero and negative samples only set
//! the floor when nothing positive exists.

use shared::AxisBounds;

/// Compute rounded `(max, min)` bounds for `samples`, or `None` when there is
/// no finite sample.
///
/// `vertical_padding_fraction` widens both ends by that fraction of the data
/// span before rounding. Negative or non-finite padding is treated as zero.
/// Equal bounds are returned as-is; the chart geometry widens them.
pub fn compute_bounds(samples: &[f64], vertical_padding_fraction: f64) -> Option<AxisBounds> {
    let finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }

    let raw_max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let smallest_positive = finite
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .fold(f64::INFINITY, f64::min);
    let raw_min = if smallest_positive.is_finite() {
        smallest_positive
    } else {
        finite.iter().copied().fold(f64::INFINITY, f64::min)
    };

    let padding = sanitize_padding(vertical_padding_fraction);
    let diff = raw_max - raw_min;

    Some(AxisBounds::new(
        round_off_max(raw_max, diff, padding),
        round_off_min(raw_min, diff, padding),
    ))
}

/// Pad `value` upwards by `padding * diff` and round up to the magnitude step
pub fn round_off_max(value: f64, diff: f64, padding: f64) -> f64 {
    let offset = value + padding_amount(diff, padding);
    match rounding_step(offset) {
        Some(step) => (offset / step).ceil() * step,
        None => offset,
    }
}

/// Pad `value` downwards by `padding * diff` and round away from the data
pub fn round_off_min(value: f64, diff: f64, padding: f64) -> f64 {
    let offset = value - padding_amount(diff, padding);
    match rounding_step(offset) {
        Some(step) if offset >= 0.0 => (offset / step).floor() * step,
        Some(step) => -((offset.abs() / step).ceil() * step),
        None => offset,
    }
}

/// 100 from a magnitude of 1000, 10 from 100, nothing below that
fn rounding_step(offset: f64) -> Option<f64> {
    let magnitude = offset.abs();
    if magnitude >= 1000.0 {
        Some(100.0)
    } else if magnitude >= 100.0 {
        Some(10.0)
    } else {
        None
    }
}

fn padding_amount(diff: f64, padding: f64) -> f64 {
    // 0 * inf is NaN; an unpadded axis must stay finite
    if padding == 0.0 || diff == 0.0 {
        0.0
    } else {
        padding * diff
    }
}

fn sanitize_padding(padding: f64) -> f64 {
    if padding.is_finite() && padding > 0.0 {
        padding
    } else {
        0.0
    }
}

use canny_image::Image;

use super::hysteresis::hysteresis_threshold;
use crate::{
    core::percentile,
    error::{ensure_unit_interval, EdgeError},
};

/// Check the pixel proportions used to derive the hysteresis thresholds.
///
/// Only the range is checked. Their order shows up in the thresholds they
/// produce, see [`hysteresis_threshold_auto`].
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if a proportion is outside `[0, 1]`.
pub fn check_proportions(low_prop: f32, high_prop: f32) -> Result<(), EdgeError> {
    ensure_unit_interval("low_prop", low_prop)?;
    ensure_unit_interval("high_prop", high_prop)
}

/// Compute the hysteresis thresholds that keep a given proportion of the pixels above them.
///
/// The low threshold is the `(1 - low_prop)` percentile of the edge strengths
/// and the high threshold the `(1 - high_prop)` percentile, see [`percentile`].
///
/// # Returns
///
/// The `(low, high)` thresholds.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if a proportion is outside `[0, 1]`
/// and [`EdgeError::DegenerateInput`] if the image is empty.
pub fn auto_thresholds(
    src: &Image<f32, 1>,
    low_prop: f32,
    high_prop: f32,
) -> Result<(f32, f32), EdgeError> {
    check_proportions(low_prop, high_prop)?;

    let low = percentile(src, (1.0 - low_prop as f64) * 100.0)?;
    let high = percentile(src, (1.0 - high_prop as f64) * 100.0)?;

    log::debug!("auto thresholds: low_prop={low_prop} -> {low}, high_prop={high_prop} -> {high}");

    Ok((low, high))
}

/// Binarize an edge strength image with thresholds derived from pixel proportions.
///
/// The thresholds come from [`auto_thresholds`] and are passed to
/// [`hysteresis_threshold`]. With `high_prop <= low_prop` the high threshold
/// is not below the low one.
///
/// # Arguments
///
/// * `src` - The edge strength image with values in `[0, 1]`.
/// * `dst` - The destination binary image with values in `{0, 1}`.
/// * `low_prop` - The proportion of pixels expected above the low threshold.
/// * `high_prop` - The proportion of pixels expected above the high threshold.
///
/// # Errors
///
/// Returns the errors of [`auto_thresholds`] and [`hysteresis_threshold`]; in
/// particular `high_prop > low_prop` usually yields a low threshold above the
/// high one.
pub fn hysteresis_threshold_auto(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    low_prop: f32,
    high_prop: f32,
) -> Result<(), EdgeError> {
    let (low, high) = auto_thresholds(src, low_prop, high_prop)?;
    hysteresis_threshold(src, dst, low, high)
}

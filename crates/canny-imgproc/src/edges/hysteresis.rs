use canny_image::Image;

use super::labeling::connected_components;
use crate::{
    error::{ensure_same_size, ensure_unit_interval, EdgeError},
    parallel,
};

/// Quantize a `[0, 1]` edge strength to the `0..=255` levels used by the hysteresis.
///
/// The value is scaled by 255 in double precision and truncated, saturating
/// out of range values. NaN maps to 0.
///
/// # Example
///
/// ```
/// use canny_imgproc::edges::quantize;
///
/// assert_eq!(quantize(1.0), 255);
/// assert_eq!(quantize(0.5), 127);
/// assert_eq!(quantize(-0.1), 0);
/// ```
#[inline]
pub fn quantize(value: f32) -> u8 {
    (value as f64 * 255.0) as u8
}

/// Check the hysteresis thresholds.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if a threshold is outside `[0, 1]`
/// or `low > high`.
pub fn check_thresholds(low: f32, high: f32) -> Result<(), EdgeError> {
    ensure_unit_interval("low", low)?;
    ensure_unit_interval("high", high)?;
    if low > high {
        return Err(EdgeError::invalid_parameter(
            "low",
            format!("low threshold {low} is above the high threshold {high}"),
        ));
    }
    Ok(())
}

/// Binarize an edge strength image with two thresholds.
///
/// Pixels above `high` seed the edges. Every 8-connected group of nonzero
/// pixels that holds at least one seed is kept, and its pixels above `low`
/// are set to one. Everything else is set to zero. The comparisons are strict
/// and run on the values given by [`quantize`].
///
/// # Arguments
///
/// * `src` - The edge strength image with values in `[0, 1]`.
/// * `dst` - The destination binary image with values in `{0, 1}`.
/// * `low` - The low threshold in `[0, 1]`.
/// * `high` - The high threshold in `[low, 1]`.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if a threshold is outside `[0, 1]` or
/// `low > high`, and [`EdgeError::DimensionMismatch`] if `src` and `dst` sizes differ.
///
/// # Example
///
/// ```
/// use canny_image::{Image, ImageSize};
/// use canny_imgproc::edges::hysteresis_threshold;
///
/// let edges = Image::<f32, 1>::new(
///     ImageSize { width: 4, height: 1 },
///     vec![0.9, 0.3, 0.0, 0.3],
/// ).unwrap();
/// let mut binary = Image::<f32, 1>::from_size_val(edges.size(), 0.0).unwrap();
///
/// hysteresis_threshold(&edges, &mut binary, 0.2, 0.8).unwrap();
///
/// assert_eq!(binary.as_slice(), &[1.0, 1.0, 0.0, 0.0]);
/// ```
pub fn hysteresis_threshold(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    low: f32,
    high: f32,
) -> Result<(), EdgeError> {
    check_thresholds(low, high)?;

    ensure_same_size(src.size(), dst.size())?;

    let (low_q, high_q) = (quantize(low), quantize(high));

    let mut quantized = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    parallel::par_iter_rows_val(src, &mut quantized, |&v, q| *q = quantize(v));

    let (labels, num_labels) = connected_components(&quantized)?;

    // a group is valid once any of its pixels is above the high threshold
    let mut valid = vec![false; num_labels + 1];
    quantized
        .as_slice()
        .iter()
        .zip(labels.as_slice())
        .filter(|&(&q, _)| q > high_q)
        .for_each(|(_, &label)| valid[label as usize] = true);

    log::debug!(
        "hysteresis: low={low_q} high={high_q} components={num_labels} valid={}",
        valid.iter().filter(|&&v| v).count()
    );

    parallel::par_iter_rows_val_two(&quantized, &labels, dst, |&q, &label, d| {
        *d = if valid[label as usize] && q > low_q {
            1.0
        } else {
            0.0
        };
    });

    Ok(())
}

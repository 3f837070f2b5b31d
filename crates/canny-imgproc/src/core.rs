use canny_image::Image;

use crate::error::EdgeError;

/// Find the maximum value of a single channel image.
///
/// NaN samples are ignored.
///
/// # Returns
///
/// The maximum value, or `None` if the image has no comparable samples.
///
/// # Example
///
/// ```
/// use canny_image::{Image, ImageSize};
/// use canny_imgproc::core::find_max;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![0.25, 0.75, 0.5],
/// ).unwrap();
///
/// assert_eq!(find_max(&image), Some(0.75));
/// ```
pub fn find_max(src: &Image<f32, 1>) -> Option<f32> {
    src.as_slice()
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f32::max)
}

/// Compute the `q`-th percentile of the samples of a single channel image.
///
/// The samples are sorted and the value is linearly interpolated between the
/// two closest ranks, i.e. for `n` samples the rank is `q / 100 * (n - 1)`.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `q` - The percentile in the range `[0, 100]`.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if `q` is outside `[0, 100]` and
/// [`EdgeError::DegenerateInput`] if the image is empty.
///
/// # Example
///
/// ```
/// use canny_image::{Image, ImageSize};
/// use canny_imgproc::core::percentile;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize { width: 5, height: 1 },
///     vec![0.4, 0.0, 0.3, 0.1, 0.2],
/// ).unwrap();
///
/// assert_eq!(percentile(&image, 50.0).unwrap(), 0.2);
/// ```
pub fn percentile(src: &Image<f32, 1>, q: f64) -> Result<f32, EdgeError> {
    if !(0.0..=100.0).contains(&q) {
        return Err(EdgeError::invalid_parameter(
            "q",
            format!("percentile must be in [0, 100], got {q}"),
        ));
    }

    if src.is_empty() {
        return Err(EdgeError::DegenerateInput(
            "cannot compute a percentile of an empty image",
        ));
    }

    let mut sorted = src.as_slice().to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    let (a, b) = (sorted[lo] as f64, sorted[hi] as f64);
    Ok((a + (b - a) * frac) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canny_image::ImageSize;

    #[test]
    fn test_find_max() -> Result<(), EdgeError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let image = Image::<f32, 1>::new(size, vec![0.1, f32::NAN, 0.3, 0.2])?;
        assert_eq!(find_max(&image), Some(0.3));

        let zeros = Image::<f32, 1>::from_size_val(size, 0.0)?;
        assert_eq!(find_max(&zeros), Some(0.0));

        let empty = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 0,
                height: 0,
            },
            0.0,
        )?;
        assert_eq!(find_max(&empty), None);
        Ok(())
    }

    #[test]
    fn test_percentile_interpolates() -> Result<(), EdgeError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![3.0, 1.0, 4.0, 2.0],
        )?;

        assert_eq!(percentile(&image, 0.0)?, 1.0);
        assert_eq!(percentile(&image, 100.0)?, 4.0);
        // rank 1.5 between 2.0 and 3.0
        assert_eq!(percentile(&image, 50.0)?, 2.5);
        // rank 0.75 between 1.0 and 2.0
        assert_eq!(percentile(&image, 25.0)?, 1.75);
        Ok(())
    }

    #[test]
    fn test_percentile_single_sample() -> Result<(), EdgeError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![0.5],
        )?;
        assert_eq!(percentile(&image, 90.0)?, 0.5);
        Ok(())
    }

    #[test]
    fn test_percentile_invalid() -> Result<(), EdgeError> {
        let image = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0.0,
        )?;
        assert!(matches!(
            percentile(&image, 101.0),
            Err(EdgeError::InvalidParameter { name: "q", .. })
        ));
        assert!(matches!(
            percentile(&image, f64::NAN),
            Err(EdgeError::InvalidParameter { .. })
        ));

        let empty = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 0,
                height: 2,
            },
            0.0,
        )?;
        assert!(matches!(
            percentile(&empty, 50.0),
            Err(EdgeError::DegenerateInput(_))
        ));
        Ok(())
    }
}

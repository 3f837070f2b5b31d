use std::f64::consts::{FRAC_PI_4, FRAC_PI_8, PI};

use canny_image::Image;
use rayon::prelude::*;

use crate::{
    core::find_max,
    error::{ensure_same_size, EdgeError},
    padding::{spatial_padding, Padding2D, PaddingMode},
    parallel,
};

/// The gradient direction of a pixel, quantized to one of four axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Gradient along the rows, compared against the left and right pixels.
    Horizontal,
    /// Gradient towards the upper right, compared against the upper right and lower left pixels.
    DiagonalAscending,
    /// Gradient along the columns, compared against the upper and lower pixels.
    Vertical,
    /// Gradient towards the upper left, compared against the upper left and lower right pixels.
    DiagonalDescending,
}

// eight 45 degree sectors starting at -pi, opposite orientations share a label
const SECTORS: [Direction; 8] = [
    Direction::Horizontal,
    Direction::DiagonalAscending,
    Direction::Vertical,
    Direction::DiagonalDescending,
    Direction::Horizontal,
    Direction::DiagonalAscending,
    Direction::Vertical,
    Direction::DiagonalDescending,
];

impl Direction {
    /// Quantize a gradient orientation in radians.
    ///
    /// Each label covers two opposite 45 degree sectors centered on its axis,
    /// e.g. horizontal covers `[-pi/8, pi/8)` and `[7pi/8, pi]`. The angles
    /// grow counter-clockwise with the y axis pointing up. Non-finite angles
    /// are labeled [`Direction::DiagonalDescending`].
    ///
    /// # Example
    ///
    /// ```
    /// use canny_imgproc::edges::Direction;
    /// use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
    ///
    /// assert_eq!(Direction::from_angle(0.0), Direction::Horizontal);
    /// assert_eq!(Direction::from_angle(FRAC_PI_4), Direction::DiagonalAscending);
    /// assert_eq!(Direction::from_angle(-FRAC_PI_2), Direction::Vertical);
    /// ```
    pub fn from_angle(theta: f32) -> Self {
        if !theta.is_finite() {
            return Direction::DiagonalDescending;
        }
        let sector = ((theta as f64 + PI + FRAC_PI_8) / FRAC_PI_4).floor() as i64;
        SECTORS[sector.rem_euclid(8) as usize]
    }

    /// The `(row, col)` offsets of the two neighbors along the gradient.
    pub fn neighbor_offsets(&self) -> [(isize, isize); 2] {
        match self {
            Direction::Horizontal => [(0, -1), (0, 1)],
            Direction::DiagonalAscending => [(-1, 1), (1, -1)],
            Direction::Vertical => [(-1, 0), (1, 0)],
            Direction::DiagonalDescending => [(-1, -1), (1, 1)],
        }
    }
}

/// Keep `value` if it is not smaller than any of its two neighbors, else zero.
///
/// # Example
///
/// ```
/// use canny_imgproc::edges::suppress_pixel;
///
/// assert_eq!(suppress_pixel(0.5, [0.2, 0.5]), 0.5);
/// assert_eq!(suppress_pixel(0.5, [0.6, 0.1]), 0.0);
/// ```
#[inline]
pub fn suppress_pixel(value: f32, neighbors: [f32; 2]) -> f32 {
    if value < neighbors[0] || value < neighbors[1] {
        0.0
    } else {
        value
    }
}

/// Thin the gradient magnitude by keeping only the local maxima along the gradient direction.
///
/// The magnitude is mirrored by one pixel (reflect-101) so every pixel,
/// borders included, has two neighbors. Each pixel is compared against the
/// pair of neighbors of its own [`Direction`], read from the unsuppressed
/// magnitude. The result is divided by its maximum so it lies in `[0, 1]`.
///
/// # Arguments
///
/// * `magnitude` - The gradient magnitude with shape (H, W).
/// * `orientation` - The gradient orientation in radians with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
///
/// # Errors
///
/// Returns [`EdgeError::DimensionMismatch`] if the three images differ in size
/// and [`EdgeError::DegenerateInput`] if the image is empty or no pixel
/// survives with a positive magnitude.
pub fn non_maximum_suppression(
    magnitude: &Image<f32, 1>,
    orientation: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
) -> Result<(), EdgeError> {
    ensure_same_size(magnitude.size(), orientation.size())?;
    ensure_same_size(magnitude.size(), dst.size())?;

    if magnitude.is_empty() {
        return Err(EdgeError::DegenerateInput(
            "cannot suppress the gradient of an empty image",
        ));
    }

    let padding = Padding2D::uniform(1);
    let mut padded = Image::<f32, 1>::from_size_val(padding.padded_size(magnitude.size()), 0.0)?;
    spatial_padding(magnitude, &mut padded, padding, PaddingMode::Reflect101)?;

    let cols = magnitude.cols();
    let stride = padded.cols() as isize;
    let padded_data = padded.as_slice();
    let orientation_data = orientation.as_slice();

    parallel::par_iter_rows_indexed(dst, |r, dst_row| {
        for (c, dst_pixel) in dst_row.iter_mut().enumerate() {
            let center = (r as isize + 1) * stride + c as isize + 1;
            let [n1, n2] = Direction::from_angle(orientation_data[r * cols + c])
                .neighbor_offsets()
                .map(|(dr, dc)| padded_data[(center + dr * stride + dc) as usize]);
            *dst_pixel = suppress_pixel(padded_data[center as usize], [n1, n2]);
        }
    });

    let max_val = find_max(dst)
        .filter(|&m| m > 0.0)
        .ok_or(EdgeError::DegenerateInput(
            "the suppressed gradient magnitude is all zero",
        ))?;

    log::debug!("non maximum suppression: max magnitude={max_val}");

    dst.as_slice_mut().par_iter_mut().for_each(|v| *v /= max_val);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use canny_image::ImageSize;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_direction_from_angle() {
        let deg = |d: f32| d.to_radians();

        assert_eq!(Direction::from_angle(0.0), Direction::Horizontal);
        assert_eq!(Direction::from_angle(PI), Direction::Horizontal);
        assert_eq!(Direction::from_angle(-PI), Direction::Horizontal);
        assert_eq!(Direction::from_angle(deg(22.0)), Direction::Horizontal);
        assert_eq!(Direction::from_angle(deg(-22.0)), Direction::Horizontal);
        assert_eq!(Direction::from_angle(deg(158.0)), Direction::Horizontal);

        assert_eq!(Direction::from_angle(deg(23.0)), Direction::DiagonalAscending);
        assert_eq!(Direction::from_angle(FRAC_PI_4), Direction::DiagonalAscending);
        assert_eq!(Direction::from_angle(deg(67.0)), Direction::DiagonalAscending);
        assert_eq!(Direction::from_angle(deg(-135.0)), Direction::DiagonalAscending);

        assert_eq!(Direction::from_angle(deg(68.0)), Direction::Vertical);
        assert_eq!(Direction::from_angle(FRAC_PI_2), Direction::Vertical);
        assert_eq!(Direction::from_angle(-FRAC_PI_2), Direction::Vertical);

        assert_eq!(Direction::from_angle(deg(135.0)), Direction::DiagonalDescending);
        assert_eq!(Direction::from_angle(-FRAC_PI_4), Direction::DiagonalDescending);
        assert_eq!(Direction::from_angle(f32::NAN), Direction::DiagonalDescending);
    }

    #[test]
    fn test_suppress_pixel() {
        assert_eq!(suppress_pixel(0.4, [0.4, 0.4]), 0.4);
        assert_eq!(suppress_pixel(0.4, [0.3, 0.41]), 0.0);
        assert_eq!(suppress_pixel(0.0, [0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_non_maximum_suppression_thins_ridge() -> Result<(), EdgeError> {
        let size = ImageSize {
            width: 5,
            height: 3,
        };
        #[rustfmt::skip]
        let magnitude = Image::new(size, vec![
            0.1, 0.5, 1.0, 0.5, 0.1,
            0.2, 1.0, 2.0, 1.0, 0.2,
            0.1, 0.5, 1.0, 0.5, 0.1,
        ])?;
        let orientation = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let mut dst = Image::<f32, 1>::from_size_val(size, -1.0)?;

        non_maximum_suppression(&magnitude, &orientation, &mut dst)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0.0, 0.0, 0.5, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.5, 0.0, 0.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_non_maximum_suppression_own_direction_only() -> Result<(), EdgeError> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        // the center is smaller than its diagonal neighbors but not its vertical ones
        #[rustfmt::skip]
        let magnitude = Image::new(size, vec![
            0.9, 0.1, 0.0,
            0.0, 0.5, 0.0,
            0.0, 0.1, 0.9,
        ])?;
        let orientation = Image::<f32, 1>::from_size_val(size, FRAC_PI_2)?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        non_maximum_suppression(&magnitude, &orientation, &mut dst)?;
        assert_relative_eq!(*dst.get_pixel(1, 1, 0)?, 0.5 / 0.9, epsilon = 1e-6);

        let orientation = Image::<f32, 1>::from_size_val(size, 3.0 * FRAC_PI_4)?;
        non_maximum_suppression(&magnitude, &orientation, &mut dst)?;
        assert_eq!(*dst.get_pixel(1, 1, 0)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_non_maximum_suppression_max_is_one() -> Result<(), EdgeError> {
        let size = ImageSize {
            width: 17,
            height: 11,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let magnitude = Image::new(
            size,
            (0..size.num_pixels()).map(|_| 4.0 * rng.random::<f32>()).collect(),
        )?;
        let orientation = Image::new(
            size,
            (0..size.num_pixels())
                .map(|_| rng.random_range(-PI..=PI))
                .collect(),
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;

        non_maximum_suppression(&magnitude, &orientation, &mut dst)?;

        assert_eq!(find_max(&dst), Some(1.0));
        assert!(dst.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        Ok(())
    }

    #[test]
    fn test_non_maximum_suppression_is_idempotent() -> Result<(), EdgeError> {
        let size = ImageSize {
            width: 12,
            height: 9,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let magnitude = Image::new(
            size,
            (0..size.num_pixels()).map(|_| rng.random::<f32>()).collect(),
        )?;
        let orientation = Image::new(
            size,
            (0..size.num_pixels())
                .map(|_| rng.random_range(-PI..=PI))
                .collect(),
        )?;

        let mut once = Image::<f32, 1>::from_size_val(size, 0.0)?;
        non_maximum_suppression(&magnitude, &orientation, &mut once)?;

        let mut twice = Image::<f32, 1>::from_size_val(size, 0.0)?;
        non_maximum_suppression(&once, &orientation, &mut twice)?;

        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_non_maximum_suppression_degenerate() -> Result<(), EdgeError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let magnitude = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let orientation = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        assert!(matches!(
            non_maximum_suppression(&magnitude, &orientation, &mut dst),
            Err(EdgeError::DegenerateInput(_))
        ));

        let empty_size = ImageSize {
            width: 0,
            height: 0,
        };
        let empty = Image::<f32, 1>::from_size_val(empty_size, 0.0)?;
        let mut empty_dst = empty.clone();
        assert!(matches!(
            non_maximum_suppression(&empty, &empty, &mut empty_dst),
            Err(EdgeError::DegenerateInput(_))
        ));
        Ok(())
    }

    #[test]
    fn test_non_maximum_suppression_size_mismatch() -> Result<(), EdgeError> {
        let magnitude = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            1.0,
        )?;
        let orientation = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 3,
            },
            0.0,
        )?;
        let mut dst = magnitude.clone();
        assert_eq!(
            non_maximum_suppression(&magnitude, &orientation, &mut dst),
            Err(EdgeError::DimensionMismatch(4, 4, 4, 3))
        );
        Ok(())
    }
}

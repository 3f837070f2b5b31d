use canny_image::Image;

use super::kernels::{self, Kernel};
use crate::{
    error::{ensure_same_size, EdgeError},
    parallel,
};

/// Correlate an image with a 2d kernel, ignoring the taps that fall outside the image.
///
/// Every output sample is `S_in + (W_total - W_in) * m_in`, where `S_in` is the
/// weighted sum over the in-bounds taps, `W_in` their weight sum, `W_total` the
/// sum of the whole kernel and `m_in` the mean of the in-bounds samples
/// weighted by the absolute tap weights. For a normalized non-negative kernel
/// this renormalizes the in-bounds weights (`S_in / W_in`), so borders are not
/// darkened. For a zero-sum derivative kernel a flat region keeps a zero
/// response up to the border. Pixels whose window is fully inside the image
/// get the plain correlation `S_in`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `kernel` - The square kernel, applied without flipping.
///
/// # Errors
///
/// Returns [`EdgeError::DimensionMismatch`] if `src` and `dst` sizes differ.
pub fn filter2d_transparent(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: &Kernel,
) -> Result<(), EdgeError> {
    ensure_same_size(src.size(), dst.size())?;

    let (rows, cols) = (src.rows() as isize, src.cols() as isize);
    let radius = kernel.radius() as isize;
    let kernel_sum = kernel.sum();
    let src_data = src.as_slice();

    parallel::par_iter_rows_indexed(dst, |r, dst_row| {
        let r = r as isize;
        for (c, dst_pixel) in dst_row.iter_mut().enumerate() {
            let c = c as isize;
            let mut sum = 0.0f32;
            let mut weight_sum = 0.0f32;
            let mut abs_weight_sum = 0.0f32;
            let mut abs_weighted_sum = 0.0f32;
            let mut clipped = false;

            for ky in 0..kernel.size() {
                let row = r + ky as isize - radius;
                if row < 0 || row >= rows {
                    clipped = true;
                    continue;
                }
                let row_offset = (row * cols) as usize;

                for kx in 0..kernel.size() {
                    let col = c + kx as isize - radius;
                    if col < 0 || col >= cols {
                        clipped = true;
                        continue;
                    }

                    let w = kernel.get(ky, kx);
                    let val = src_data[row_offset + col as usize];
                    sum += w * val;
                    weight_sum += w;
                    abs_weight_sum += w.abs();
                    abs_weighted_sum += w.abs() * val;
                }
            }

            *dst_pixel = if !clipped {
                sum
            } else {
                let mean = if abs_weight_sum > 0.0 {
                    abs_weighted_sum / abs_weight_sum
                } else {
                    0.0
                };
                sum + (kernel_sum - weight_sum) * mean
            };
        }
    });

    Ok(())
}

/// Blur an image using a gaussian blur filter
///
/// The kernel has side `2 * round(3 * sigma) + 1` and the border taps falling
/// outside the image are ignored, see [`filter2d_transparent`]. The radius is
/// capped below the largest image side, where every window is clipped and the
/// dropped taps would not contribute.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `sigma` - The standard deviation of the gaussian kernel.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if `sigma` is not positive and
/// [`EdgeError::DimensionMismatch`] if `src` and `dst` sizes differ.
///
/// # Example
///
/// ```
/// use canny_image::{Image, ImageSize};
/// use canny_imgproc::filter::gaussian_blur;
///
/// let image = Image::<f32, 1>::from_size_val(ImageSize { width: 8, height: 6 }, 0.5).unwrap();
/// let mut blurred = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// gaussian_blur(&image, &mut blurred, 1.0).unwrap();
///
/// assert!(blurred.as_slice().iter().all(|v| (v - 0.5).abs() < 1e-5));
/// ```
pub fn gaussian_blur(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    sigma: f32,
) -> Result<(), EdgeError> {
    let max_radius = src.rows().max(src.cols()).saturating_sub(1);
    let kernel = kernels::gaussian_kernel_2d_truncated(sigma, max_radius)?;
    filter2d_transparent(src, dst, &kernel)
}

/// Compute the first order image derivative in both x and y using a Sobel operator.
///
/// The x derivative grows to the right and the y derivative grows upwards,
/// i.e. towards decreasing row indices.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dx` - The destination x derivative with shape (H, W).
/// * `dy` - The destination y derivative with shape (H, W).
pub fn spatial_gradient_float(
    src: &Image<f32, 1>,
    dx: &mut Image<f32, 1>,
    dy: &mut Image<f32, 1>,
) -> Result<(), EdgeError> {
    ensure_same_size(src.size(), dx.size())?;
    ensure_same_size(src.size(), dy.size())?;

    let (sobel_x, sobel_y) = kernels::sobel_kernel3();

    filter2d_transparent(src, dx, &sobel_x)?;
    filter2d_transparent(src, dy, &sobel_y)?;

    Ok(())
}

/// Compute the gradient magnitude and orientation using a Sobel operator.
///
/// The magnitude is `sqrt(gx^2 + gy^2)` and is not rescaled. The orientation
/// is `atan2(gy, gx)` in the range `(-pi, pi]`.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `magnitude` - The destination gradient magnitude with shape (H, W).
/// * `orientation` - The destination gradient orientation with shape (H, W).
///
/// # Errors
///
/// Returns [`EdgeError::DimensionMismatch`] if the three images differ in size.
pub fn sobel(
    src: &Image<f32, 1>,
    magnitude: &mut Image<f32, 1>,
    orientation: &mut Image<f32, 1>,
) -> Result<(), EdgeError> {
    ensure_same_size(src.size(), magnitude.size())?;
    ensure_same_size(src.size(), orientation.size())?;

    let mut gx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    let mut gy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    spatial_gradient_float(src, &mut gx, &mut gy)?;

    parallel::par_iter_rows_val_two(&gx, &gy, magnitude, |&gx, &gy, m| {
        *m = (gx * gx + gy * gy).sqrt();
    });

    parallel::par_iter_rows_val_two(&gx, &gy, orientation, |&gx, &gy, o| {
        let angle = gy.atan2(gx);
        // fold the signed zero case of atan2 into the half-open range
        *o = if angle <= -std::f32::consts::PI {
            std::f32::consts::PI
        } else {
            angle
        };
    });

    Ok(())
}

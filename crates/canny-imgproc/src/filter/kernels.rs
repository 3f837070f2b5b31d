use crate::error::EdgeError;

/// A square 2d kernel of weights stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Create a new kernel from its row-major weights.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::DimensionMismatch`] if the number of weights is not
    /// `size * size`, and [`EdgeError::InvalidParameter`] if `size` is not odd.
    pub fn new(size: usize, weights: Vec<f32>) -> Result<Self, EdgeError> {
        if weights.len() != size * size {
            return Err(EdgeError::DimensionMismatch(
                size,
                size,
                weights.len(),
                1,
            ));
        }

        if size % 2 == 0 {
            return Err(EdgeError::invalid_parameter(
                "size",
                format!("kernel size must be odd, got {size}"),
            ));
        }

        Ok(Self { size, weights })
    }

    /// The side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The distance from the center tap to the border of the kernel.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// The kernel weights, row-major.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// The weight at row `ky` and column `kx`.
    #[inline]
    pub fn get(&self, ky: usize, kx: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }

    /// The sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// The transposed kernel.
    pub fn transpose(&self) -> Self {
        let mut weights = Vec::with_capacity(self.weights.len());
        for kx in 0..self.size {
            for ky in 0..self.size {
                weights.push(self.get(ky, kx));
            }
        }
        Self {
            size: self.size,
            weights,
        }
    }

    fn negate(mut self) -> Self {
        self.weights.iter_mut().for_each(|w| *w = -*w);
        self
    }
}

/// Check that a gaussian standard deviation is finite and positive.
///
/// Any such sigma is accepted by [`crate::filter::gaussian_blur`], which caps
/// the kernel radius to the image.
pub fn check_sigma(sigma: f32) -> Result<(), EdgeError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(EdgeError::invalid_parameter(
            "sigma",
            format!("sigma must be positive, got {sigma}"),
        ));
    }
    Ok(())
}

// the radius covering three standard deviations, capped at `max_radius`
fn gaussian_radius(sigma: f32, max_radius: usize) -> Result<usize, EdgeError> {
    check_sigma(sigma)?;
    let radius = (3.0 * sigma as f64).round_ties_even();
    if radius >= max_radius as f64 {
        Ok(max_radius)
    } else {
        Ok(radius as usize)
    }
}

fn side_from_radius(sigma: f32, radius: usize) -> Result<usize, EdgeError> {
    radius
        .checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .ok_or_else(|| {
            EdgeError::invalid_parameter("sigma", format!("kernel size overflows for sigma {sigma}"))
        })
}

/// Compute the side length of the gaussian kernel for a given sigma.
///
/// The radius covers three standard deviations, `2 * round(3 * sigma) + 1`,
/// with halves rounded to even.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if `sigma` is not positive or the
/// size does not fit in a `usize`.
///
/// # Example
///
/// ```
/// use canny_imgproc::filter::kernels::gaussian_kernel_size;
///
/// assert_eq!(gaussian_kernel_size(1.0).unwrap(), 7);
/// assert_eq!(gaussian_kernel_size(0.5).unwrap(), 5);
/// ```
pub fn gaussian_kernel_size(sigma: f32) -> Result<usize, EdgeError> {
    side_from_radius(sigma, gaussian_radius(sigma, usize::MAX)?)
}

/// Create a 2d gaussian blur kernel.
///
/// The weight at offset `(dx, dy)` from the center is
/// `1 / (2 pi sigma^2) * exp(-(dx^2 + dy^2) / (2 sigma^2))`, and the
/// kernel is renormalized to sum to one.
///
/// # Arguments
///
/// * `sigma` - The standard deviation of the gaussian, must be positive.
///
/// # Returns
///
/// A square kernel of side [`gaussian_kernel_size`].
pub fn gaussian_kernel_2d(sigma: f32) -> Result<Kernel, EdgeError> {
    gaussian_kernel_2d_truncated(sigma, usize::MAX)
}

/// Create a 2d gaussian blur kernel whose radius is at most `max_radius`.
///
/// Same as [`gaussian_kernel_2d`] when `round(3 * sigma) <= max_radius`.
/// Otherwise the window is cut to `2 * max_radius + 1` and renormalized.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] if `sigma` is not positive or the
/// kernel cannot be allocated.
pub fn gaussian_kernel_2d_truncated(sigma: f32, max_radius: usize) -> Result<Kernel, EdgeError> {
    let radius = gaussian_radius(sigma, max_radius)?;
    let kernel_size = side_from_radius(sigma, radius)?;

    let too_large = || {
        EdgeError::invalid_parameter(
            "sigma",
            format!("a {kernel_size}x{kernel_size} kernel cannot be allocated"),
        )
    };
    let num_weights = kernel_size.checked_mul(kernel_size).ok_or_else(too_large)?;
    let mut kernel = Vec::new();
    kernel
        .try_reserve_exact(num_weights)
        .map_err(|_| too_large())?;

    let center = radius as f64;
    let sigma_sq = sigma as f64 * sigma as f64;
    let scale = 1.0 / (2.0 * std::f64::consts::PI * sigma_sq);

    for ky in 0..kernel_size {
        for kx in 0..kernel_size {
            let dy = ky as f64 - center;
            let dx = kx as f64 - center;
            kernel.push(scale * (-(dx * dx + dy * dy) / (2.0 * sigma_sq)).exp());
        }
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    let weights = kernel.iter().map(|k| (k / norm) as f32).collect();

    log::debug!("gaussian kernel: sigma={sigma} size={kernel_size}");

    Kernel::new(kernel_size, weights)
}

/// Create the 3x3 sobel kernels.
///
/// The vertical kernel is the negated transpose of the horizontal one, so that
/// the vertical derivative grows upwards.
///
/// # Returns
///
/// The `(kernel_x, kernel_y)` pair.
pub fn sobel_kernel3() -> (Kernel, Kernel) {
    #[rustfmt::skip]
    let kernel_x = Kernel {
        size: 3,
        weights: vec![
            -1.0, 0.0, 1.0,
            -2.0, 0.0, 2.0,
            -1.0, 0.0, 1.0,
        ],
    };
    let kernel_y = kernel_x.transpose().negate();
    (kernel_x, kernel_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sobel_kernel3() {
        let (kernel_x, kernel_y) = sobel_kernel3();
        assert_eq!(kernel_x.size(), 3);
        #[rustfmt::skip]
        assert_eq!(
            kernel_y.weights(),
            &[
                1.0, 2.0, 1.0,
                0.0, 0.0, 0.0,
                -1.0, -2.0, -1.0,
            ]
        );
        assert_eq!(kernel_x.sum(), 0.0);
        assert_eq!(kernel_y.sum(), 0.0);
    }

    #[test]
    fn test_gaussian_kernel_size() -> Result<(), EdgeError> {
        assert_eq!(gaussian_kernel_size(0.1)?, 1);
        assert_eq!(gaussian_kernel_size(1.0)?, 7);
        assert_eq!(gaussian_kernel_size(1.4)?, 9);
        assert_eq!(gaussian_kernel_size(2.0)?, 13);
        // 3 * 2.5 = 7.5 rounds to even
        assert_eq!(gaussian_kernel_size(2.5)?, 17);
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_huge_sigma() {
        assert!(matches!(
            gaussian_kernel_size(1e20),
            Err(EdgeError::InvalidParameter { name: "sigma", .. })
        ));
        assert!(matches!(
            gaussian_kernel_2d(1e12),
            Err(EdgeError::InvalidParameter { name: "sigma", .. })
        ));
        assert!(matches!(
            gaussian_kernel_2d(f32::MAX),
            Err(EdgeError::InvalidParameter { name: "sigma", .. })
        ));
    }

    #[test]
    fn test_gaussian_kernel_truncated() -> Result<(), EdgeError> {
        // a wide gaussian cut to a 5x5 window
        let kernel = gaussian_kernel_2d_truncated(1e12, 2)?;
        assert_eq!(kernel.size(), 5);
        assert_relative_eq!(kernel.sum(), 1.0, epsilon = 1e-5);
        for &w in kernel.weights() {
            assert_relative_eq!(w, 1.0 / 25.0, epsilon = 1e-6);
        }

        // no effect when the radius already fits
        assert_eq!(gaussian_kernel_2d_truncated(1.0, 3)?, gaussian_kernel_2d(1.0)?);
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_sums_to_one() -> Result<(), EdgeError> {
        for sigma in [0.1, 0.5, 0.8, 1.0, 1.4, 2.0, 3.3, 5.0] {
            let kernel = gaussian_kernel_2d(sigma)?;
            assert_eq!(kernel.size(), gaussian_kernel_size(sigma)?);
            assert_relative_eq!(kernel.sum(), 1.0, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_shape() -> Result<(), EdgeError> {
        let kernel = gaussian_kernel_2d(1.0)?;
        let r = kernel.radius();
        let center = kernel.get(r, r);

        // symmetric and peaked at the center
        assert_eq!(kernel, kernel.transpose());
        for ky in 0..kernel.size() {
            for kx in 0..kernel.size() {
                assert!(kernel.get(ky, kx) <= center);
                assert_eq!(kernel.get(ky, kx), kernel.get(2 * r - ky, 2 * r - kx));
            }
        }
        assert_relative_eq!(
            kernel.get(r, r + 1) / center,
            (-0.5f32).exp(),
            epsilon = 1e-5
        );
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_invalid_sigma() {
        for sigma in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                gaussian_kernel_2d(sigma),
                Err(EdgeError::InvalidParameter { name: "sigma", .. })
            ));
        }
    }

    #[test]
    fn test_kernel_invalid_shape() {
        assert_eq!(
            Kernel::new(3, vec![0.0; 8]),
            Err(EdgeError::DimensionMismatch(3, 3, 8, 1))
        );
        assert!(matches!(
            Kernel::new(2, vec![0.25; 4]),
            Err(EdgeError::InvalidParameter { name: "size", .. })
        ));
    }
}

use std::time::Instant;

use canny_image::{ops, Image, ImageSize};
use canny_imgproc::{edges, filter, EdgeError};

use crate::config::{CannyConfig, Thresholds};

fn zeros(size: ImageSize) -> Result<Image<f32, 1>, EdgeError> {
    Ok(Image::from_size_val(size, 0.0)?)
}

/// Blur an image with a gaussian of standard deviation `sigma`.
///
/// See [`filter::gaussian_blur`].
pub fn blur(image: &Image<f32, 1>, sigma: f32) -> Result<Image<f32, 1>, EdgeError> {
    let mut blurred = zeros(image.size())?;
    filter::gaussian_blur(image, &mut blurred, sigma)?;
    Ok(blurred)
}

/// Compute the Sobel gradient magnitude and orientation of an image.
///
/// See [`filter::sobel`].
///
/// # Returns
///
/// The `(magnitude, orientation)` pair.
pub fn gradient(image: &Image<f32, 1>) -> Result<(Image<f32, 1>, Image<f32, 1>), EdgeError> {
    let mut magnitude = zeros(image.size())?;
    let mut orientation = zeros(image.size())?;
    filter::sobel(image, &mut magnitude, &mut orientation)?;
    Ok((magnitude, orientation))
}

/// Thin a gradient magnitude to its local maxima and normalize it to `[0, 1]`.
///
/// See [`edges::non_maximum_suppression`].
pub fn suppress(
    magnitude: &Image<f32, 1>,
    orientation: &Image<f32, 1>,
) -> Result<Image<f32, 1>, EdgeError> {
    let mut suppressed = zeros(magnitude.size())?;
    edges::non_maximum_suppression(magnitude, orientation, &mut suppressed)?;
    Ok(suppressed)
}

/// Binarize an edge strength image with fixed hysteresis thresholds.
///
/// See [`edges::hysteresis_threshold`].
pub fn threshold(edges: &Image<f32, 1>, low: f32, high: f32) -> Result<Image<f32, 1>, EdgeError> {
    let mut binary = zeros(edges.size())?;
    edges::hysteresis_threshold(edges, &mut binary, low, high)?;
    Ok(binary)
}

/// Binarize an edge strength image with thresholds derived from pixel proportions.
///
/// See [`edges::hysteresis_threshold_auto`].
pub fn auto_threshold(
    edges: &Image<f32, 1>,
    low_prop: f32,
    high_prop: f32,
) -> Result<Image<f32, 1>, EdgeError> {
    let mut binary = zeros(edges.size())?;
    edges::hysteresis_threshold_auto(edges, &mut binary, low_prop, high_prop)?;
    Ok(binary)
}

/// The grids produced between the input and the edge map.
#[derive(Debug, Clone, PartialEq)]
pub struct CannyStages {
    /// The blurred image.
    pub blurred: Image<f32, 1>,
    /// The raw gradient magnitude.
    pub magnitude: Image<f32, 1>,
    /// The gradient orientation in radians.
    pub orientation: Image<f32, 1>,
    /// The thinned and normalized gradient magnitude.
    pub suppressed: Image<f32, 1>,
}

/// The result of the edge detection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CannyOutput {
    /// The binary edge map, `1.0` on edges and `0.0` elsewhere.
    pub edges: Image<f32, 1>,
    /// The intermediate grids, when requested.
    pub stages: Option<CannyStages>,
}

/// Detect the edges of a grayscale image with values in `[0, 1]`.
///
/// The image is blurred, its Sobel gradient is thinned by non maximum
/// suppression and the result is binarized by hysteresis thresholding.
///
/// # Errors
///
/// Returns [`EdgeError::InvalidParameter`] for an invalid configuration and
/// [`EdgeError::DegenerateInput`] when the image has no gradient at all.
///
/// # Example
///
/// ```
/// use canny::{canny, CannyConfig};
/// use canny::image::{Image, ImageSize};
///
/// let size = ImageSize { width: 16, height: 16 };
/// // a bright square on a dark background
/// let data = (0..256)
///     .map(|i| if (4..12).contains(&(i % 16)) && (4..12).contains(&(i / 16)) { 1.0 } else { 0.0 })
///     .collect();
/// let image = Image::<f32, 1>::new(size, data).unwrap();
///
/// let output = canny(&image, &CannyConfig::manual(1.0, 0.2, 0.5)).unwrap();
///
/// assert!(output.edges.as_slice().iter().any(|&v| v == 1.0));
/// assert!(output.stages.is_none());
/// ```
pub fn canny(image: &Image<f32, 1>, config: &CannyConfig) -> Result<CannyOutput, EdgeError> {
    let (edges, _) = run(image, config, false)?;
    Ok(CannyOutput {
        edges,
        stages: None,
    })
}

/// Detect the edges of an image and keep every intermediate grid.
///
/// See [`canny`].
pub fn canny_with_intermediates(
    image: &Image<f32, 1>,
    config: &CannyConfig,
) -> Result<CannyOutput, EdgeError> {
    let (edges, stages) = run(image, config, true)?;
    Ok(CannyOutput { edges, stages })
}

fn run(
    image: &Image<f32, 1>,
    config: &CannyConfig,
    keep_stages: bool,
) -> Result<(Image<f32, 1>, Option<CannyStages>), EdgeError> {
    config.validate()?;
    log::debug!("canny: size={} config={config:?}", image.size());

    let start = Instant::now();
    let blurred = blur(image, config.sigma)?;
    log::trace!("canny: blur took {:?}", start.elapsed());

    let start = Instant::now();
    let (magnitude, orientation) = gradient(&blurred)?;
    log::trace!("canny: gradient took {:?}", start.elapsed());

    let start = Instant::now();
    let suppressed = suppress(&magnitude, &orientation)?;
    log::trace!("canny: suppression took {:?}", start.elapsed());

    let start = Instant::now();
    let edges = match config.thresholds {
        Thresholds::Manual { low, high } => threshold(&suppressed, low, high)?,
        Thresholds::Auto {
            low_prop,
            high_prop,
        } => auto_threshold(&suppressed, low_prop, high_prop)?,
    };
    log::trace!("canny: thresholding took {:?}", start.elapsed());

    let stages = keep_stages.then(|| CannyStages {
        blurred,
        magnitude,
        orientation,
        suppressed,
    });

    Ok((edges, stages))
}

/// Convert an 8-bit grayscale image to floats in `[0, 1]`.
pub fn image_from_gray8(image: &Image<u8, 1>) -> Result<Image<f32, 1>, EdgeError> {
    let mut dst = zeros(image.size())?;
    ops::cast_and_scale(image, &mut dst, 1.0 / 255.0)?;
    Ok(dst)
}

/// Convert a binary edge map to an 8-bit mask with edges at 255.
pub fn edges_to_mask(edges: &Image<f32, 1>) -> Result<Image<u8, 1>, EdgeError> {
    let mut mask = Image::<u8, 1>::from_size_val(edges.size(), 0)?;
    ops::scale_and_cast(edges, &mut mask, 255.0)?;
    Ok(mask)
}

use canny_image::{Image, ImageSize};
use rayon::prelude::*;

use crate::error::EdgeError;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddingMode<T> {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | v v v v...
    Constant(T),

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// This border type reflects the pixel values at the boundary, starting with the pixel 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,
}

impl<T> PaddingMode<T> {
    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect101`: mirror excluding edge
    /// - `Constant`: returns 0 (not used directly)
    ///
    /// PRECONDITION: `len > 0`.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            PaddingMode::Reflect101 => Self::reflect101(i, len),
            PaddingMode::Constant(_) => 0,
        }
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same amount of padding on all four sides.
    pub fn uniform(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// The size of an image of size `size` once this padding is applied.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }
}

/// Pad an image on its four sides.
///
/// The source image is copied to the center of `dst` and the border is filled
/// according to `padding_mode`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image, of size `padding.padded_size(src.size())`.
/// * `padding` - The amount of padding (in pixels) for all four sides.
/// * `padding_mode` - The type of border handling to use.
///
/// # Errors
///
/// Returns [`EdgeError::DimensionMismatch`] if `dst` does not have the padded size
/// and [`EdgeError::DegenerateInput`] when mirroring or replicating an empty image.
///
/// # Example
///
/// ```rust
/// use canny_image::{Image, ImageSize};
/// use canny_imgproc::padding::{spatial_padding, Padding2D, PaddingMode};
///
/// let src = Image::<f32, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![1.0, 2.0, 3.0],
/// ).unwrap();
///
/// let mut dst = Image::<f32, 1>::from_size_val(
///     ImageSize { width: 5, height: 3 },
///     0.0,
/// ).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Reflect101).unwrap();
///
/// assert_eq!(&dst.as_slice()[5..10], &[2.0, 1.0, 2.0, 3.0, 2.0]);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode<T>,
) -> Result<(), EdgeError>
where
    T: Copy + Send + Sync,
{
    let expected = padding.padded_size(src.size());
    if expected != dst.size() {
        return Err(EdgeError::DimensionMismatch(
            expected.width,
            expected.height,
            dst.width(),
            dst.height(),
        ));
    }

    let old_width = src.width();
    let old_height = src.height();
    let new_width = dst.width();
    let old_data = src.as_slice();

    if let PaddingMode::Constant(value) = padding_mode {
        dst.as_slice_mut().fill(value);
    } else if src.is_empty() {
        return Err(EdgeError::DegenerateInput("cannot extend the border of an empty image"));
    }

    if new_width == 0 {
        return Ok(());
    }

    let row_stride = new_width * C;
    let old_stride = old_width * C;

    dst.as_slice_mut()
        .par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_y = y as isize - padding.top as isize;
            let src_y = if (0..old_height as isize).contains(&src_y) {
                src_y as usize
            } else if matches!(padding_mode, PaddingMode::Constant(_)) {
                return;
            } else {
                padding_mode.map_index(src_y, old_height)
            };

            let src_row = &old_data[src_y * old_stride..(src_y + 1) * old_stride];
            dst_row[padding.left * C..padding.left * C + old_stride].copy_from_slice(src_row);

            if matches!(padding_mode, PaddingMode::Constant(_)) {
                return;
            }

            // left and right
            for x in (0..padding.left).chain(padding.left + old_width..new_width) {
                let src_x = padding_mode.map_index(x as isize - padding.left as isize, old_width);
                dst_row[x * C..(x + 1) * C].copy_from_slice(&src_row[src_x * C..(src_x + 1) * C]);
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src_2x3() -> Result<Image<f32, 1>, EdgeError> {
        #[rustfmt::skip]
        let src = Image::new(
            ImageSize { width: 3, height: 2 },
            vec![
                1.0, 2.0, 3.0,
                4.0, 5.0, 6.0,
            ],
        )?;
        Ok(src)
    }

    #[test]
    fn test_padding_reflect101() -> Result<(), EdgeError> {
        let src = src_2x3()?;
        let padding = Padding2D::uniform(1);
        let mut dst = Image::<f32, 1>::from_size_val(padding.padded_size(src.size()), 0.0)?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Reflect101)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                5.0, 4.0, 5.0, 6.0, 5.0,
                2.0, 1.0, 2.0, 3.0, 2.0,
                5.0, 4.0, 5.0, 6.0, 5.0,
                2.0, 1.0, 2.0, 3.0, 2.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_padding_replicate() -> Result<(), EdgeError> {
        let src = src_2x3()?;
        let padding = Padding2D::uniform(1);
        let mut dst = Image::<f32, 1>::from_size_val(padding.padded_size(src.size()), 0.0)?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Replicate)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                1.0, 1.0, 2.0, 3.0, 3.0,
                1.0, 1.0, 2.0, 3.0, 3.0,
                4.0, 4.0, 5.0, 6.0, 6.0,
                4.0, 4.0, 5.0, 6.0, 6.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_padding_constant() -> Result<(), EdgeError> {
        let src = src_2x3()?;
        let padding = Padding2D {
            top: 0,
            bottom: 1,
            left: 1,
            right: 0,
        };
        let mut dst = Image::<f32, 1>::from_size_val(padding.padded_size(src.size()), 9.0)?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Constant(-1.0))?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                -1.0, 1.0, 2.0, 3.0,
                -1.0, 4.0, 5.0, 6.0,
                -1.0, -1.0, -1.0, -1.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_padding_reflect101_single_pixel() -> Result<(), EdgeError> {
        let src = Image::<f32, 1>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![7.0],
        )?;
        let padding = Padding2D::uniform(1);
        let mut dst = Image::<f32, 1>::from_size_val(padding.padded_size(src.size()), 0.0)?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Reflect101)?;
        assert!(dst.as_slice().iter().all(|&v| v == 7.0));
        Ok(())
    }

    #[test]
    fn test_padding_size_mismatch() -> Result<(), EdgeError> {
        let src = src_2x3()?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

        let res = spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Replicate);
        assert_eq!(res, Err(EdgeError::DimensionMismatch(5, 4, 3, 2)));
        Ok(())
    }
}

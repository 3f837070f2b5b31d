use crate::{Image, ImageError};

/// Cast the pixel data of an image to a different type.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use canny_image::{Image, ImageSize};
/// use canny_image::ops::cast_and_scale;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![0u8, 255],
/// ).unwrap();
///
/// let mut image_f32 = Image::from_size_val(image.size(), 0.0f32).unwrap();
///
/// cast_and_scale(&image, &mut image_f32, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f32.get_pixel(0, 0, 0).unwrap(), &0.0f32);
/// assert_eq!(image_f32.get_pixel(1, 0, 0).unwrap(), &1.0f32);
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<U, Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp).ok_or(ImageError::CastError(
                std::any::type_name::<U>().to_string(),
            ))?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })?;

    Ok(())
}

/// Scale the pixel data of an image and cast it to a different type.
///
/// The scale is applied in the source type before the cast, which makes it
/// suitable to turn `[0, 1]` float maps into 8-bit masks.
///
/// Example:
///
/// ```
/// use canny_image::{Image, ImageSize};
/// use canny_image::ops::scale_and_cast;
///
/// let image = Image::<f32, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![0.0, 1.0],
/// ).unwrap();
///
/// let mut mask = Image::from_size_val(image.size(), 0u8).unwrap();
///
/// scale_and_cast(&image, &mut mask, 255.0).unwrap();
///
/// assert_eq!(mask.as_slice(), &[0, 255]);
/// ```
pub fn scale_and_cast<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: T,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast + std::ops::Mul<T, Output = T>,
    U: Copy + num_traits::NumCast,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            *out = U::from(inp * scale).ok_or(ImageError::CastError(
                std::any::type_name::<U>().to_string(),
            ))?;
            Ok::<(), ImageError>(())
        })?;

    Ok(())
}

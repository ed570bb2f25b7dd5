use crate::interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode};
use crate::parallel;
use talkface_image::{Image, ImageError};

/// Resize an image to a new size.
///
/// The destination size is taken from `dst`. Pixel centers are aligned the
/// half-pixel way, so a source coordinate is `(x + 0.5) * scale - 0.5`, and
/// samples falling outside the source replicate the nearest edge pixel.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use talkface_image::{Image, ImageSize};
/// use talkface_imgproc::resize::resize_native;
/// use talkface_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroImageSize(src.width(), src.height()));
    }

    if dst.width() == 0 || dst.height() == 0 {
        return Err(ImageError::ZeroImageSize(dst.width(), dst.height()));
    }

    let scale_x = src.width() as f32 / dst.width() as f32;
    let scale_y = src.height() as f32 / dst.height() as f32;

    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        Ok((
            (x as f32 + 0.5) * scale_x - 0.5,
            (y as f32 + 0.5) * scale_y - 0.5,
        ))
    })?;

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&u, &v, dst_pixel| {
        let pixel = interpolate_pixel(src, u, v, interpolation);
        dst_pixel.copy_from_slice(&pixel);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use talkface_image::{Image, ImageError, ImageSize};

    use crate::interpolation::InterpolationMode;

    #[test]
    fn resize_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0)?;

        super::resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(image_resized.num_channels(), 3);
        assert_eq!(image_resized.size().width, 2);
        assert_eq!(image_resized.size().height, 3);

        Ok(())
    }

    #[test]
    fn resize_identity() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let mut image_resized = Image::<_, 1>::from_size_val(image.size(), 0.0)?;
        super::resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(image_resized.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn resize_downscale_half_pixel() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![0.0f32, 2.0, 4.0, 6.0],
        )?;

        let mut image_resized = Image::<_, 1>::from_size_val([2, 1].into(), 0.0)?;
        super::resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        // x = 0 samples 0.5, x = 1 samples 2.5
        assert_eq!(image_resized.as_slice(), &[1.0, 5.0]);

        Ok(())
    }

    #[test]
    fn resize_zero_size() -> Result<(), ImageError> {
        let image = Image::<_, 1>::from_size_val([2, 2].into(), 0.0f32)?;
        let mut empty = Image::<_, 1>::new([0, 2].into(), vec![])?;
        let res = super::resize_native(&image, &mut empty, InterpolationMode::Bilinear);
        assert_eq!(res, Err(ImageError::ZeroImageSize(0, 2)));
        Ok(())
    }
}

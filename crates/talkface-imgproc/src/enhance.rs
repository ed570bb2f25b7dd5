use std::ops::Range;

use talkface_image::{Image, ImageError};

use crate::parallel;

/// Multiplies a range of channels of an 8-bit image by a gain.
///
/// dst(x,y,c) = trunc(clamp(src(x,y,c) * gain, 0, 255))  for c in `channels`
///
/// Channels outside `channels` are copied unchanged. The range is clipped to
/// the number of channels of the image, so an empty or out of range selection
/// yields a plain copy.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `gain` - The multiplicative factor.
/// * `channels` - The half-open range of channel indices to scale.
///
/// # Errors
///
/// Returns an error if the sizes of `src` and `dst` do not match.
///
/// # Example
///
/// ```
/// use talkface_image::{Image, ImageSize};
/// use talkface_imgproc::enhance::scale_channels;
///
/// let src = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![100, 200, 50]).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
///
/// scale_channels(&src, &mut dst, 1.5, 1..3).unwrap();
///
/// assert_eq!(dst.as_slice(), &[100, 255, 75]);
/// ```
pub fn scale_channels<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    gain: f32,
    channels: Range<usize>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    if src.width() == 0 || src.height() == 0 {
        return Ok(());
    }

    let channels = channels.start.min(C)..channels.end.min(C);

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.copy_from_slice(src_pixel);
        for k in channels.clone() {
            // float to u8 casts truncate
            dst_pixel[k] = (src_pixel[k] as f32 * gain).clamp(0.0, 255.0) as u8;
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use talkface_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_scale_channels_truncates() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![10, 11, 12, 13, 14, 15],
        )?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

        super::scale_channels(&src, &mut dst, 0.5, 0..1)?;

        // 13 * 0.5 = 6.5 truncates down
        assert_eq!(dst.as_slice(), &[5, 11, 12, 6, 14, 15]);

        Ok(())
    }

    #[test]
    fn test_scale_channels_clamps() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::from_size_val([3, 2].into(), 200)?;
        let mut dst = Image::<u8, 4>::from_size_val(src.size(), 0)?;

        super::scale_channels(&src, &mut dst, 1.6, 1..7)?;

        for px in dst.as_slice().chunks_exact(4) {
            assert_eq!(px, &[200, 255, 255, 255]);
        }

        Ok(())
    }

    #[test]
    fn test_scale_channels_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        let mut dst = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        assert!(super::scale_channels(&src, &mut dst, 1.0, 0..1).is_err());
        Ok(())
    }
}

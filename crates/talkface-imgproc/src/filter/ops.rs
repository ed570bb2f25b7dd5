use talkface_image::{Image, ImageDtype, ImageError};

use crate::{padding::PaddingMode, parallel};

fn check_sizes<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &Image<U, C>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroImageSize(src.width(), src.height()));
    }

    Ok(())
}

/// Replace every pixel with the median of its `kernel_size x kernel_size` neighborhood.
///
/// Channels are filtered independently and the border is replicated.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The aperture, odd and positive.
///
/// # Errors
///
/// Returns an error if the aperture is even or zero, or the image sizes differ.
///
/// # Example
///
/// ```
/// use talkface_image::{Image, ImageSize};
/// use talkface_imgproc::filter::median_blur;
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![0, 255, 0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// median_blur(&src, &mut dst, 3).unwrap();
///
/// assert_eq!(dst.as_slice(), &[0, 0, 0]);
/// ```
pub fn median_blur<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_size: usize,
) -> Result<(), ImageError>
where
    T: Copy + Ord + Send + Sync,
{
    check_sizes(src, dst, kernel_size)?;

    let half = (kernel_size / 2) as isize;
    let (rows, cols) = (src.rows(), src.cols());
    let src_data = src.as_slice();
    let border = PaddingMode::Replicate;

    parallel::par_iter_rows_indexed(dst, |r, dst_row| {
        let mut window = Vec::with_capacity(kernel_size * kernel_size);
        for (c, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            for (k, out) in dst_pixel.iter_mut().enumerate() {
                window.clear();
                for dy in -half..=half {
                    let Some(sy) = border.map_index(r as isize + dy, rows) else {
                        continue;
                    };
                    for dx in -half..=half {
                        let Some(sx) = border.map_index(c as isize + dx, cols) else {
                            continue;
                        };
                        window.push(src_data[(sy * cols + sx) * C + k]);
                    }
                }
                let mid = window.len() / 2;
                let (_, median, _) = window.select_nth_unstable(mid);
                *out = *median;
            }
        }
    });

    Ok(())
}

/// Correlate an image with a square kernel.
///
/// Each output value is accumulated in `f32` and converted back with
/// [`ImageDtype::from_f32`], which rounds and saturates integer pixel types.
/// Out of range neighbors follow `border`; [`PaddingMode::Constant`] treats
/// them as zero.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - Row-major weights of length `kernel_size * kernel_size`.
/// * `kernel_size` - The kernel side, odd and positive.
/// * `border` - The border handling to use.
///
/// # Example
///
/// ```
/// use talkface_image::{Image, ImageSize};
/// use talkface_imgproc::filter::{filter2d, kernels};
/// use talkface_imgproc::padding::PaddingMode;
///
/// let src = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 4 }, 100).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
///
/// filter2d(&src, &mut dst, &kernels::sharpen_kernel_3x3(), 3, PaddingMode::Reflect101).unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 100));
/// ```
pub fn filter2d<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &[f32],
    kernel_size: usize,
    border: PaddingMode,
) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    check_sizes(src, dst, kernel_size)?;

    if kernel.len() != kernel_size * kernel_size {
        return Err(ImageError::InvalidKernelSize(kernel.len()));
    }

    let half = (kernel_size / 2) as isize;
    let (rows, cols) = (src.rows(), src.cols());
    let src_data = src.as_slice();

    parallel::par_iter_rows_indexed(dst, |r, dst_row| {
        for (c, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            let mut acc = [0.0f32; C];
            for (ky, dy) in (-half..=half).enumerate() {
                let Some(sy) = border.map_index(r as isize + dy, rows) else {
                    continue;
                };
                for (kx, dx) in (-half..=half).enumerate() {
                    let Some(sx) = border.map_index(c as isize + dx, cols) else {
                        continue;
                    };
                    let w = kernel[ky * kernel_size + kx];
                    let base = (sy * cols + sx) * C;
                    for (k, a) in acc.iter_mut().enumerate() {
                        let px: f32 = src_data[base + k].into();
                        *a += w * px;
                    }
                }
            }
            for (out, a) in dst_pixel.iter_mut().zip(acc.iter()) {
                *out = T::from_f32(*a);
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels;
    use talkface_image::ImageSize;

    #[test]
    fn median_removes_impulse() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                10, 10, 10,
                10, 250, 10,
                10, 10, 10,
            ],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        median_blur(&src, &mut dst, 3)?;

        assert_eq!(dst.as_slice(), &[10; 9]);
        Ok(())
    }

    #[test]
    fn median_per_channel() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 2>::new(
            ImageSize { width: 3, height: 1 },
            vec![
                1, 9,
                2, 8,
                3, 7,
            ],
        )?;
        let mut dst = Image::<u8, 2>::from_size_val(src.size(), 0)?;

        median_blur(&src, &mut dst, 3)?;

        // replicated rows keep the window at 9 values: (1,1,2) x3 -> 1
        #[rustfmt::skip]
        assert_eq!(dst.as_slice(), &[
            1, 9,
            2, 8,
            3, 7,
        ]);
        Ok(())
    }

    #[test]
    fn median_even_kernel() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = src.clone();
        assert_eq!(
            median_blur(&src, &mut dst, 4),
            Err(ImageError::InvalidKernelSize(4))
        );
        Ok(())
    }

    #[test]
    fn sharpen_saturates() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 3, height: 3 },
            vec![
                0, 0, 0,
                0, 50, 0,
                0, 0, 0,
            ],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        filter2d(
            &src,
            &mut dst,
            &kernels::sharpen_kernel_3x3(),
            3,
            PaddingMode::Reflect101,
        )?;

        // center 9 * 50, corners and edges see the center pixel with weight -1
        assert_eq!(dst.get([1, 1, 0]), Some(&255));
        assert_eq!(dst.get([0, 0, 0]), Some(&0));
        Ok(())
    }

    #[test]
    fn sharpen_flat_f32() -> Result<(), ImageError> {
        let src = Image::<f32, 3>::from_size_val([5, 4].into(), 0.25)?;
        let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0)?;

        filter2d(
            &src,
            &mut dst,
            &kernels::sharpen_kernel_3x3(),
            3,
            PaddingMode::Replicate,
        )?;

        for v in dst.as_slice() {
            assert!((v - 0.25).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn box_blur_constant_border() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

        filter2d(
            &src,
            &mut dst,
            &[1.0 / 9.0; 9],
            3,
            PaddingMode::Constant,
        )?;

        // corner sees 4 of 9 pixels
        assert!((dst.get([0, 0, 0]).copied().unwrap_or_default() - 4.0 / 9.0).abs() < 1e-6);
        assert!((dst.get([1, 1, 0]).copied().unwrap_or_default() - 1.0).abs() < 1e-6);
        Ok(())
    }
}

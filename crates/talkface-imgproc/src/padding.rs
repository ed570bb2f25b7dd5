use rayon::prelude::*;
use talkface_image::{Image, ImageError, ImageSize};

/// A border type for spatial padding and neighborhood filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// Fill the border with a single, constant value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// Repeat the outermost row or column of pixels.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// Mirror the pixels at the boundary, starting with the pixel next to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// Mirror the pixels at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,
}

impl PaddingMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

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

    /// Maps index `i` to a valid index within `[0, len)` according to the padding mode.
    ///
    /// [`PaddingMode::Constant`] has no source index and returns `None` for
    /// out-of-range input.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if (0..len as isize).contains(&i) {
            return Some(i as usize);
        }
        match self {
            PaddingMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            PaddingMode::Reflect => Some(Self::reflect(i, len)),
            PaddingMode::Reflect101 => Some(Self::reflect101(i, len)),
            PaddingMode::Constant => None,
        }
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
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
    /// Padding on the left and right sides only.
    pub fn horizontal(size: usize) -> Self {
        Self {
            left: size,
            right: size,
            ..Default::default()
        }
    }

    /// Padding on the top and bottom sides only.
    pub fn vertical(size: usize) -> Self {
        Self {
            top: size,
            bottom: size,
            ..Default::default()
        }
    }

    /// The image size obtained after padding an image of `size`.
    ///
    /// ```rust
    /// use talkface_image::ImageSize;
    /// use talkface_imgproc::padding::Padding2D;
    ///
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// let padded = padding.padded_size(ImageSize { width: 4, height: 4 });
    ///
    /// assert_eq!(padded, ImageSize { width: 8, height: 6 });
    /// ```
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }
}

/// Pad an image spatially, centering the source inside `dst`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image, sized as [`Padding2D::padded_size`] of `src`.
/// * `padding` - The amount of padding in pixels for each side.
/// * `padding_mode` - The border handling to use.
/// * `constant_value` - The pixel used by [`PaddingMode::Constant`].
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the padded size of `src`.
///
/// # Example
///
/// ```rust
/// use talkface_image::{ImageSize, Image};
/// use talkface_imgproc::padding::{PaddingMode, Padding2D, spatial_padding};
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 3, height: 1 }, vec![1, 2, 3]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(ImageSize { width: 7, height: 1 }, 0).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::horizontal(2), PaddingMode::Reflect, [0]).unwrap();
///
/// assert_eq!(dst.as_slice(), &[2, 1, 1, 2, 3, 3, 2]);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let expected = padding.padded_size(src.size());
    if dst.size() != expected {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }

    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroImageSize(src.width(), src.height()));
    }

    let (old_width, old_height) = (src.width(), src.height());
    let src_data = src.as_slice();
    let row_stride = dst.width() * C;

    dst.as_slice_mut()
        .par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_y = padding_mode.map_index(y as isize - padding.top as isize, old_height);
            dst_row
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(x, dst_pixel)| {
                    let src_x =
                        padding_mode.map_index(x as isize - padding.left as isize, old_width);
                    match (src_y, src_x) {
                        (Some(sy), Some(sx)) => {
                            let base = (sy * old_width + sx) * C;
                            dst_pixel.copy_from_slice(&src_data[base..base + C]);
                        }
                        _ => dst_pixel.copy_from_slice(&constant_value),
                    }
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_index_modes() {
        assert_eq!(PaddingMode::Replicate.map_index(-2, 4), Some(0));
        assert_eq!(PaddingMode::Replicate.map_index(6, 4), Some(3));
        assert_eq!(PaddingMode::Reflect.map_index(-1, 4), Some(0));
        assert_eq!(PaddingMode::Reflect.map_index(-2, 4), Some(1));
        assert_eq!(PaddingMode::Reflect.map_index(4, 4), Some(3));
        assert_eq!(PaddingMode::Reflect101.map_index(-1, 4), Some(1));
        assert_eq!(PaddingMode::Reflect101.map_index(4, 4), Some(2));
        assert_eq!(PaddingMode::Constant.map_index(-1, 4), None);
        assert_eq!(PaddingMode::Constant.map_index(2, 4), Some(2));
    }

    #[test]
    fn map_index_larger_than_len() {
        // b b a | a b | b a a b
        assert_eq!(PaddingMode::Reflect.map_index(5, 2), Some(1));
        assert_eq!(PaddingMode::Reflect.map_index(-3, 2), Some(1));
    }

    #[test]
    fn pad_vertical_reflect() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let src = Image::<u8, 1>::new(
            ImageSize { width: 2, height: 2 },
            vec![
                1, 2,
                3, 4,
            ],
        )?;
        let padding = Padding2D::vertical(1);
        let mut dst = Image::<u8, 1>::from_size_val(padding.padded_size(src.size()), 0)?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Reflect, [0])?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                1, 2,
                1, 2,
                3, 4,
                3, 4,
            ]
        );
        Ok(())
    }

    #[test]
    fn pad_constant_rgb() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![1, 2, 3])?;
        let padding = Padding2D {
            top: 0,
            bottom: 0,
            left: 1,
            right: 0,
        };
        let mut dst = Image::<u8, 3>::from_size_val(padding.padded_size(src.size()), 0)?;

        spatial_padding(&src, &mut dst, padding, PaddingMode::Constant, [9, 8, 7])?;

        assert_eq!(dst.as_slice(), &[9, 8, 7, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn pad_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0)?;
        let mut dst = Image::<u8, 1>::from_size_val(ImageSize { width: 3, height: 2 }, 0)?;
        let res = spatial_padding(
            &src,
            &mut dst,
            Padding2D::horizontal(1),
            PaddingMode::Replicate,
            [0],
        );
        assert_eq!(res, Err(ImageError::InvalidImageSize(3, 2, 4, 2)));
        Ok(())
    }
}

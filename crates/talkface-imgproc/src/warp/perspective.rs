use nalgebra::{SMatrix, SVector};

use crate::{
    interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode},
    parallel,
};

use talkface_image::{Image, ImageError};

/// How destination pixels mapping outside the source are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Leave the destination pixel untouched.
    #[default]
    Constant,
    /// Sample the nearest edge pixel of the source.
    Replicate,
}

#[rustfmt::skip]
fn determinant3x3(m: &[f32; 9]) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f32; 9]) -> [f32; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

/// Invert a 3x3 row-major perspective matrix.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] if the matrix is singular.
pub fn invert_perspective_transform(m: &[f32; 9]) -> Result<[f32; 9], ImageError> {
    let det = determinant3x3(m);

    if det == 0.0 {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let inv_det = 1.0 / det;
    Ok(adjugate3x3(m).map(|v| v * inv_det))
}

/// Map the point `(x, y)` through the homography `m`.
///
/// Points on the line at infinity (`w == 0`) map to the origin.
pub fn transform_point(x: f32, y: f32, m: &[f32; 9]) -> (f32, f32) {
    let w = m[6] * x + m[7] * y + m[8];
    let inv_w = if w != 0.0 { 1.0 / w } else { 0.0 };
    let u = (m[0] * x + m[1] * y + m[2]) * inv_w;
    let v = (m[3] * x + m[4] * y + m[5]) * inv_w;
    (u, v)
}

/// Compute the homography mapping four source points onto four destination points.
///
/// Points are given as `[x, y]`. The returned matrix is row-major with the
/// bottom-right entry fixed to one.
///
/// Degenerate point sets have no solution. Their matrix is all zeros apart
/// from the bottom-right one, which [`warp_perspective`] turns into a fill
/// with the source origin pixel.
pub fn get_perspective_transform(src: &[[f32; 2]; 4], dst: &[[f32; 2]; 4]) -> [f32; 9] {
    let mut rows = Vec::with_capacity(64);
    let mut b = SVector::<f64, 8>::zeros();

    for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
        let (x, y) = (s[0] as f64, s[1] as f64);
        let (u, v) = (d[0] as f64, d[1] as f64);

        rows.extend_from_slice(&[x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u]);
        rows.extend_from_slice(&[0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v]);
        b[2 * i] = u;
        b[2 * i + 1] = v;
    }

    let a = SMatrix::<f64, 8, 8>::from_row_slice(&rows);

    let mut m = [0.0f32; 9];
    m[8] = 1.0;

    if let Some(h) = a.lu().solve(&b).filter(|h| h.iter().all(|v| v.is_finite())) {
        for (dst, src) in m.iter_mut().zip(h.iter()) {
            *dst = *src as f32;
        }
    }

    m
}

/// Applies a perspective transformation to an image.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 3x3 perspective transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - How pixels mapping outside `src` are handled.
///
/// # Example
///
/// ```
/// use talkface_image::{Image, ImageSize};
/// use talkface_imgproc::interpolation::InterpolationMode;
/// use talkface_imgproc::warp::{warp_perspective, BorderMode};
///
/// let src = Image::<f32, 1>::new(
///   ImageSize {
///     width: 4,
///     height: 5,
///   },
///   vec![0.0f32; 4 * 5]
/// ).unwrap();
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
///
/// let mut dst = Image::<f32, 1>::from_size_val(
///   ImageSize {
///     width: 2,
///     height: 3,
///   },
///   0.0
/// ).unwrap();
///
/// warp_perspective(&src, &mut dst, &m, InterpolationMode::Bilinear, BorderMode::Replicate).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// ```
pub fn warp_perspective<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    m: &[f32; 9],
    interpolation: InterpolationMode,
    border: BorderMode,
) -> Result<(), ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroImageSize(src.width(), src.height()));
    }

    if dst.width() == 0 || dst.height() == 0 {
        return Ok(());
    }

    // a singular matrix inverts to zeros, sending every pixel to the source origin
    let inv_m = invert_perspective_transform(m).unwrap_or([0.0; 9]);

    // source position of every destination pixel
    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        Ok(transform_point(x as f32, y as f32, &inv_m))
    })?;

    let (src_cols, src_rows) = (src.cols() as f32, src.rows() as f32);

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        let inside = x >= 0.0 && x < src_cols && y >= 0.0 && y < src_rows;
        if inside || border == BorderMode::Replicate {
            let pixel = interpolate_pixel(src, x, y, interpolation);
            dst_pixel.copy_from_slice(&pixel);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BorderMode, InterpolationMode};
    use talkface_image::{Image, ImageError, ImageSize};

    #[test]
    fn inverse_perspective_matrix() -> Result<(), ImageError> {
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        let expected = [1.0, 0.0, 1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0];
        let inv_m = super::invert_perspective_transform(&m)?;
        assert_eq!(inv_m, expected);
        Ok(())
    }

    #[test]
    fn inverse_singular() {
        let m = [1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 0.0, 1.0];
        assert_eq!(
            super::invert_perspective_transform(&m),
            Err(ImageError::CannotComputeDeterminant)
        );
    }

    #[test]
    fn transform_point() {
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        let (x, y) = super::transform_point(1.0, 1.0, &m);
        assert_eq!((x, y), (0.0, 2.0));

        let m = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let (x, y) = super::transform_point(3.0, 5.0, &m);
        assert_eq!((x, y), (5.0, 3.0));
    }

    #[test]
    fn perspective_transform_maps_corners() -> Result<(), ImageError> {
        let src = [[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0]];
        let dst = [[1.0, 2.0], [9.0, 0.0], [0.0, 11.0], [12.0, 9.0]];

        let m = super::get_perspective_transform(&src, &dst);
        assert_eq!(m[8], 1.0);

        for (s, d) in src.iter().zip(dst.iter()) {
            let (u, v) = super::transform_point(s[0], s[1], &m);
            assert!((u - d[0]).abs() < 1e-3, "{u} vs {}", d[0]);
            assert!((v - d[1]).abs() < 1e-3, "{v} vs {}", d[1]);
        }

        Ok(())
    }

    #[test]
    fn perspective_transform_identity() -> Result<(), ImageError> {
        let pts = [[-5.0, -5.0], [-5.0, 69.0], [69.0, -5.0], [69.0, 69.0]];
        let m = super::get_perspective_transform(&pts, &pts);
        let identity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        for (a, b) in m.iter().zip(identity.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn perspective_transform_degenerate() {
        let src = [[1.0, 1.0]; 4];
        let dst = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        assert_eq!(
            super::get_perspective_transform(&src, &dst),
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );

        // two corners collapsed onto the same row
        let src = [[0.0, 0.0], [0.0, 0.0], [64.0, 0.0], [64.0, 0.0]];
        let m = super::get_perspective_transform(&src, &dst);
        assert_eq!(m[8], 1.0);
        assert!(m[..8].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn transform_point_at_infinity() {
        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -2.0];
        assert_eq!(super::transform_point(2.0, 7.0, &m), (0.0, 0.0));
        assert_eq!(super::transform_point(1.0, 1.0, &[0.0; 9]), (0.0, 0.0));
    }

    #[test]
    fn warp_perspective_identity() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            BorderMode::Constant,
        )?;

        assert_eq!(image_transformed.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let image_expected = vec![1.0, 0.0, 3.0, 2.0, 5.0, 4.0];

        // flip matrix
        let m = [-1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            BorderMode::Constant,
        )?;

        assert_eq!(image_transformed.num_channels(), 1);
        assert_eq!(image_transformed.size().width, 2);
        assert_eq!(image_transformed.size().height, 3);

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_shift_constant() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 2,
            },
            vec![
                0.0f32, 1.0, 2.0, 3.0,
                4.0, 5.0, 6.0, 7.0,
            ],
        )?;

        // shift left by 1 pixel
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        #[rustfmt::skip]
        let image_expected = vec![
            1.0f32, 2.0, 3.0, -1.0,
            5.0, 6.0, 7.0, -1.0,
        ];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), -1.0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            BorderMode::Constant,
        )?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_shift_replicate() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 2,
            },
            vec![
                0.0f32, 1.0, 2.0, 3.0,
                4.0, 5.0, 6.0, 7.0,
            ],
        )?;

        // shift right by 2 pixels
        let m = [1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        #[rustfmt::skip]
        let image_expected = vec![
            0.0f32, 0.0, 0.0, 1.0,
            4.0, 4.0, 4.0, 5.0,
        ];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), -1.0)?;

        super::warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            BorderMode::Replicate,
        )?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_singular_fills_with_origin() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![7.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let m = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

        for border in [BorderMode::Constant, BorderMode::Replicate] {
            let mut image_transformed = Image::<_, 1>::from_size_val(
                ImageSize {
                    width: 4,
                    height: 4,
                },
                -1.0,
            )?;

            super::warp_perspective(
                &image,
                &mut image_transformed,
                &m,
                InterpolationMode::Bilinear,
                border,
            )?;

            assert!(image_transformed.as_slice().iter().all(|&v| v == 7.0));
        }

        Ok(())
    }

    #[test]
    fn warp_perspective_across_horizon() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            (0..16).map(|v| v as f32).collect(),
        )?;

        // the inverse sends the destination row y = 2 to infinity
        let m = [1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 2.0];
        let inv_m = super::invert_perspective_transform(&m)?;
        assert_eq!(inv_m[7] * 2.0 + inv_m[8], 0.0);

        for interpolation in [InterpolationMode::Bilinear, InterpolationMode::Nearest] {
            let mut image_transformed = Image::<_, 1>::from_size_val(
                ImageSize {
                    width: 8,
                    height: 8,
                },
                0.0,
            )?;

            super::warp_perspective(
                &image,
                &mut image_transformed,
                &m,
                interpolation,
                BorderMode::Replicate,
            )?;

            assert!(image_transformed
                .as_slice()
                .iter()
                .all(|&v| (0.0..=15.0).contains(&v)));
        }

        Ok(())
    }
}

use talkface_image::Image;

/// Kernel for bilinear interpolation
///
/// Neighbors falling outside the image are clamped to the nearest edge pixel.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as isize, image.cols() as isize);

    // one pixel past either edge already samples the edge value
    let u = clamp_coord(u, cols as f32);
    let v = clamp_coord(v, rows as f32);

    let u0 = u.floor();
    let v0 = v.floor();

    let frac_u = u - u0;
    let frac_v = v - v0;

    let iu0 = (u0 as isize).clamp(0, cols - 1) as usize;
    let iv0 = (v0 as isize).clamp(0, rows - 1) as usize;
    let iu1 = (u0 as isize + 1).clamp(0, cols - 1) as usize;
    let iv1 = (v0 as isize + 1).clamp(0, rows - 1) as usize;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let cols = cols as usize;
    let base00 = (iv0 * cols + iu0) * C;
    let base01 = (iv0 * cols + iu1) * C;
    let base10 = (iv1 * cols + iu0) * C;
    let base11 = (iv1 * cols + iu1) * C;

    let data = image.as_slice();

    let mut pixel = [0.0; C];
    for (k, px) in pixel.iter_mut().enumerate() {
        *px = data[base00 + k] * w00
            + data[base01 + k] * w01
            + data[base10 + k] * w10
            + data[base11 + k] * w11;
    }

    pixel
}

/// NaN maps to zero.
pub(crate) fn clamp_coord(x: f32, len: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-1.0, len)
    }
}

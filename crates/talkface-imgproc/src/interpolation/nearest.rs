use talkface_image::Image;

use super::bilinear::clamp_coord;

/// Kernel for nearest neighbor interpolation
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
pub(crate) fn nearest_neighbor_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as isize, image.cols() as isize);

    let iu = (clamp_coord(u, cols as f32).round() as isize).clamp(0, cols - 1) as usize;
    let iv = (clamp_coord(v, rows as f32).round() as isize).clamp(0, rows - 1) as usize;

    let base = (iv * cols as usize + iu) * C;

    let mut pixel = [0.0; C];
    pixel.copy_from_slice(&image.as_slice()[base..base + C]);

    pixel
}

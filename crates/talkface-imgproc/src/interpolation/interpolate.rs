use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use talkface_image::Image;

/// Interpolation mode for the resize and warp operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated values of every channel.
pub fn interpolate_pixel<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    interpolation: InterpolationMode,
) -> [f32; C] {
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v),
    }
}

#[cfg(test)]
mod tests {
    use super::{interpolate_pixel, InterpolationMode};
    use talkface_image::{Image, ImageError};

    #[test]
    fn nearest_rounds() -> Result<(), ImageError> {
        let image = Image::<f32, 2>::new([2, 1].into(), vec![0.0, 10.0, 1.0, 11.0])?;
        let px = interpolate_pixel(&image, 0.7, 0.0, InterpolationMode::Nearest);
        assert_eq!(px, [1.0, 11.0]);
        let px = interpolate_pixel(&image, -2.0, 0.0, InterpolationMode::Nearest);
        assert_eq!(px, [0.0, 10.0]);
        Ok(())
    }
}

use crate::{Image, ImageDtype, ImageError};

/// Convert a floating point image into another pixel type, rounding and
/// saturating to the target range.
///
/// ```
/// use talkface_image::{Image, ImageSize};
/// use talkface_image::ops::from_f32_saturating;
///
/// let image = Image::<f32, 1>::new(ImageSize { width: 3, height: 1 }, vec![-4.0, 99.6, 300.0]).unwrap();
/// let image_u8: Image<u8, 1> = from_f32_saturating(&image).unwrap();
///
/// assert_eq!(image_u8.as_slice(), &[0, 100, 255]);
/// ```
pub fn from_f32_saturating<U, const C: usize>(src: &Image<f32, C>) -> Result<Image<U, C>, ImageError>
where
    U: ImageDtype,
{
    let data = src.as_slice().iter().map(|&x| U::from_f32(x)).collect();
    Image::new(src.size(), data)
}

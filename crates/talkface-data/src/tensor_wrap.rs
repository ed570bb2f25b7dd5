//! Conversion of channel-last pixel arrays into channel-first model tensors.
//!
//! Values in `[0, 255]` are mapped to `[-1, 1]` with `v / 255 * 2 - 1`. No
//! clamping is applied, so out of range input yields out of range output.

use talkface_image::Image;
use talkface_tensor::{Tensor, Tensor3, Tensor4};

use crate::{error::DataError, frame::FrameSequence};

/// Pixel data in channel-last layout, either one image or a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelArray<T> {
    /// One image, (H, W, C).
    Single(Tensor3<T>),
    /// A batch of images, (N, H, W, C).
    Batch(Tensor4<T>),
}

impl<T> PixelArray<T> {
    /// Build a pixel array from a dynamic shape.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidRank`] if the shape is neither rank 3 nor rank 4, and
    /// a tensor error if `data` does not match the shape.
    ///
    /// ```
    /// use talkface_data::PixelArray;
    ///
    /// let arr = PixelArray::from_shape_vec(&[2, 2, 3], vec![0u8; 12]).unwrap();
    /// assert!(matches!(arr, PixelArray::Single(_)));
    ///
    /// assert!(PixelArray::from_shape_vec(&[12], vec![0u8; 12]).is_err());
    /// ```
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self, DataError> {
        match *shape {
            [h, w, c] => Ok(Self::Single(Tensor::from_shape_vec([h, w, c], data)?)),
            [n, h, w, c] => Ok(Self::Batch(Tensor::from_shape_vec([n, h, w, c], data)?)),
            _ => Err(DataError::InvalidRank(shape.len())),
        }
    }

    /// The shape of the array.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Single(t) => t.shape.to_vec(),
            Self::Batch(t) => t.shape.to_vec(),
        }
    }
}

impl<T: Clone, const C: usize> From<&Image<T, C>> for PixelArray<T> {
    fn from(image: &Image<T, C>) -> Self {
        Self::Single(image.0.clone())
    }
}

/// A normalized, channel-first tensor.
#[derive(Clone, Debug, PartialEq)]
pub enum WrappedTensor {
    /// One image, (C, H, W).
    Single(Tensor3<f32>),
    /// A batch of images, (N, C, H, W).
    Batch(Tensor4<f32>),
}

impl WrappedTensor {
    /// The shape of the tensor.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Single(t) => t.shape.to_vec(),
            Self::Batch(t) => t.shape.to_vec(),
        }
    }

    /// The values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        match self {
            Self::Single(t) => t.as_slice(),
            Self::Batch(t) => t.as_slice(),
        }
    }
}

#[inline]
fn normalize<T: Copy + Into<f32>>(v: &T) -> f32 {
    let v: f32 = (*v).into();
    v / 255.0 * 2.0 - 1.0
}

#[inline]
fn denormalize(v: &f32) -> f32 {
    (v + 1.0) / 2.0 * 255.0
}

/// Reorder to channel-first and scale every value to `[-1, 1]`.
///
/// Rank 3 input (H, W, C) becomes (C, H, W); rank 4 input (N, H, W, C)
/// becomes (N, C, H, W).
///
/// ```
/// use talkface_data::{to_tensor, PixelArray, WrappedTensor};
///
/// let arr = PixelArray::from_shape_vec(&[1, 2, 1], vec![0u8, 255]).unwrap();
/// let t = to_tensor(&arr).unwrap();
///
/// assert_eq!(t.shape(), vec![1, 1, 2]);
/// assert_eq!(t.as_slice(), &[-1.0, 1.0]);
/// ```
pub fn to_tensor<T>(arr: &PixelArray<T>) -> Result<WrappedTensor, DataError>
where
    T: Copy + Into<f32>,
{
    Ok(match arr {
        PixelArray::Single(t) => {
            WrappedTensor::Single(t.permute_axes([2, 0, 1]).as_contiguous().map(normalize))
        }
        PixelArray::Batch(t) => {
            WrappedTensor::Batch(t.permute_axes([0, 3, 1, 2]).as_contiguous().map(normalize))
        }
    })
}

/// Wrap a single image as a (C, H, W) tensor in `[-1, 1]`.
pub fn image_to_tensor<T, const C: usize>(image: &Image<T, C>) -> Tensor3<f32>
where
    T: Copy + Into<f32>,
{
    image.permute_axes([2, 0, 1]).as_contiguous().map(normalize)
}

/// Wrap a frame sequence as a (N, C, H, W) tensor in `[-1, 1]`.
pub fn sequence_to_tensor<const C: usize>(
    seq: &FrameSequence<C>,
) -> Result<Tensor4<f32>, DataError> {
    let frames = seq.iter().map(image_to_tensor).collect::<Vec<_>>();
    Ok(Tensor::stack(&frames)?)
}

/// Undo [`to_tensor`], returning channel-last values back in the `[0, 255]` scale.
///
/// Values are not rounded so the round trip can be checked within tolerance.
pub fn tensor_to_pixels(tensor: &WrappedTensor) -> PixelArray<f32> {
    match tensor {
        WrappedTensor::Single(t) => {
            PixelArray::Single(t.permute_axes([1, 2, 0]).as_contiguous().map(denormalize))
        }
        WrappedTensor::Batch(t) => {
            PixelArray::Batch(t.permute_axes([0, 2, 3, 1]).as_contiguous().map(denormalize))
        }
    }
}

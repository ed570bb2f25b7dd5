use crate::{get_strides_from_shape, Tensor};

/// A non-owning view into tensor data with its own shape and strides.
///
/// Views are produced by [`Tensor::permute_axes`] and [`Tensor::view`]; they never
/// copy until [`TensorView::as_contiguous`] is called.
///
/// ```rust
/// use talkface_tensor::Tensor2;
///
/// let tensor = Tensor2::<i32>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
///
/// // Transpose by permuting axes: [[1, 4], [2, 5], [3, 6]]
/// let transposed = tensor.permute_axes([1, 0]).as_contiguous();
/// assert_eq!(transposed.as_slice(), &[1, 4, 2, 5, 3, 6]);
/// ```
pub struct TensorView<'a, T, const N: usize> {
    /// Reference to the data held by another tensor.
    pub data: &'a [T],

    /// The shape of the tensor view.
    pub shape: [usize; N],

    /// The strides for accessing elements in the view.
    pub strides: [usize; N],
}

impl<T, const N: usize> TensorView<'_, T, N> {
    /// Returns the number of elements visible through the view.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Gets the element at the given index using the view's strides.
    ///
    /// # Panics
    ///
    /// Panics if the index falls outside the underlying data.
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        let offset = index
            .iter()
            .zip(self.strides.iter())
            .fold(0, |acc, (i, s)| acc + i * s);
        &self.data[offset]
    }

    /// Converts the view to an owned tensor with contiguous row-major layout.
    pub fn as_contiguous(&self) -> Tensor<T, N>
    where
        T: Clone,
    {
        let numel = self.numel();
        let mut data = Vec::<T>::with_capacity(numel);

        if numel > 0 {
            let mut index = [0; N];
            loop {
                data.push(self.get_unchecked(index).clone());

                // increment the multi-index, rightmost axis first
                let mut i = N - 1;
                while i > 0 && index[i] == self.shape[i] - 1 {
                    index[i] = 0;
                    i -= 1;
                }
                if i == 0 && index[0] == self.shape[0] - 1 {
                    break;
                }
                index[i] += 1;
            }
        }

        Tensor {
            data,
            shape: self.shape,
            strides: get_strides_from_shape(self.shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Tensor, TensorError};

    #[test]
    fn view_identity() -> Result<(), TensorError> {
        let t = Tensor::<u8, 1>::from_shape_vec([8], (1..=8).collect())?;
        let view = t.view();
        assert_eq!(view.numel(), 8);
        assert_eq!(view.get_unchecked([0]), &1);
        assert_eq!(view.get_unchecked([7]), &8);
        assert_eq!(view.as_contiguous(), t);
        Ok(())
    }

    #[test]
    fn view_nhwc_to_nchw() -> Result<(), TensorError> {
        // 2 frames of 1x2 pixels with 2 channels
        let t = Tensor::<u8, 4>::from_shape_vec([2, 1, 2, 2], vec![0, 1, 2, 3, 4, 5, 6, 7])?;
        let nchw = t.permute_axes([0, 3, 1, 2]).as_contiguous();
        assert_eq!(nchw.shape, [2, 2, 1, 2]);
        assert_eq!(nchw.as_slice(), &[0, 2, 1, 3, 4, 6, 5, 7]);
        Ok(())
    }

    #[test]
    fn view_empty() {
        let t = Tensor::<u8, 2>::from_shape_val([0, 3], 0);
        let c = t.permute_axes([1, 0]).as_contiguous();
        assert_eq!(c.shape, [3, 0]);
        assert_eq!(c.numel(), 0);
    }
}

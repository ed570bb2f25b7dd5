use thiserror::Error;

use crate::view::TensorView;

/// Error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Type casting operation failed.
    #[error("Type cast failed: source data cannot be safely converted to target type. Check value ranges.")]
    CastError,

    /// Tensor shape does not match the provided data.
    ///
    /// The product of the shape dimensions must equal the number of elements.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds tensor bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error with clear context.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Compute the strides from the shape of a tensor.
///
/// Strides are row-major: the rightmost dimension varies fastest.
///
/// # Examples
///
/// ```rust
/// use talkface_tensor::tensor::get_strides_from_shape;
///
/// let strides = get_strides_from_shape([2, 3, 4]);
/// assert_eq!(strides, [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array with owned, contiguous, row-major data.
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `N` - The number of dimensions, checked at compile time
///
/// # Examples
///
/// ```rust
/// use talkface_tensor::Tensor2;
///
/// let t = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(t.shape, [2, 2]);
/// assert_eq!(t.strides, [2, 1]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T, const N: usize> {
    pub(crate) data: Vec<T>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
}

impl<T, const N: usize> Tensor<T, N> {
    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape, an error is returned.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        let strides = get_strides_from_shape(shape);
        Ok(Self {
            data,
            shape,
            strides,
        })
    }

    /// Creates a new `Tensor` with the given shape filled with `value`.
    ///
    /// ```
    /// use talkface_tensor::Tensor3;
    ///
    /// let t = Tensor3::<u8>::from_shape_val([2, 1, 3], 2);
    /// assert_eq!(t.as_slice(), vec![2, 2, 2, 2, 2, 2]);
    /// ```
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self {
            data: vec![value; numel],
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a new `Tensor` generating each element from its index.
    ///
    /// ```
    /// use talkface_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_fn([2, 2], |[i, j]| (i * 2 + j) as u8);
    /// assert_eq!(t.as_slice(), vec![0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let data: Vec<T> = (0..numel)
            .map(|i| {
                let mut index = [0; N];
                let mut j = i;
                for k in (0..N).rev() {
                    index[k] = j % shape[k];
                    j /= shape[k];
                }
                f(index)
            })
            .collect();
        Self {
            data,
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Create a new tensor with all elements set to zero.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Returns the tensor data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the tensor data as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the tensor and returns the underlying data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get the offset of the element at the given index, `None` if out of bounds.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the element at the given index, checking bounds.
    ///
    /// ```
    /// use talkface_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(t.get([1, 0]), Some(&3));
    /// assert!(t.get([2, 0]).is_none());
    /// ```
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index).and_then(|i| self.data.get(i))
    }

    /// Get the element at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        let offset = index
            .iter()
            .zip(self.strides.iter())
            .fold(0, |acc, (i, s)| acc + i * s);
        &self.data[offset]
    }

    /// Permutes the dimensions of the tensor without copying.
    ///
    /// `axes[i]` names the source dimension that becomes the i-th output dimension.
    /// Call [`TensorView::as_contiguous`] to materialize the new layout.
    pub fn permute_axes(&self, axes: [usize; N]) -> TensorView<'_, T, N> {
        let mut new_shape = [0; N];
        let mut new_strides = [0; N];
        for (i, &axis) in axes.iter().enumerate() {
            new_shape[i] = self.shape[axis];
            new_strides[i] = self.strides[axis];
        }

        TensorView {
            data: &self.data,
            shape: new_shape,
            strides: new_strides,
        }
    }

    /// Return a view of the tensor with its current shape and strides.
    pub fn view(&self) -> TensorView<'_, T, N> {
        TensorView {
            data: &self.data,
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Apply a function to each element of the tensor.
    ///
    /// ```
    /// use talkface_tensor::Tensor1;
    ///
    /// let t = Tensor1::<u8>::from_shape_vec([4], vec![1, 2, 3, 4]).unwrap();
    /// let t2 = t.map(|x| *x as f32 * 0.5);
    /// assert_eq!(t2.as_slice(), vec![0.5, 1.0, 1.5, 2.0]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Tensor<U, N>
    where
        F: Fn(&T) -> U,
    {
        Tensor {
            data: self.data.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Cast the tensor elements to another numeric type.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::CastError`] if any element does not fit in `U`.
    pub fn cast<U>(&self) -> Result<Tensor<U, N>, TensorError>
    where
        T: num_traits::NumCast + Copy,
        U: num_traits::NumCast,
    {
        let data = self
            .data
            .iter()
            .map(|&x| U::from(x).ok_or(TensorError::CastError))
            .collect::<Result<Vec<U>, TensorError>>()?;

        Ok(Tensor {
            data,
            shape: self.shape,
            strides: self.strides,
        })
    }

    /// Stack tensors of identical shape along a new leading axis.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::DimensionMismatch`] if the shapes differ, and
    /// [`TensorError::InvalidShape`] if `M != N + 1`.
    pub fn stack<const M: usize>(tensors: &[Tensor<T, N>]) -> Result<Tensor<T, M>, TensorError>
    where
        T: Clone,
    {
        if M != N + 1 {
            return Err(TensorError::invalid_shape(N + 1, M));
        }

        let inner_shape = match tensors.first() {
            Some(first) => first.shape,
            None => [0; N],
        };

        let mut data = Vec::with_capacity(tensors.len() * inner_shape.iter().product::<usize>());
        for t in tensors {
            if t.shape != inner_shape {
                return Err(TensorError::dimension_mismatch(
                    "stacked tensors must share shape",
                    &inner_shape,
                    &t.shape,
                ));
            }
            data.extend_from_slice(&t.data);
        }

        let mut shape = [0; M];
        shape[0] = tensors.len();
        shape[1..].copy_from_slice(&inner_shape);

        Tensor::from_shape_vec(shape, data)
    }
}

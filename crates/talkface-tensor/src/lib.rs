#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `talkface-tensor` holds pixel data and model-ready arrays as owned, row-major
//! multi-dimensional tensors with compile-time rank.
//!
//! ```rust
//! use talkface_tensor::Tensor3;
//!
//! // a 2x2 RGB image in (H, W, C) layout
//! let hwc = Tensor3::<u8>::from_shape_val([2, 2, 3], 7);
//!
//! // reorder to channel-first (C, H, W)
//! let chw = hwc.permute_axes([2, 0, 1]).as_contiguous();
//! assert_eq!(chw.shape, [3, 2, 2]);
//! ```

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

/// View module containing non-owning, strided tensor views.
pub mod view;

pub(crate) use crate::tensor::get_strides_from_shape;
pub use crate::tensor::{Tensor, TensorError};
pub use crate::view::TensorView;

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T> = Tensor<T, 1>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T> = Tensor<T, 2>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T> = Tensor<T, 3>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T> = Tensor<T, 4>;

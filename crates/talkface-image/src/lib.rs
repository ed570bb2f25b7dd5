#![deny(missing_docs)]
//! Image types and traits for frames flowing through the augmentation pipeline

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image level casting operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};

//! Filter operations
//!
//! This module provides neighborhood filters for image processing.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image cropping module.
pub mod crop;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

/// spatial padding with border modes.
pub mod padding;

/// utility functions for resizing images.
pub mod resize;

/// image geometric transformations module.
pub mod warp;

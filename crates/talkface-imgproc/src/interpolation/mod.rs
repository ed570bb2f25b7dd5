//! Pixel interpolation methods for image transformations.
//!
//! Used when resampling frames during resizing and perspective warping.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: uses the nearest pixel value
//! - **Bilinear**: linear interpolation between the four adjacent pixels

mod bilinear;

/// Grid generation and coordinate mapping utilities.
pub mod grid;

mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};

//! Perspective (homography) warps of images.
//!
//! - Homography estimation from four point correspondences
//! - Homography inversion and point transformation
//! - Image warping with constant or replicated borders
//!
//! # Examples
//!
//! Estimating a homography that shifts every point one pixel to the right:
//!
//! ```
//! use talkface_imgproc::warp::get_perspective_transform;
//!
//! let src = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
//! let dst = [[1.0, 0.0], [2.0, 0.0], [1.0, 1.0], [2.0, 1.0]];
//!
//! let m = get_perspective_transform(&src, &dst);
//! assert!((m[2] - 1.0).abs() < 1e-5);
//! ```

mod perspective;

pub use perspective::{
    get_perspective_transform, invert_perspective_transform, transform_point, warp_perspective,
    BorderMode,
};

use talkface_tensor::TensorError;

/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the underlying tensor cannot be built.
    #[error("Invalid shape: {0}")]
    InvalidShape(#[from] TensorError),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must match have different sizes.
    #[error("Image size mismatch ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when an image dimension is zero.
    #[error("Image size must be non-zero, got {0}x{1}")]
    ZeroImageSize(usize, usize),

    /// Error when the pixel data cannot be cast to another type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when a transform matrix is singular.
    #[error("Cannot compute the determinant of a singular matrix")]
    CannotComputeDeterminant,

    /// Error when a filter kernel has an unsupported size.
    #[error("Invalid kernel size {0}, must be odd and positive")]
    InvalidKernelSize(usize),
}

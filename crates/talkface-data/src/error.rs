use talkface_image::{ImageError, ImageSize};
use talkface_tensor::TensorError;

/// An error type for the dataset and augmentation layer.
#[derive(thiserror::Error, Debug)]
pub enum DataError {
    /// Error coming from an image kernel.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from a tensor operation.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// A frame sequence must hold at least one frame.
    #[error("Frame sequence is empty")]
    EmptySequence,

    /// A frame does not share the shape of the first frame.
    #[error("Frame {index} has size {actual}, expected {expected}")]
    FrameShapeMismatch {
        /// Position of the offending frame.
        index: usize,
        /// Size of the first frame.
        expected: ImageSize,
        /// Size of the offending frame.
        actual: ImageSize,
    },

    /// A frame is too small for the sampled reshape squeeze.
    #[error("Frame of size {size} cannot absorb a reshape of {reshape_size} pixels per side")]
    FrameTooSmall {
        /// Size of the frame.
        size: ImageSize,
        /// Sampled reshape size.
        reshape_size: usize,
    },

    /// Pixel arrays are either (H, W, C) or (N, H, W, C).
    #[error("Pixel array must have rank 3 or 4, got {0}")]
    InvalidRank(usize),

    /// No registered dataset matches the requested name.
    #[error("No dataset registered as {target} (module {module})")]
    DatasetNotFound {
        /// Module path the dataset is expected in.
        module: String,
        /// Normalized class name searched for.
        target: String,
    },

    /// Dataset index out of range.
    #[error("Index {index} is out of bounds for dataset of size {len}")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Dataset length.
        len: usize,
    },

    /// A configuration value is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sample does not carry the requested field.
    #[error("Sample has no field named {0}")]
    MissingField(String),

    /// Options could not be parsed.
    #[error("Failed to parse options: {0}")]
    Options(#[from] serde_json::Error),

    /// Options file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The loader worker pool could not be built.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// stochastic frame augmentations.
pub mod augment;

/// dataset contract and samples.
pub mod dataset;

/// Error types for the data module.
pub mod error;

/// frames and frame sequences.
pub mod frame;

/// batching data loaders.
pub mod loader;

/// run options of the dataset layer.
pub mod options;

/// dataset lookup by name.
pub mod registry;

/// pixel array to tensor conversion.
pub mod tensor_wrap;

pub use crate::augment::{face_augmentation, FaceAugmentation};
pub use crate::dataset::{Dataset, InMemoryDataset, Sample};
pub use crate::error::DataError;
pub use crate::frame::{Frame, FrameSequence};
pub use crate::loader::{create_dataloader, Batch, DataLoader, DataLoaderConfig, DataLoaders};
pub use crate::options::DatasetOptions;
pub use crate::registry::DatasetRegistry;
pub use crate::tensor_wrap::{to_tensor, PixelArray, WrappedTensor};

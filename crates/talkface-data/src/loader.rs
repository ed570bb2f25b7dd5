//! Batching over a [`Dataset`], with the shuffle and drop-last policies of
//! the training and evaluation runs.

use std::collections::BTreeMap;

use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rayon::prelude::*;
use talkface_image::ImageSize;
use talkface_tensor::{Tensor, Tensor4};

use crate::{
    dataset::{Dataset, Sample},
    error::DataError,
    options::DatasetOptions,
    registry::DatasetRegistry,
    tensor_wrap::WrappedTensor,
};

/// How a [`DataLoader`] batches and orders the samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLoaderConfig {
    /// Samples per batch, at least 1.
    pub batch_size: usize,
    /// Draw a new permutation every epoch.
    pub shuffle: bool,
    /// Skip the trailing batch when it is smaller than `batch_size`.
    pub drop_last: bool,
    /// Worker threads fetching the samples of a batch, 0 fetches on the calling thread.
    pub num_workers: usize,
    /// Base seed of the shuffles; drawn from the OS when unset.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            shuffle: false,
            drop_last: false,
            num_workers: 0,
            seed: None,
        }
    }
}

impl DataLoaderConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> DataLoaderConfigBuilder {
        DataLoaderConfigBuilder::default()
    }
}

/// Builder of [`DataLoaderConfig`].
#[derive(Debug, Default)]
pub struct DataLoaderConfigBuilder {
    config: DataLoaderConfig,
}

impl DataLoaderConfigBuilder {
    /// Set the batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Enable or disable shuffling.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.config.shuffle = shuffle;
        self
    }

    /// Enable or disable dropping the trailing partial batch.
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.config.drop_last = drop_last;
        self
    }

    /// Set the number of worker threads.
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.config.num_workers = num_workers;
        self
    }

    /// Set the base shuffle seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Finish the configuration.
    pub fn build(self) -> DataLoaderConfig {
        self.config
    }
}

/// The samples of one batch with their dataset indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    /// Dataset index of every sample.
    pub indices: Vec<usize>,
    /// The samples, in the order of `indices`.
    pub samples: Vec<Sample>,
}

impl Batch {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a batch without samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Collate the single-image field `name` of every sample into (N, C, H, W).
    ///
    /// # Errors
    ///
    /// [`DataError::MissingField`] if a sample lacks the field,
    /// [`DataError::InvalidRank`] if a field is already batched and
    /// [`DataError::FrameShapeMismatch`] if the spatial sizes differ.
    pub fn stack(&self, name: &str) -> Result<Tensor4<f32>, DataError> {
        let mut tensors = Vec::with_capacity(self.samples.len());
        for sample in &self.samples {
            match sample.field(name)? {
                WrappedTensor::Single(t) => tensors.push(t.clone()),
                WrappedTensor::Batch(_) => return Err(DataError::InvalidRank(4)),
            }
        }

        let size_of = |shape: [usize; 3]| ImageSize {
            width: shape[2],
            height: shape[1],
        };
        if let Some(first) = tensors.first() {
            let expected = size_of(first.shape);
            if let Some((index, t)) = tensors
                .iter()
                .enumerate()
                .find(|(_, t)| size_of(t.shape) != expected)
            {
                return Err(DataError::FrameShapeMismatch {
                    index,
                    expected,
                    actual: size_of(t.shape),
                });
            }
        }

        Ok(Tensor::stack(&tensors)?)
    }
}

/// Iterates a dataset in batches.
pub struct DataLoader {
    dataset: Box<dyn Dataset>,
    config: DataLoaderConfig,
    seed: u64,
    pool: Option<rayon::ThreadPool>,
}

impl DataLoader {
    /// Create a loader, spawning its worker pool when `num_workers > 0`.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidConfig`] for a zero batch size and
    /// [`DataError::ThreadPool`] if the workers cannot be spawned.
    pub fn new(dataset: Box<dyn Dataset>, config: DataLoaderConfig) -> Result<Self, DataError> {
        if config.batch_size == 0 {
            return Err(DataError::InvalidConfig(
                "batch_size must be > 0".to_string(),
            ));
        }

        let pool = match config.num_workers {
            0 => None,
            n => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
        };
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());

        Ok(Self {
            dataset,
            config,
            seed,
            pool,
        })
    }

    /// The wrapped dataset.
    pub fn dataset(&self) -> &dyn Dataset {
        self.dataset.as_ref()
    }

    /// The loader configuration.
    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    /// Number of batches per epoch.
    pub fn len(&self) -> usize {
        let (n, bs) = (self.dataset.len(), self.config.batch_size);
        if self.config.drop_last {
            n / bs
        } else {
            n.div_ceil(bs)
        }
    }

    /// True when an epoch yields no batch.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sample order of `epoch`.
    ///
    /// Shuffled orders are seeded with `seed + epoch`, so they are
    /// reproducible for a fixed seed and differ between epochs.
    pub fn indices(&self, epoch: usize) -> Vec<usize> {
        let mut indices = (0..self.dataset.len()).collect::<Vec<_>>();
        if self.config.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(epoch as u64));
            indices.shuffle(&mut rng);
        }
        indices
    }

    /// Iterate over the batches of `epoch`.
    pub fn iter(&self, epoch: usize) -> BatchIter<'_> {
        BatchIter {
            loader: self,
            indices: self.indices(epoch),
            pos: 0,
        }
    }

    fn fetch(&self, indices: &[usize]) -> Result<Vec<Sample>, DataError> {
        let dataset = self.dataset.as_ref();
        match &self.pool {
            Some(pool) => pool.install(|| {
                indices
                    .par_iter()
                    .map(|&i| dataset.get(i))
                    .collect::<Result<Vec<_>, _>>()
            }),
            None => indices.iter().map(|&i| dataset.get(i)).collect(),
        }
    }
}

/// Iterator over the batches of one epoch.
pub struct BatchIter<'a> {
    loader: &'a DataLoader,
    indices: Vec<usize>,
    pos: usize,
}

impl Iterator for BatchIter<'_> {
    type Item = Result<Batch, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch_size = self.loader.config.batch_size;
        let remaining = self.indices.len().saturating_sub(self.pos);
        if remaining == 0 || (remaining < batch_size && self.loader.config.drop_last) {
            return None;
        }

        let end = self.pos + remaining.min(batch_size);
        let indices = self.indices[self.pos..end].to_vec();
        self.pos = end;

        Some(
            self.loader
                .fetch(&indices)
                .map(|samples| Batch { indices, samples }),
        )
    }
}

/// The loaders built by [`create_dataloader`].
pub enum DataLoaders {
    /// `dataset_mode` named one dataset.
    Single(DataLoader),
    /// One loader per comma-separated mode, keyed by mode name.
    Multi(BTreeMap<String, DataLoader>),
}

impl DataLoaders {
    /// The loader of a single-mode run.
    pub fn single(&self) -> Option<&DataLoader> {
        match self {
            Self::Single(loader) => Some(loader),
            Self::Multi(_) => None,
        }
    }

    /// The loader of `mode` in a multi-mode run.
    pub fn get(&self, mode: &str) -> Option<&DataLoader> {
        match self {
            Self::Single(_) => None,
            Self::Multi(loaders) => loaders.get(mode),
        }
    }
}

fn build_loader(
    registry: &DatasetRegistry,
    mode: &str,
    opts: &DatasetOptions,
    shuffle: bool,
) -> Result<DataLoader, DataError> {
    let mut dataset = registry.find_dataset_using_name(mode)?.create();
    dataset.initialize(opts)?;
    info!(
        "dataset [{}] of size {} was created",
        dataset.name(),
        dataset.len()
    );

    let mut builder = DataLoaderConfig::builder()
        .batch_size(opts.batch_size)
        .shuffle(shuffle)
        .drop_last(opts.is_train)
        .num_workers(opts.n_threads);
    if let Some(seed) = opts.seed {
        builder = builder.seed(seed);
    }

    DataLoader::new(dataset, builder.build())
}

/// Create the loaders of the datasets named in `opts.dataset_mode`.
///
/// Training runs shuffle and drop the trailing partial batch. Evaluation over
/// several datasets still shuffles unless `defined_driven` is set.
pub fn create_dataloader(
    registry: &DatasetRegistry,
    opts: &DatasetOptions,
) -> Result<DataLoaders, DataError> {
    let modes = opts.dataset_modes();
    if let [mode] = modes.as_slice() {
        let loader = build_loader(registry, mode, opts, opts.is_train)?;
        return Ok(DataLoaders::Single(loader));
    }

    let shuffle = opts.is_train || !opts.defined_driven;
    let mut loaders = BTreeMap::new();
    for mode in modes {
        loaders.insert(mode.to_string(), build_loader(registry, mode, opts, shuffle)?);
    }
    Ok(DataLoaders::Multi(loaders))
}

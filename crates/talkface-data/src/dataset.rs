use std::collections::BTreeMap;

use crate::{error::DataError, options::DatasetOptions, tensor_wrap::WrappedTensor};

/// One item of a dataset: named tensors such as `"img"` or `"target"`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sample {
    fields: BTreeMap<String, WrappedTensor>,
}

impl Sample {
    /// An empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, consuming and returning the sample.
    pub fn with_field(mut self, name: impl Into<String>, value: WrappedTensor) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: WrappedTensor) -> Option<WrappedTensor> {
        self.fields.insert(name.into(), value)
    }

    /// Look a field up.
    pub fn get(&self, name: &str) -> Option<&WrappedTensor> {
        self.fields.get(name)
    }

    /// Look a field up, failing with [`DataError::MissingField`].
    pub fn field(&self, name: &str) -> Result<&WrappedTensor, DataError> {
        self.get(name)
            .ok_or_else(|| DataError::MissingField(name.to_string()))
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the sample has no field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Random-access collection of samples.
///
/// Implementations are shared with loader worker threads, hence `Send + Sync`.
pub trait Dataset: Send + Sync {
    /// Name reported when the dataset is created.
    fn name(&self) -> &str;

    /// Prepare the dataset from the run options, before any `get`.
    fn initialize(&mut self, _opts: &DatasetOptions) -> Result<(), DataError> {
        Ok(())
    }

    /// Number of samples.
    fn len(&self) -> usize;

    /// True when the dataset holds no sample.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the sample at `index`.
    fn get(&self, index: usize) -> Result<Sample, DataError>;
}

/// A dataset holding every sample in memory.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    name: String,
    samples: Vec<Sample>,
}

impl InMemoryDataset {
    /// Wrap a list of samples.
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

impl Dataset for InMemoryDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<Sample, DataError> {
        self.samples
            .get(index)
            .cloned()
            .ok_or(DataError::IndexOutOfBounds {
                index,
                len: self.samples.len(),
            })
    }
}

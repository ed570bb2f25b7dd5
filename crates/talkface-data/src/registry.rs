//! Lookup of dataset implementations by name.
//!
//! Datasets are registered explicitly at startup under a class-like
//! identifier such as `"VoxCelebDataset"`. A requested name like
//! `"vox_celeb"` is normalized with [`target_dataset_name`] and compared
//! case-insensitively against the identifiers.

use std::fmt;

use crate::{dataset::Dataset, error::DataError, options::DatasetOptions};

/// Creates a fresh, uninitialized dataset.
pub type DatasetFactory = Box<dyn Fn() -> Box<dyn Dataset> + Send + Sync>;

/// Adjusts the run options for a dataset, given whether it is a training run.
pub type OptionSetter = fn(DatasetOptions, bool) -> DatasetOptions;

/// The option setter of datasets that do not need one.
pub fn identity_option_setter(opts: DatasetOptions, _is_train: bool) -> DatasetOptions {
    opts
}

/// The identifier a dataset name is expected to match, in lowercase.
///
/// ```
/// use talkface_data::registry::target_dataset_name;
///
/// assert_eq!(target_dataset_name("vox_celeb"), "voxcelebdataset");
/// assert_eq!(target_dataset_name("LRW"), "lrwdataset");
/// ```
pub fn target_dataset_name(name: &str) -> String {
    format!("{}dataset", name.replace('_', "")).to_lowercase()
}

/// A registered dataset.
pub struct DatasetEntry {
    identifier: String,
    factory: DatasetFactory,
    option_setter: OptionSetter,
}

impl DatasetEntry {
    /// The identifier the dataset was registered under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Build a new instance of the dataset.
    pub fn create(&self) -> Box<dyn Dataset> {
        (self.factory)()
    }

    /// The option hook of the dataset.
    pub fn option_setter(&self) -> OptionSetter {
        self.option_setter
    }
}

impl fmt::Debug for DatasetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetEntry")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Explicit name to dataset map.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    entries: Vec<DatasetEntry>,
}

impl DatasetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset with the identity option setter.
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Dataset> + Send + Sync + 'static,
    {
        self.register_with_options(identifier, factory, identity_option_setter)
    }

    /// Register a dataset together with its option hook.
    ///
    /// When two identifiers match the same name, the later registration wins.
    pub fn register_with_options<F>(
        &mut self,
        identifier: impl Into<String>,
        factory: F,
        option_setter: OptionSetter,
    ) -> &mut Self
    where
        F: Fn() -> Box<dyn Dataset> + Send + Sync + 'static,
    {
        self.entries.push(DatasetEntry {
            identifier: identifier.into(),
            factory: Box::new(factory),
            option_setter,
        });
        self
    }

    /// Number of registered datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the dataset registered for `name`.
    ///
    /// # Errors
    ///
    /// [`DataError::DatasetNotFound`] naming the expected module and identifier.
    pub fn find_dataset_using_name(&self, name: &str) -> Result<&DatasetEntry, DataError> {
        let target = target_dataset_name(name);
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.identifier.to_lowercase() == target)
            .ok_or_else(|| DataError::DatasetNotFound {
                module: format!("data.{name}_dataset"),
                target,
            })
    }

    /// The option hook of the dataset registered for `name`.
    pub fn get_option_setter(&self, name: &str) -> Result<OptionSetter, DataError> {
        Ok(self.find_dataset_using_name(name)?.option_setter())
    }

    /// Run the option hooks of every dataset named in `opts.dataset_mode`, in order.
    pub fn modify_options(&self, opts: DatasetOptions) -> Result<DatasetOptions, DataError> {
        let is_train = opts.is_train;
        let setters = opts
            .dataset_modes()
            .into_iter()
            .map(|mode| self.get_option_setter(mode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(setters
            .into_iter()
            .fold(opts, |opts, setter| setter(opts, is_train)))
    }
}

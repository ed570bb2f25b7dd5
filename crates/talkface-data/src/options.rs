use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Run options consumed by the dataset layer.
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides. Unknown keys are kept in [`DatasetOptions::extra`] for
/// dataset-specific settings.
///
/// ```
/// use talkface_data::DatasetOptions;
///
/// let opts = DatasetOptions::from_json_str(
///     r#"{ "dataset_mode": "voxceleb", "batch_size": 4, "num_frames": 5 }"#,
/// ).unwrap();
///
/// assert_eq!(opts.batch_size, 4);
/// assert!(opts.is_train);
/// assert_eq!(opts.extra["num_frames"], 5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    /// One dataset name, or several separated by commas.
    pub dataset_mode: String,
    /// Samples per batch.
    pub batch_size: usize,
    /// Loader worker threads, 0 loads on the calling thread.
    pub n_threads: usize,
    /// Training run.
    pub is_train: bool,
    /// Evaluation over a fixed driving order; disables shuffling in multi-dataset evaluation.
    pub defined_driven: bool,
    /// Side of the square face crop.
    pub crop_size: usize,
    /// Base seed of the loader shuffles.
    pub seed: Option<u64>,
    /// Dataset-specific options.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            dataset_mode: String::new(),
            batch_size: 1,
            n_threads: 0,
            is_train: true,
            defined_driven: false,
            crop_size: 224,
            seed: None,
            extra: BTreeMap::new(),
        }
    }
}

impl DatasetOptions {
    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// The dataset names of `dataset_mode`, split on commas.
    pub fn dataset_modes(&self) -> Vec<&str> {
        self.dataset_mode.split(',').map(str::trim).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_object() -> Result<(), DataError> {
        let opts = DatasetOptions::from_json_str("{}")?;
        assert_eq!(opts, DatasetOptions::default());
        Ok(())
    }

    #[test]
    fn malformed_json() {
        let res = DatasetOptions::from_json_str(r#"{ "batch_size": "four" }"#);
        assert!(matches!(res, Err(DataError::Options(_))));
    }

    #[test]
    fn split_modes() {
        let opts = DatasetOptions {
            dataset_mode: "voxceleb, lrw".to_string(),
            ..Default::default()
        };
        assert_eq!(opts.dataset_modes(), vec!["voxceleb", "lrw"]);
    }
}

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Sampling ranges of the color transfer stage.
///
/// Ranges are half-open, `[lo, hi)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTransferConfig {
    /// Range of the multiplicative gain.
    pub gain: (f32, f32),
    /// Range of the first perturbed channel.
    pub start_channel: (usize, usize),
    /// Exclusive upper bound of the end channel; the end is drawn from `[start + 1, end_channel_max)`.
    pub end_channel_max: usize,
}

impl Default for ColorTransferConfig {
    fn default() -> Self {
        Self {
            gain: (0.3, 1.6),
            start_channel: (0, 2),
            end_channel_max: 4,
        }
    }
}

/// Sampling ranges of the reshape stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshapeConfig {
    /// Range of the squeeze applied to each side, in pixels.
    pub reshape_size: (usize, usize),
    /// Range of the perspective offset magnitude, in pixels.
    pub pers_size: (i32, i32),
    /// Range of the corner enlargement magnitude, in pixels.
    pub enlarge_size: (i32, i32),
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            reshape_size: (15, 25),
            pers_size: (20, 30),
            enlarge_size: (20, 40),
        }
    }
}

/// Sampling set of the blur stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSharpenConfig {
    /// Median apertures to pick from when blurring.
    pub median_apertures: Vec<usize>,
}

impl Default for BlurSharpenConfig {
    fn default() -> Self {
        Self {
            median_apertures: vec![3, 5, 7, 9],
        }
    }
}

/// Sampling ranges of the whole face augmentation pipeline.
///
/// ```
/// use talkface_data::augment::AugmentationConfig;
///
/// let config: AugmentationConfig =
///     serde_json::from_str(r#"{ "blur": { "median_apertures": [3] } }"#).unwrap();
///
/// assert_eq!(config.blur.median_apertures, vec![3]);
/// assert_eq!(config.color.gain, (0.3, 1.6));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    /// Color transfer ranges.
    pub color: ColorTransferConfig,
    /// Reshape ranges.
    pub reshape: ReshapeConfig,
    /// Blur and sharpen choices.
    pub blur: BlurSharpenConfig,
}

fn check(ok: bool, msg: impl FnOnce() -> String) -> Result<(), DataError> {
    if ok {
        Ok(())
    } else {
        Err(DataError::InvalidConfig(msg()))
    }
}

impl ColorTransferConfig {
    /// Check that the gain and channel ranges can be sampled from.
    pub fn validate(&self) -> Result<(), DataError> {
        check(self.gain.0 < self.gain.1 && self.gain.0 >= 0.0, || {
            format!("color.gain {:?} must be a non-empty, non-negative range", self.gain)
        })?;
        check(self.start_channel.0 < self.start_channel.1, || {
            format!("color.start_channel {:?} is empty", self.start_channel)
        })?;
        check(self.start_channel.1 < self.end_channel_max, || {
            format!(
                "color.end_channel_max {} leaves no end channel after start {:?}",
                self.end_channel_max, self.start_channel
            )
        })
    }
}

impl ReshapeConfig {
    /// Check that the squeeze, perspective and enlargement ranges can be sampled from.
    pub fn validate(&self) -> Result<(), DataError> {
        check(
            self.reshape_size.0 < self.reshape_size.1 && self.reshape_size.0 >= 2,
            || {
                format!(
                    "reshape.reshape_size {:?} must be non-empty and start at 2 or more",
                    self.reshape_size
                )
            },
        )?;
        check(self.pers_size.0 < self.pers_size.1 && self.pers_size.0 >= 0, || {
            format!(
                "reshape.pers_size {:?} must be a non-empty, non-negative range",
                self.pers_size
            )
        })?;
        check(
            self.enlarge_size.0 < self.enlarge_size.1 && self.enlarge_size.0 >= 0,
            || {
                format!(
                    "reshape.enlarge_size {:?} must be a non-empty, non-negative range",
                    self.enlarge_size
                )
            },
        )
    }
}

impl BlurSharpenConfig {
    /// Check that there is at least one aperture and that all of them are odd.
    pub fn validate(&self) -> Result<(), DataError> {
        check(!self.median_apertures.is_empty(), || {
            "blur.median_apertures is empty".to_string()
        })?;
        match self.median_apertures.iter().find(|k| **k % 2 == 0) {
            Some(k) => Err(DataError::InvalidConfig(format!(
                "blur.median_apertures holds even aperture {k}"
            ))),
            None => Ok(()),
        }
    }
}

impl AugmentationConfig {
    /// Check that every range can be sampled from.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidConfig`] naming the first unusable field.
    pub fn validate(&self) -> Result<(), DataError> {
        self.color.validate()?;
        self.reshape.validate()?;
        self.blur.validate()
    }
}

use log::debug;
use rand::{seq::IndexedRandom, Rng};
use talkface_imgproc::{
    filter::{filter2d, kernels::sharpen_kernel_3x3, median_blur},
    padding::PaddingMode,
};

use super::config::BlurSharpenConfig;
use crate::{
    error::DataError,
    frame::{Frame, FrameSequence},
};

/// The filter applied to every frame of one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurSharpenParams {
    /// Median blur with a square aperture.
    Blur {
        /// Aperture side, odd.
        ksize: usize,
    },
    /// 3x3 sharpening, `[[-1, -1, -1], [-1, 9, -1], [-1, -1, -1]]`.
    Sharpen,
}

impl BlurSharpenParams {
    /// Filter every frame of the sequence.
    pub fn apply<const C: usize>(
        &self,
        seq: &FrameSequence<C>,
    ) -> Result<FrameSequence<C>, DataError> {
        let kernel = sharpen_kernel_3x3();
        seq.try_map(|frame| {
            let mut out = Frame::<C>::from_size_val(frame.size(), 0)?;
            match *self {
                Self::Blur { ksize } => median_blur(frame, &mut out, ksize)?,
                Self::Sharpen => filter2d(frame, &mut out, &kernel, 3, PaddingMode::Reflect101)?,
            }
            Ok(out)
        })
    }
}

/// Random median blur or sharpening, decided once per sequence.
#[derive(Clone, Debug, Default)]
pub struct BlurSharpenAugmenter {
    config: BlurSharpenConfig,
}

impl BlurSharpenAugmenter {
    /// Create the augmenter with a custom aperture set.
    pub fn new(config: BlurSharpenConfig) -> Self {
        Self { config }
    }

    /// Flip the blur coin and, when blurring, pick the aperture.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidConfig`] if there is no aperture to pick from or one is even.
    pub fn sample_params<R: Rng>(&self, rng: &mut R) -> Result<BlurSharpenParams, DataError> {
        self.config.validate()?;

        if rng.random_bool(0.5) {
            let ksize = *self
                .config
                .median_apertures
                .choose(rng)
                .ok_or_else(|| DataError::InvalidConfig("no median aperture".to_string()))?;
            Ok(BlurSharpenParams::Blur { ksize })
        } else {
            Ok(BlurSharpenParams::Sharpen)
        }
    }

    /// Sample parameters once and filter the whole sequence.
    pub fn apply<const C: usize, R: Rng>(
        &self,
        seq: &FrameSequence<C>,
        rng: &mut R,
    ) -> Result<FrameSequence<C>, DataError> {
        let params = self.sample_params(rng)?;
        debug!("blur/sharpen: {params:?}");
        params.apply(seq)
    }
}

/// Blur or sharpen with the default apertures.
pub fn blur_sharpen<const C: usize, R: Rng>(
    seq: &FrameSequence<C>,
    rng: &mut R,
) -> Result<FrameSequence<C>, DataError> {
    BlurSharpenAugmenter::default().apply(seq, rng)
}

use std::ops::Range;

use log::debug;
use rand::Rng;
use talkface_imgproc::enhance::scale_channels;

use super::config::ColorTransferConfig;
use crate::{
    error::DataError,
    frame::{Frame, FrameSequence},
};

/// Parameters of one color transfer call, shared by every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTransferParams {
    /// Multiplicative gain.
    pub gain: f32,
    /// First perturbed channel.
    pub start_channel: usize,
    /// One past the last perturbed channel, before clipping to the frame channels.
    pub end_channel: usize,
}

impl ColorTransferParams {
    /// The perturbed channels of a frame with `num_channels` channels.
    pub fn channels(&self, num_channels: usize) -> Range<usize> {
        self.start_channel.min(num_channels)..self.end_channel.min(num_channels)
    }

    /// Apply the gain to every frame of the sequence.
    pub fn apply<const C: usize>(
        &self,
        seq: &FrameSequence<C>,
    ) -> Result<FrameSequence<C>, DataError> {
        let channels = self.channels(C);
        seq.try_map(|frame| {
            let mut out = Frame::<C>::from_size_val(frame.size(), 0)?;
            scale_channels(frame, &mut out, self.gain, channels.clone())?;
            Ok(out)
        })
    }
}

/// Random per-sequence gain on a random contiguous range of channels.
#[derive(Clone, Debug, Default)]
pub struct ColorTransfer {
    config: ColorTransferConfig,
}

impl ColorTransfer {
    /// Create the augmenter with custom sampling ranges.
    pub fn new(config: ColorTransferConfig) -> Self {
        Self { config }
    }

    /// Draw the parameters of one call.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidConfig`] if a range is empty.
    pub fn sample_params<R: Rng>(&self, rng: &mut R) -> Result<ColorTransferParams, DataError> {
        self.config.validate()?;

        let gain = rng.random_range(self.config.gain.0..self.config.gain.1);
        let start_channel =
            rng.random_range(self.config.start_channel.0..self.config.start_channel.1);
        let end_channel = rng.random_range(start_channel + 1..self.config.end_channel_max);

        Ok(ColorTransferParams {
            gain,
            start_channel,
            end_channel,
        })
    }

    /// Sample parameters once and apply them to the whole sequence.
    pub fn apply<const C: usize, R: Rng>(
        &self,
        seq: &FrameSequence<C>,
        rng: &mut R,
    ) -> Result<FrameSequence<C>, DataError> {
        let params = self.sample_params(rng)?;
        debug!("color transfer: {params:?}");
        params.apply(seq)
    }
}

/// Color transfer with the default ranges.
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use talkface_data::{augment::color_transfer, FrameSequence};
/// use talkface_image::Image;
///
/// let frame = Image::<u8, 3>::from_size_val([8, 8].into(), 100).unwrap();
/// let seq = FrameSequence::new(vec![frame.clone(), frame]).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let out = color_transfer(&seq, &mut rng).unwrap();
///
/// assert_eq!(out.frame_size(), seq.frame_size());
/// assert_eq!(out.frames()[0], out.frames()[1]);
/// ```
pub fn color_transfer<const C: usize, R: Rng>(
    seq: &FrameSequence<C>,
    rng: &mut R,
) -> Result<FrameSequence<C>, DataError> {
    ColorTransfer::default().apply(seq, rng)
}

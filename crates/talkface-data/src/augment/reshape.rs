use log::{debug, warn};
use rand::Rng;
use talkface_image::{ops::from_f32_saturating, Image, ImageSize};
use talkface_imgproc::{
    crop::crop_image,
    interpolation::InterpolationMode,
    padding::{spatial_padding, Padding2D, PaddingMode},
    resize::resize_native,
    warp::{get_perspective_transform, warp_perspective, BorderMode},
};

use super::config::ReshapeConfig;
use crate::{
    error::DataError,
    frame::{Frame, FrameSequence},
};

/// A row-major 3x3 homography.
pub type PerspectiveMatrix = [f32; 9];

/// Parameters of one reshape call, shared by every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReshapeParams {
    /// Squeeze the frame vertically (`true`) or horizontally (`false`).
    pub reshape: bool,
    /// Pixels removed from each side of the squeezed axis.
    pub reshape_size: usize,
    /// Extra reflected padding kept around the squeezed axis.
    pub extra_padding_size: usize,
    /// Signed perspective offset of the far corners.
    pub pers_size: i32,
    /// Signed enlargement of the warp corners.
    pub enlarge_size: i32,
}

/// Warp a frame with the corner-shift homography and crop it to `crop_size`.
///
/// With `(h, w)` the frame height and width, `e = enlarge_size` and
/// `p = pers_size`, the homography maps the `[x, y]` points
///
/// `(-e, -e), (-e, w + e), (h + e, -e), (h + e, w + e)`
///
/// onto
///
/// `(-e, -e), (-e + p, w + e), (h + e, -e), (h + e - p, w + e)`.
///
/// The output is `crop_size x crop_size`, sampled bilinearly with replicated
/// borders. The matrix used is returned alongside the image.
///
/// ```
/// use talkface_data::augment::perspective_transform;
/// use talkface_image::Image;
///
/// let frame = Image::<u8, 3>::from_size_val([32, 32].into(), 128).unwrap();
/// let (out, m) = perspective_transform(&frame, 16, 10, -10).unwrap();
///
/// assert_eq!(out.size(), [16, 16].into());
/// assert!(out.as_slice().iter().all(|&v| v == 128));
/// assert_eq!(m[8], 1.0);
/// ```
pub fn perspective_transform<const C: usize>(
    frame: &Frame<C>,
    crop_size: usize,
    pers_size: i32,
    enlarge_size: i32,
) -> Result<(Frame<C>, PerspectiveMatrix), DataError> {
    let frame_f32 = frame.cast::<f32>()?;
    let (warped, m) = perspective_transform_f32(&frame_f32, crop_size, pers_size, enlarge_size)?;
    Ok((from_f32_saturating(&warped)?, m))
}

fn perspective_transform_f32<const C: usize>(
    frame: &Image<f32, C>,
    crop_size: usize,
    pers_size: i32,
    enlarge_size: i32,
) -> Result<(Image<f32, C>, PerspectiveMatrix), DataError> {
    let (h, w) = (frame.height() as f32, frame.width() as f32);
    let (e, p) = (enlarge_size as f32, pers_size as f32);

    let src = [[-e, -e], [-e, w + e], [h + e, -e], [h + e, w + e]];
    let dst = [[-e, -e], [-e + p, w + e], [h + e, -e], [h + e - p, w + e]];
    let m = get_perspective_transform(&src, &dst);

    let mut warped = Image::<f32, C>::from_size_val([crop_size, crop_size].into(), 0.0)?;
    warp_perspective(
        frame,
        &mut warped,
        &m,
        InterpolationMode::Bilinear,
        BorderMode::Replicate,
    )?;

    Ok((warped, m))
}

impl ReshapeParams {
    /// Reshape and warp every frame, returning the per-frame matrices too.
    ///
    /// Resize, padding, crop and warp all run on `f32` pixels that are
    /// rounded back to `u8` once, after the warp. Rounding right after the
    /// resize instead can shift single pixels by one intensity level.
    ///
    /// # Errors
    ///
    /// [`DataError::FrameTooSmall`] if the squeezed axis is not longer than
    /// `2 * reshape_size`, and [`DataError::InvalidConfig`] for a zero `crop_size`.
    pub fn apply_with<const C: usize>(
        &self,
        seq: &FrameSequence<C>,
        crop_size: usize,
    ) -> Result<(FrameSequence<C>, Vec<PerspectiveMatrix>), DataError> {
        if crop_size == 0 {
            return Err(DataError::InvalidConfig("crop_size must be > 0".to_string()));
        }

        let mut frames = Vec::with_capacity(seq.len());
        let mut matrices = Vec::with_capacity(seq.len());

        for frame in seq {
            let (out, m) = self.reshape_frame(frame, crop_size)?;
            frames.push(out);
            matrices.push(m);
        }

        Ok((FrameSequence::new(frames)?, matrices))
    }

    /// Reshape and warp every frame.
    pub fn apply<const C: usize>(
        &self,
        seq: &FrameSequence<C>,
        crop_size: usize,
    ) -> Result<FrameSequence<C>, DataError> {
        Ok(self.apply_with(seq, crop_size)?.0)
    }

    fn reshape_frame<const C: usize>(
        &self,
        frame: &Frame<C>,
        crop_size: usize,
    ) -> Result<(Frame<C>, PerspectiveMatrix), DataError> {
        let size = frame.size();
        let (hgt, wdt) = (size.height, size.width);
        let r = self.reshape_size;
        let x = self.extra_padding_size;

        // resize targets swap the frame axes, as (width, height) = (H -/+ 2r, W +/- 2r)
        let (shrunk, resized_size) = if self.reshape {
            (hgt, [hgt.saturating_sub(2 * r), wdt + 2 * r])
        } else {
            (wdt, [hgt + 2 * r, wdt.saturating_sub(2 * r)])
        };

        if shrunk <= 2 * r {
            return Err(DataError::FrameTooSmall {
                size,
                reshape_size: r,
            });
        }

        let src = frame.cast::<f32>()?;

        let mut resized = Image::<f32, C>::from_size_val(resized_size.into(), 0.0)?;
        resize_native(&src, &mut resized, InterpolationMode::Bilinear)?;

        let padding = if self.reshape {
            Padding2D::horizontal(r + x)
        } else {
            Padding2D::vertical(r + x)
        };
        let mut padded = Image::<f32, C>::from_size_val(padding.padded_size(resized.size()), 0.0)?;
        spatial_padding(
            &resized,
            &mut padded,
            padding,
            PaddingMode::Reflect,
            [0.0; C],
        )?;

        // keep [r - x, H + r + x) along the non-padded axis
        let start = r - x;
        let wanted_end = hgt + r + x;
        let available = if self.reshape {
            padded.height()
        } else {
            padded.width()
        };
        let end = wanted_end.min(available);
        if end < wanted_end {
            warn!(
                "reshape crop [{start}, {wanted_end}) clamped to {end} on a {}x{} frame",
                wdt, hgt
            );
        }
        let extent = end.saturating_sub(start);

        let (crop_size_px, crop_x, crop_y) = if self.reshape {
            (
                ImageSize {
                    width: padded.width(),
                    height: extent,
                },
                0,
                start,
            )
        } else {
            (
                ImageSize {
                    width: extent,
                    height: padded.height(),
                },
                start,
                0,
            )
        };
        let mut cropped = Image::<f32, C>::from_size_val(crop_size_px, 0.0)?;
        crop_image(&padded, &mut cropped, crop_x, crop_y)?;

        let (warped, m) =
            perspective_transform_f32(&cropped, crop_size, self.pers_size, self.enlarge_size)?;

        Ok((from_f32_saturating(&warped)?, m))
    }
}

/// Random squeeze along one axis followed by a perspective warp.
#[derive(Clone, Debug, Default)]
pub struct ReshapeAugmenter {
    config: ReshapeConfig,
}

impl ReshapeAugmenter {
    /// Create the augmenter with custom sampling ranges.
    pub fn new(config: ReshapeConfig) -> Self {
        Self { config }
    }

    /// Draw the parameters of one call.
    ///
    /// The signs of `pers_size` and `enlarge_size` are independent fair coins.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidConfig`] if a range is empty or `reshape_size` starts below 2.
    pub fn sample_params<R: Rng>(&self, rng: &mut R) -> Result<ReshapeParams, DataError> {
        let cfg = &self.config;
        cfg.validate()?;

        let reshape = rng.random_bool(0.5);
        let reshape_size = rng.random_range(cfg.reshape_size.0..cfg.reshape_size.1);
        let extra_padding_size = rng.random_range(0..reshape_size / 2);
        let pers_size = rng.random_range(cfg.pers_size.0..cfg.pers_size.1) * random_sign(rng);
        let enlarge_size =
            rng.random_range(cfg.enlarge_size.0..cfg.enlarge_size.1) * random_sign(rng);

        Ok(ReshapeParams {
            reshape,
            reshape_size,
            extra_padding_size,
            pers_size,
            enlarge_size,
        })
    }

    /// Sample parameters once and reshape the whole sequence.
    pub fn apply<const C: usize, R: Rng>(
        &self,
        seq: &FrameSequence<C>,
        crop_size: usize,
        rng: &mut R,
    ) -> Result<FrameSequence<C>, DataError> {
        Ok(self.apply_with(seq, crop_size, rng)?.0)
    }

    /// Like [`ReshapeAugmenter::apply`], also returning the matrix used for each frame.
    pub fn apply_with<const C: usize, R: Rng>(
        &self,
        seq: &FrameSequence<C>,
        crop_size: usize,
        rng: &mut R,
    ) -> Result<(FrameSequence<C>, Vec<PerspectiveMatrix>), DataError> {
        let params = self.sample_params(rng)?;
        debug!("reshape: {params:?}");
        params.apply_with(seq, crop_size)
    }
}

fn random_sign<R: Rng>(rng: &mut R) -> i32 {
    if rng.random_bool(0.5) {
        -1
    } else {
        1
    }
}

/// Reshape with the default ranges.
pub fn reshape<const C: usize, R: Rng>(
    seq: &FrameSequence<C>,
    crop_size: usize,
    rng: &mut R,
) -> Result<FrameSequence<C>, DataError> {
    ReshapeAugmenter::default().apply(seq, crop_size, rng)
}

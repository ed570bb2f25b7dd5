use talkface_image::{Image, ImageSize};

use crate::error::DataError;

/// A single 8-bit frame with `C` channels.
pub type Frame<const C: usize> = Image<u8, C>;

/// An ordered, non-empty list of frames sharing the same size.
///
/// The channel count is fixed by the type, so only width and height are
/// checked when the sequence is built.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSequence<const C: usize> {
    frames: Vec<Frame<C>>,
}

impl<const C: usize> FrameSequence<C> {
    /// Build a sequence, checking that every frame matches the first one.
    ///
    /// # Errors
    ///
    /// [`DataError::EmptySequence`] for an empty list and
    /// [`DataError::FrameShapeMismatch`] naming the first frame whose size differs.
    ///
    /// ```
    /// use talkface_data::FrameSequence;
    /// use talkface_image::Image;
    ///
    /// let frame = Image::<u8, 3>::from_size_val([4, 4].into(), 0).unwrap();
    /// let seq = FrameSequence::new(vec![frame.clone(), frame]).unwrap();
    ///
    /// assert_eq!(seq.len(), 2);
    /// ```
    pub fn new(frames: Vec<Frame<C>>) -> Result<Self, DataError> {
        let expected = frames.first().ok_or(DataError::EmptySequence)?.size();

        if let Some((index, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.size() != expected)
        {
            return Err(DataError::FrameShapeMismatch {
                index,
                expected,
                actual: frame.size(),
            });
        }

        Ok(Self { frames })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false, kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Size shared by every frame.
    pub fn frame_size(&self) -> ImageSize {
        self.frames[0].size()
    }

    /// Borrow the frames.
    pub fn frames(&self) -> &[Frame<C>] {
        &self.frames
    }

    /// Iterate over the frames.
    pub fn iter(&self) -> std::slice::Iter<'_, Frame<C>> {
        self.frames.iter()
    }

    /// Take the frames out of the sequence.
    pub fn into_frames(self) -> Vec<Frame<C>> {
        self.frames
    }

    /// Apply a fallible per-frame function, producing a new sequence.
    pub(crate) fn try_map<F>(&self, f: F) -> Result<Self, DataError>
    where
        F: FnMut(&Frame<C>) -> Result<Frame<C>, DataError>,
    {
        let frames = self.frames.iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Self::new(frames)
    }
}

impl<'a, const C: usize> IntoIterator for &'a FrameSequence<C> {
    type Item = &'a Frame<C>;
    type IntoIter = std::slice::Iter<'a, Frame<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

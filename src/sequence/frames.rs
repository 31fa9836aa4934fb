use std::sync::Arc;

use crate::foundation::core::Size;
use crate::foundation::error::{HomewardError, HomewardResult};

/// One decoded raster frame. Immutable once created.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8 pixels.
    pub pixels: Arc<image::RgbaImage>,
}

impl Frame {
    /// Wrap a decoded image.
    pub fn from_rgba(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: Arc::new(img),
        }
    }

    /// Intrinsic size as floating point.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// State of one position in a [`FrameSequence`].
#[derive(Clone, Debug, Default)]
pub enum Slot {
    /// Not fetched yet.
    #[default]
    Pending,
    /// Fetched and decoded.
    Ready(Arc<Frame>),
    /// Fetch or decode failed; settled, but there is nothing to draw.
    Failed,
}

impl Slot {
    /// Whether this slot has settled (either way).
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Fixed-length, write-once collection of frame slots.
///
/// Slots settle asynchronously. Reading a slot that is pending, failed or out of range
/// yields `None`; that is "not available yet", never an error.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    slots: Vec<Slot>,
}

impl FrameSequence {
    /// Sequence of `len` pending slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![Slot::Pending; len],
        }
    }

    /// Total number of slots (N).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` for a zero-length sequence.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drawable frame at `index`, if it has loaded.
    pub fn get(&self, index: usize) -> Option<&Arc<Frame>> {
        match self.slots.get(index) {
            Some(Slot::Ready(frame)) => Some(frame),
            _ => None,
        }
    }

    /// Raw slot state at `index`.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Settle slot `index` with a loaded frame (`Some`) or a failure (`None`).
    ///
    /// A slot settles at most once; a second write is rejected.
    pub fn settle(&mut self, index: usize, frame: Option<Frame>) -> HomewardResult<()> {
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            HomewardError::validation(format!("frame index {index} out of range (len {len})"))
        })?;
        if slot.is_settled() {
            return Err(HomewardError::validation(format!(
                "frame slot {index} is already settled"
            )));
        }
        *slot = match frame {
            Some(f) => Slot::Ready(Arc::new(f)),
            None => Slot::Failed,
        };
        Ok(())
    }

    /// Number of settled slots (loaded + failed).
    pub fn settled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_settled()).count()
    }

    /// Number of loaded slots.
    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Ready(_)))
            .count()
    }

    /// Number of failed slots.
    pub fn failed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Failed))
            .count()
    }

    /// Length of the settled prefix.
    pub fn leading_settled(&self) -> usize {
        self.slots.iter().take_while(|s| s.is_settled()).count()
    }

    /// `true` once every slot has settled.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Slot::is_settled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/frames.rs"]
mod tests;

use anyhow::Context;

use crate::{foundation::error::HomewardResult, sequence::frames::Frame};

/// Decode an encoded raster (jpeg, png, webp, ...) into a [`Frame`].
pub fn decode_frame(bytes: &[u8]) -> HomewardResult<Frame> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    Ok(Frame::from_rgba(dyn_img.to_rgba8()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

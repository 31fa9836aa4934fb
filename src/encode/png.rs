use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::sink::{FrameSink, SinkConfig},
    foundation::error::{HomewardError, HomewardResult},
    render::surface::FrameRGBA,
};

/// Writes each frame as `frame-0001.png`, `frame-0002.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of the file holding frame `index`.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame-{:04}.png", index + 1))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> HomewardResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(HomewardError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &FrameRGBA) -> HomewardResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| HomewardError::encode("png sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(HomewardError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| HomewardError::validation("frame.data size mismatch with width*height*4"))?;
        let path = self.frame_path(index);
        img.save(&path)
            .map_err(|e| HomewardError::encode(format!("write '{}': {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> HomewardResult<()> {
        tracing::info!(dir = %self.dir.display(), frames = self.written, "png sequence written");
        self.cfg = None;
        Ok(())
    }
}

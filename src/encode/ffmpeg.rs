use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{HomewardError, HomewardResult};
use crate::render::surface::FrameRGBA;

/// Where and how [`FfmpegSink`] writes its MP4.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file instead of failing.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

/// Pipes opaque RGBA frames into the system `ffmpeg` (h264, yuv420p).
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    cfg: Option<SinkConfig>,
    encoder: Option<Encoder>,
    next_index: u64,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            cfg: None,
            encoder: None,
            next_index: 0,
        }
    }

    fn spawn(&self, cfg: SinkConfig) -> HomewardResult<Encoder> {
        let mut child = Command::new("ffmpeg")
            .arg(if self.opts.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &cfg.fps.to_string(), "-i", "pipe:0", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(&self.opts.out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| HomewardError::encode(format!("spawn ffmpeg (is it on PATH?): {e}")))?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(mut stderr)) = (stdin, stderr) else {
            return Err(HomewardError::encode("ffmpeg pipes unavailable"));
        };
        // A full stderr pipe stalls ffmpeg.
        let stderr = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });
        Ok(Encoder {
            child,
            stdin,
            stderr,
        })
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> HomewardResult<()> {
        if cfg.fps == 0 || cfg.width == 0 || cfg.height == 0 {
            return Err(HomewardError::validation(
                "ffmpeg sink needs non-zero fps, width and height",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(HomewardError::validation(format!(
                "yuv420p output needs even dimensions (got {}x{})",
                cfg.width, cfg.height
            )));
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(HomewardError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if let Some(parent) = self.opts.out_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }

        self.encoder = Some(self.spawn(cfg)?);
        self.cfg = Some(cfg);
        self.next_index = 0;
        Ok(())
    }

    fn push_frame(&mut self, index: u64, frame: &FrameRGBA) -> HomewardResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg, self.encoder.as_mut()) else {
            return Err(HomewardError::encode("ffmpeg sink not started"));
        };
        if index < self.next_index {
            return Err(HomewardError::encode(format!(
                "frame {index} pushed after frame {}",
                self.next_index - 1
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height)
            || frame.data.len() != (cfg.width * cfg.height * 4) as usize
        {
            return Err(HomewardError::validation(format!(
                "frame is {}x{} ({} bytes), sink expects {}x{}",
                frame.width,
                frame.height,
                frame.data.len(),
                cfg.width,
                cfg.height
            )));
        }
        encoder
            .stdin
            .write_all(&frame.data)
            .map_err(|e| HomewardError::encode(format!("write frame {index} to ffmpeg: {e}")))?;
        self.next_index = index + 1;
        Ok(())
    }

    fn end(&mut self) -> HomewardResult<()> {
        let Encoder {
            mut child,
            stdin,
            stderr,
        } = self
            .encoder
            .take()
            .ok_or_else(|| HomewardError::encode("ffmpeg sink not started"))?;
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| HomewardError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| HomewardError::encode("ffmpeg stderr reader panicked"))?
            .unwrap_or_default();
        self.cfg = None;
        if !status.success() {
            return Err(HomewardError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        tracing::info!(out = %self.opts.out_path.display(), frames = self.next_index, "mp4 written");
        Ok(())
    }
}

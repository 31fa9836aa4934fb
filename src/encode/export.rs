use std::{sync::Arc, time::Duration};

use crate::{
    assets::source::FrameSource,
    config::journey::{DriveKind, JourneyConfig},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::Rgba8,
    foundation::error::{HomewardError, HomewardResult},
    foundation::math::mix_rgba8,
    load::loader::LoadSummary,
    render::surface::{FrameRGBA, LayoutBox, Surface},
    render::viewport::Viewport,
    session::device::Density,
    session::journey::JourneySession,
    session::scroll_lock::ScrollLock,
};

/// Loading screen color.
const PRELOADER_RGBA: Rgba8 = Rgba8::opaque(255, 255, 255);

/// Offline playback settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOpts {
    pub fps: u32,
    /// Layout width in CSS pixels.
    pub width: f64,
    /// Layout height in CSS pixels.
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl ExportOpts {
    pub fn validate(&self) -> HomewardResult<()> {
        if self.fps == 0 {
            return Err(HomewardError::validation("export fps must be non-zero"));
        }
        self.layout().pixel_size().map(|_| ())
    }

    pub fn layout(&self) -> LayoutBox {
        LayoutBox::new(self.width, self.height, self.device_pixel_ratio)
    }
}

/// What an export produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    pub width: u32,
    pub height: u32,
    /// Virtual time covered.
    pub duration: Duration,
    /// Loader counters, if loading finished.
    pub load: Option<LoadSummary>,
    /// Whether playback reached its completion signal.
    pub completed: bool,
}

/// Play the auto-play journey on a virtual clock and stream every output frame to `sink`.
///
/// All frames are loaded before the clock starts. Each output frame is the canvas layer
/// composited over the background at the canvas opacity, under the fading preloader.
/// Export stops on the frame where playback completion fires.
#[tracing::instrument(skip(config, source, sink), fields(fps = opts.fps))]
pub fn export_journey(
    config: &JourneyConfig,
    density: Density,
    source: Arc<dyn FrameSource>,
    opts: ExportOpts,
    sink: &mut dyn FrameSink,
) -> HomewardResult<ExportStats> {
    opts.validate()?;
    let mut config = config.clone();
    config.drive.mode = DriveKind::AutoPlay;
    let background = config.renderer.background_rgba;

    // Playback starts no later than the failsafe, so this bounds the run.
    let limit = config.drive.start_failsafe()
        + Duration::from_millis(config.drive.duration_ms)
        + config.drive.completion_delay()
        + Duration::from_secs(1);

    let mut viewport = Viewport::new(opts.layout());
    let mut session =
        JourneySession::new(config, density, source, &mut viewport, ScrollLock::new())?;
    let load = session.block_until_loaded();

    let (width, height) = {
        let surface = session.renderer().surface();
        (surface.width(), surface.height())
    };
    sink.begin(SinkConfig {
        width,
        height,
        fps: opts.fps,
    })?;

    let mut index = 0u64;
    let mut now = Duration::ZERO;
    let mut completed = false;
    while now <= limit {
        now = Duration::from_secs_f64(index as f64 / f64::from(opts.fps));
        let frame = session.step(now);
        let out = composite_layers(
            session.renderer().surface(),
            background,
            frame.drive.canvas_opacity,
            frame.gate_opacity,
        );
        sink.push_frame(index, &out)?;
        index += 1;
        if frame.playback_completed {
            completed = true;
            break;
        }
    }
    sink.end()?;
    session.teardown();

    if !completed {
        tracing::warn!(frames = index, "export stopped before playback completed");
    }
    Ok(ExportStats {
        frames: index,
        width,
        height,
        duration: now,
        load,
        completed,
    })
}

/// Flatten the page layers for one output frame.
pub fn composite_layers(
    surface: &Surface,
    background: Rgba8,
    canvas_opacity: f64,
    preloader_opacity: f64,
) -> FrameRGBA {
    let bg = background.to_array();
    let cover = PRELOADER_RGBA.to_array();
    let mut data = Vec::with_capacity(surface.as_image().as_raw().len());
    for px in surface.as_image().pixels() {
        let canvas = mix_rgba8(bg, px.0, canvas_opacity);
        let [r, g, b, _] = mix_rgba8(canvas, cover, preloader_opacity);
        data.extend_from_slice(&[r, g, b, 255]);
    }
    FrameRGBA {
        width: surface.width(),
        height: surface.height(),
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;

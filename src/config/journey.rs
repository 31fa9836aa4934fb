use std::{fs::File, io::BufReader, path::Path, time::Duration};

use crate::{
    drive::{driver::DriveMode, timeline::PhaseTimeline},
    foundation::core::Rgba8,
    foundation::error::{HomewardError, HomewardResult},
    gate::preload::GateTimings,
    load::loader::LoadPlan,
    render::geometry::{FitMode, SourceCrop},
    render::renderer::RendererConfig,
    sequence::naming::FrameNaming,
    session::device::Density,
};

/// Everything a journey session needs, as read from JSON.
///
/// Every field has a default, so `{}` is a complete configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JourneyConfig {
    pub desktop: AssetSetConfig,
    pub mobile: AssetSetConfig,
    pub timeline: PhaseTimeline,
    pub renderer: RendererSettings,
    pub gate: GateTimings,
    pub drive: DriveConfig,
    /// Viewports narrower than this use the mobile asset set.
    pub mobile_breakpoint_px: u32,
    /// Fetch worker count; `None` lets rayon decide.
    pub loader_threads: Option<usize>,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            desktop: AssetSetConfig::desktop(),
            mobile: AssetSetConfig::mobile(),
            timeline: PhaseTimeline::default(),
            renderer: RendererSettings::default(),
            gate: GateTimings::default(),
            drive: DriveConfig::default(),
            mobile_breakpoint_px: 768,
            loader_threads: None,
        }
    }
}

impl JourneyConfig {
    /// Parse from a JSON reader. Does not validate.
    pub fn from_reader<R: std::io::Read>(r: R) -> HomewardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| HomewardError::serde(format!("parse journey config JSON: {e}")))
    }

    /// Parse from a JSON string. Does not validate.
    pub fn from_json_str(s: &str) -> HomewardResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| HomewardError::serde(format!("parse journey config JSON: {e}")))
    }

    /// Parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> HomewardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HomewardError::validation(format!("open journey config '{}': {e}", path.display()))
        })?;
        let cfg = Self::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> HomewardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HomewardError::serde(format!("serialize journey config: {e}")))
    }

    pub fn validate(&self) -> HomewardResult<()> {
        self.desktop
            .validate()
            .map_err(|e| HomewardError::validation(format!("desktop: {e}")))?;
        self.mobile
            .validate()
            .map_err(|e| HomewardError::validation(format!("mobile: {e}")))?;
        self.timeline.validate()?;
        self.gate.validate()?;
        self.drive.validate()?;
        self.renderer_config(Density::Desktop).validate()?;
        if self.loader_threads == Some(0) {
            return Err(HomewardError::validation(
                "loader_threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Asset set for `density`.
    pub fn assets(&self, density: Density) -> &AssetSetConfig {
        match density {
            Density::Desktop => &self.desktop,
            Density::Mobile => &self.mobile,
        }
    }

    /// Renderer settings for `density` (fit and crop come from the asset set).
    pub fn renderer_config(&self, density: Density) -> RendererConfig {
        let set = self.assets(density);
        RendererConfig {
            fit: set.fit,
            crop: SourceCrop {
                fraction: set.crop_fraction,
            },
            smoothing: self.renderer.smoothing,
            epsilon: self.renderer.epsilon,
            background: self.renderer.background_rgba,
        }
    }
}

/// One density's frame sequence and how to fetch and fit it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetSetConfig {
    pub base_path: String,
    pub prefix: String,
    pub extension: String,
    pub total_frames: usize,
    pub priority_frames: usize,
    pub batch_size: usize,
    pub fit: FitMode,
    /// Fraction trimmed from the top and the bottom of each frame.
    pub crop_fraction: f64,
}

impl Default for AssetSetConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

impl AssetSetConfig {
    pub fn desktop() -> Self {
        Self {
            base_path: "assets/sequence/desktop".to_string(),
            prefix: "frame-".to_string(),
            extension: "jpg".to_string(),
            total_frames: 240,
            priority_frames: 50,
            batch_size: 10,
            fit: FitMode::Contain,
            crop_fraction: 0.04,
        }
    }

    pub fn mobile() -> Self {
        Self {
            base_path: "assets/sequence/mobile".to_string(),
            prefix: "frame-".to_string(),
            extension: "webp".to_string(),
            total_frames: 120,
            priority_frames: 10,
            batch_size: 20,
            fit: FitMode::Cover,
            crop_fraction: 0.0,
        }
    }

    pub fn validate(&self) -> HomewardResult<()> {
        if self.extension.is_empty() {
            return Err(HomewardError::validation("extension must not be empty"));
        }
        SourceCrop {
            fraction: self.crop_fraction,
        }
        .validate()?;
        self.load_plan().validate()
    }

    /// Fetch plan for this set.
    pub fn load_plan(&self) -> LoadPlan {
        LoadPlan {
            base_path: self.base_path.clone(),
            naming: FrameNaming::new(self.prefix.clone(), self.extension.clone()),
            total: self.total_frames,
            priority: self.priority_frames,
            batch_size: self.batch_size,
        }
    }
}

/// Renderer knobs shared by both densities.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererSettings {
    pub smoothing: f64,
    pub epsilon: f64,
    pub background_rgba: Rgba8,
}

impl Default for RendererSettings {
    fn default() -> Self {
        let base = RendererConfig::default();
        Self {
            smoothing: base.smoothing,
            epsilon: base.epsilon,
            background_rgba: base.background,
        }
    }
}

/// Progress source selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveKind {
    #[default]
    AutoPlay,
    Scrub,
}

/// Playback timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    pub mode: DriveKind,
    /// Auto-play length.
    pub duration_ms: u64,
    /// Pause after the end before completion fires.
    pub completion_delay_ms: u64,
    /// Auto-play starts at this point even if the preloader never completes.
    pub start_failsafe_ms: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            mode: DriveKind::AutoPlay,
            duration_ms: 7_000,
            completion_delay_ms: 1_500,
            start_failsafe_ms: 3_000,
        }
    }
}

impl DriveConfig {
    pub fn validate(&self) -> HomewardResult<()> {
        if self.mode == DriveKind::AutoPlay && self.duration_ms == 0 {
            return Err(HomewardError::validation("drive duration_ms must be > 0"));
        }
        Ok(())
    }

    pub fn drive_mode(&self) -> DriveMode {
        match self.mode {
            DriveKind::AutoPlay => DriveMode::AutoPlay {
                duration: Duration::from_millis(self.duration_ms),
            },
            DriveKind::Scrub => DriveMode::Scrub,
        }
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn start_failsafe(&self) -> Duration {
        Duration::from_millis(self.start_failsafe_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/journey.rs"]
mod tests;

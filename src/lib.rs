//! Homeward plays an image-sequence "journey" the way a landing page hero does.
//!
//! The engine is headless and caller-clocked:
//!
//! - A [`FrameLoader`] fetches a numbered frame sequence in a priority burst followed by
//!   bounded background batches, publishing partial [`FrameSequence`] snapshots.
//! - A [`PreloadGate`] decides when the loading screen may go away.
//! - A [`ProgressDriver`] turns elapsed time or a scroll fraction into a target frame and
//!   overlay opacities along a [`PhaseTimeline`].
//! - A [`SequenceRenderer`] eases toward the target frame and paints it onto a [`Surface`].
//!
//! [`JourneySession`] wires all four together; [`export_journey`] plays a session on a
//! virtual clock into a [`FrameSink`].
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod config;
pub(crate) mod drive;
pub(crate) mod encode;
pub(crate) mod gate;
pub(crate) mod load;
pub(crate) mod render;
pub(crate) mod sequence;
pub(crate) mod session;

pub use crate::foundation::core::{Point, Rect, Rgba8, Size};
pub use crate::foundation::error::{HomewardError, HomewardResult};
pub use crate::foundation::latch::OnceLatch;

pub use crate::animation::ease::Ease;
pub use crate::assets::decode::decode_frame;
pub use crate::assets::source::{FrameSource, FsFrameSource, MemoryFrameSource};
pub use crate::config::journey::{
    AssetSetConfig, DriveConfig, DriveKind, JourneyConfig, RendererSettings,
};
pub use crate::drive::driver::{DriveMode, DriveState, ProgressDriver};
pub use crate::drive::timeline::{AnimationPhase, PhaseTimeline, map_progress_to_frame};
pub use crate::encode::export::{ExportOpts, ExportStats, composite_layers, export_journey};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::gate::preload::{GateState, GateTimings, GateUpdate, PreloadGate};
pub use crate::load::loader::{
    CancelToken, FrameLoader, LoadEvent, LoadHandle, LoadPlan, LoadSummary,
};
pub use crate::load::progress::LoadProgress;
pub use crate::render::geometry::{FitMode, Placement, SourceCrop, compute_placement};
pub use crate::render::renderer::{RenderState, RendererConfig, SequenceRenderer};
pub use crate::render::surface::{FrameRGBA, LayoutBox, MAX_SURFACE_DIM, Surface};
pub use crate::render::viewport::{ResizeObserver, Viewport};
pub use crate::sequence::frames::{Frame, FrameSequence, Slot};
pub use crate::sequence::naming::{FrameNaming, normalize_rel_path};
pub use crate::session::device::{
    Density, DeviceSignals, ExperienceMode, StaticReason, is_mobile, select_experience,
};
pub use crate::session::journey::{JourneySession, SessionFrame};
pub use crate::session::scroll_lock::{ScrollLock, ScrollLockGuard};

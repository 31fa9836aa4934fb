use std::{sync::Arc, time::Duration};

use crate::{
    assets::source::FrameSource,
    config::journey::JourneyConfig,
    drive::driver::{DriveMode, DriveState, ProgressDriver},
    foundation::error::HomewardResult,
    gate::preload::{GateState, GateUpdate, PreloadGate},
    load::loader::{FrameLoader, LoadEvent, LoadHandle, LoadSummary},
    load::progress::LoadProgress,
    render::renderer::SequenceRenderer,
    render::viewport::Viewport,
    session::device::Density,
    session::scroll_lock::{ScrollLock, ScrollLockGuard},
};

/// Everything observable after one [`JourneySession::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionFrame {
    /// Time the step was taken at.
    pub now: Duration,
    /// Load counters as of this step.
    pub load: LoadProgress,
    /// Preloader state and its one-shot completion.
    pub gate: GateUpdate,
    /// Loading screen opacity (1 while shown, 0 once hidden).
    pub gate_opacity: f64,
    /// Driver output for this step.
    pub drive: DriveState,
    /// Whether the renderer loop is still converging.
    pub animating: bool,
    /// `true` only on the step where auto-play completion fired.
    pub playback_completed: bool,
}

/// One mounted journey: loader, preloader, driver and renderer wired together.
///
/// Control flows loader -> gate -> driver -> renderer. The caller advances the session by
/// calling [`JourneySession::step`] once per display refresh with the time since mount.
pub struct JourneySession {
    config: JourneyConfig,
    density: Density,
    loader: Option<LoadHandle>,
    gate: PreloadGate,
    driver: ProgressDriver,
    renderer: SequenceRenderer,
    scroll: ScrollLock,
    gate_lock: Option<ScrollLockGuard>,
    playback_lock: Option<ScrollLockGuard>,
    load: LoadProgress,
    ready: bool,
    summary: Option<LoadSummary>,
    last_now: Duration,
    torn_down: bool,
}

impl JourneySession {
    /// Mount a session: acquire the surface, start loading and show the preloader.
    ///
    /// Fails if the configuration is invalid or no drawing surface can be acquired.
    pub fn new(
        config: JourneyConfig,
        density: Density,
        source: Arc<dyn FrameSource>,
        viewport: &mut Viewport,
        scroll: ScrollLock,
    ) -> HomewardResult<Self> {
        config.validate()?;
        let assets = config.assets(density);
        let total = assets.total_frames;

        let renderer = SequenceRenderer::new(config.renderer_config(density), viewport)?;
        let driver = ProgressDriver::new(
            config.drive.drive_mode(),
            config.timeline,
            total,
            config.drive.completion_delay(),
        )?;
        let gate = PreloadGate::new(config.gate)?;
        let loader = FrameLoader::new(assets.load_plan(), config.loader_threads)?.spawn(source)?;
        let gate_lock = scroll.acquire("preloader");

        tracing::info!(?density, total, "journey session mounted");
        Ok(Self {
            config,
            density,
            loader: Some(loader),
            gate,
            driver,
            renderer,
            scroll,
            gate_lock: Some(gate_lock),
            playback_lock: None,
            load: LoadProgress::new(total),
            ready: false,
            summary: None,
            last_now: Duration::ZERO,
            torn_down: false,
        })
    }

    /// Advance every component to `now`.
    pub fn step(&mut self, now: Duration) -> SessionFrame {
        self.last_now = now;
        self.drain_loader();

        let mut gate = self.gate.tick(now);
        if self.gate.exit_animation_done(now) && self.gate.notify_exit_complete(now) {
            gate = GateUpdate {
                state: self.gate.state(),
                completed: true,
            };
        }
        if gate.state == GateState::Hidden {
            self.gate_lock = None;
        }

        if matches!(self.driver.mode(), DriveMode::AutoPlay { .. })
            && !self.driver.is_started()
            && !self.torn_down
        {
            let failsafe = now >= self.config.drive.start_failsafe();
            if self.gate.is_completed() || failsafe {
                if !self.gate.is_completed() {
                    tracing::warn!("preloader still up, starting playback on failsafe");
                }
                self.driver.start(now);
                self.playback_lock = Some(self.scroll.acquire("playback"));
            }
        }

        let drive = self.driver.sample(now);
        if let Some(target) = drive.target_frame {
            self.renderer.set_target(target);
        }

        let playback_completed = self.driver.poll_completion(now);
        if playback_completed {
            self.playback_lock = None;
        }

        let animating = self.renderer.tick();
        SessionFrame {
            now,
            load: self.load,
            gate,
            gate_opacity: self.gate.overlay_opacity(now),
            drive,
            animating,
            playback_completed,
        }
    }

    /// Feed a scroll fraction to a scrub-mode session.
    pub fn scrub_to(&mut self, fraction: f64) -> HomewardResult<DriveState> {
        let drive = self.driver.scrub_to(fraction)?;
        if let Some(target) = drive.target_frame {
            self.renderer.set_target(target);
        }
        Ok(drive)
    }

    /// Block until the priority frames have settled (or loading ended early).
    pub fn block_until_ready(&mut self) {
        while !self.ready && self.wait_for_event() {}
    }

    /// Block until every frame has settled, returning the summary if the load finished.
    pub fn block_until_loaded(&mut self) -> Option<LoadSummary> {
        while self.summary.is_none() && self.wait_for_event() {}
        self.summary
    }

    /// Stop loading, stop the renderer and release scroll locks. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(loader) = self.loader.take() {
            loader.cancel();
        }
        self.renderer.teardown();
        self.gate_lock = None;
        self.playback_lock = None;
        tracing::debug!("journey session torn down");
    }

    pub fn renderer(&self) -> &SequenceRenderer {
        &self.renderer
    }

    pub fn gate(&self) -> &PreloadGate {
        &self.gate
    }

    pub fn driver(&self) -> &ProgressDriver {
        &self.driver
    }

    pub fn density(&self) -> Density {
        self.density
    }

    pub fn config(&self) -> &JourneyConfig {
        &self.config
    }

    /// Latest load counters.
    pub fn load_progress(&self) -> LoadProgress {
        self.load
    }

    /// Whether the priority frames have settled.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Final load counters, once the loader has finished.
    pub fn load_summary(&self) -> Option<LoadSummary> {
        self.summary
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn drain_loader(&mut self) {
        while let Some(event) = self.loader.as_ref().and_then(LoadHandle::try_next) {
            self.apply(event);
        }
    }

    // Returns false once no more events can arrive.
    fn wait_for_event(&mut self) -> bool {
        match self.loader.as_ref().and_then(LoadHandle::next_blocking) {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Progress(p) => {
                self.load = p;
                self.gate.update_progress(p.percent());
            }
            LoadEvent::Ready(frames) => {
                self.ready = true;
                self.gate.mark_ready(self.last_now);
                self.renderer.set_frames(frames);
            }
            LoadEvent::Batch { frames, .. } => self.renderer.set_frames(frames),
            LoadEvent::Complete(summary) => {
                self.summary = Some(summary);
                if let Some(loader) = self.loader.take()
                    && let Err(e) = loader.join()
                {
                    tracing::warn!(error = %e, "frame loader ended with an error");
                }
            }
        }
    }
}

impl Drop for JourneySession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/journey.rs"]
mod tests;

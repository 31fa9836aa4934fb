use std::time::Duration;

use crate::{
    drive::timeline::{AnimationPhase, PhaseTimeline, map_progress_to_frame},
    foundation::error::{HomewardError, HomewardResult},
    foundation::latch::OnceLatch,
};

/// Where progress comes from. Chosen once per driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveMode {
    /// Elapsed time since [`ProgressDriver::start`] over a fixed duration.
    AutoPlay {
        /// Total playback time.
        duration: Duration,
    },
    /// Externally supplied scroll fraction.
    Scrub,
}

/// Output of one driver sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriveState {
    /// Normalized progress in `[0, 1]`.
    pub progress: f64,
    /// Phase owning `progress`.
    pub phase: AnimationPhase,
    /// New renderer target, present only when it changed since the previous sample.
    pub target_frame: Option<usize>,
    /// Intro text layer.
    pub intro_opacity: f64,
    /// Canvas layer.
    pub canvas_opacity: f64,
    /// Finale text layer.
    pub finale_opacity: f64,
}

/// Maps a time or scroll signal onto the phase timeline.
#[derive(Clone, Debug)]
pub struct ProgressDriver {
    mode: DriveMode,
    timeline: PhaseTimeline,
    frame_count: usize,
    completion_delay: Duration,
    started_at: Option<Duration>,
    progress: f64,
    finished_at: Option<Duration>,
    last_target: Option<usize>,
    completion: OnceLatch,
}

impl ProgressDriver {
    /// Build a driver for a sequence of `frame_count` frames.
    pub fn new(
        mode: DriveMode,
        timeline: PhaseTimeline,
        frame_count: usize,
        completion_delay: Duration,
    ) -> HomewardResult<Self> {
        timeline.validate()?;
        if let DriveMode::AutoPlay { duration } = mode
            && duration.is_zero()
        {
            return Err(HomewardError::validation(
                "auto-play duration must be > 0",
            ));
        }
        Ok(Self {
            mode,
            timeline,
            frame_count,
            completion_delay,
            started_at: None,
            progress: 0.0,
            finished_at: None,
            last_target: None,
            completion: OnceLatch::new(),
        })
    }

    /// Begin auto-play at `now`. Later calls are ignored.
    pub fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            tracing::debug!(at_ms = now.as_millis() as u64, "progress driver started");
            self.started_at = Some(now);
        }
    }

    /// Whether [`ProgressDriver::start`] has been called.
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Sample the auto-play clock.
    ///
    /// Before `start` the progress stays at 0. Progress never decreases, even if `now` does.
    pub fn sample(&mut self, now: Duration) -> DriveState {
        if let (DriveMode::AutoPlay { duration }, Some(start)) = (self.mode, self.started_at) {
            let elapsed = now.saturating_sub(start);
            let p = (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0);
            if p > self.progress {
                self.progress = p;
            }
            if self.progress >= 1.0 && self.finished_at.is_none() {
                self.finished_at = Some(now);
            }
        }
        self.state()
    }

    /// Feed a scroll fraction. Values outside `[0, 1]` are clamped; going backward is allowed.
    pub fn scrub_to(&mut self, fraction: f64) -> HomewardResult<DriveState> {
        if self.mode != DriveMode::Scrub {
            return Err(HomewardError::validation(
                "scrub_to requires a scrub-mode driver",
            ));
        }
        self.progress = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Ok(self.state())
    }

    /// `true` exactly once: the first poll at least `completion_delay` after auto-play
    /// reached the end.
    pub fn poll_completion(&mut self, now: Duration) -> bool {
        let Some(done) = self.finished_at else {
            return false;
        };
        if now.saturating_sub(done) < self.completion_delay {
            return false;
        }
        let fired = self.completion.fire();
        if fired {
            tracing::info!("journey playback complete");
        }
        fired
    }

    /// Whether the completion signal has fired.
    pub fn is_completed(&self) -> bool {
        self.completion.is_fired()
    }

    /// Current progress.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    pub fn timeline(&self) -> &PhaseTimeline {
        &self.timeline
    }

    /// Change the sequence length (e.g. once the loader reports it).
    pub fn set_frame_count(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        self.last_target = None;
    }

    fn state(&mut self) -> DriveState {
        let p = self.progress;
        let phase = self.timeline.phase_at(p);
        let target = match phase {
            AnimationPhase::Scrub => Some(map_progress_to_frame(
                self.timeline.scrub_fraction(p),
                self.frame_count,
            )),
            AnimationPhase::Finale => Some(self.frame_count.saturating_sub(1)),
            AnimationPhase::Intro | AnimationPhase::TransitionIn => None,
        };
        let target_frame = match target {
            Some(t) if self.last_target != Some(t) => {
                self.last_target = Some(t);
                Some(t)
            }
            _ => None,
        };
        DriveState {
            progress: p,
            phase,
            target_frame,
            intro_opacity: self.timeline.intro_opacity(p),
            canvas_opacity: self.timeline.canvas_opacity(p),
            finale_opacity: self.timeline.finale_opacity(p),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drive/driver.rs"]
mod tests;

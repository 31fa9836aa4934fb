use std::time::Duration;

use crate::foundation::{
    error::{HomewardError, HomewardResult},
    latch::OnceLatch,
};

/// Preloader timing constants, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GateTimings {
    /// Floor on how long the preloader stays up.
    pub min_display_ms: u64,
    /// Ceiling after which readiness is forced.
    pub max_wait_ms: u64,
    /// Pause between "ready and floor elapsed" and the start of the exit.
    pub hide_delay_ms: u64,
    /// Length of the exit fade.
    pub exit_animation_ms: u64,
    /// Completion fires this long after the exit starts if the fade never reports back.
    pub exit_backup_ms: u64,
}

impl Default for GateTimings {
    fn default() -> Self {
        Self {
            min_display_ms: 800,
            max_wait_ms: 10_000,
            hide_delay_ms: 200,
            exit_animation_ms: 600,
            exit_backup_ms: 1_000,
        }
    }
}

impl GateTimings {
    pub fn validate(&self) -> HomewardResult<()> {
        if self.max_wait_ms == 0 {
            return Err(HomewardError::validation("gate max_wait_ms must be > 0"));
        }
        if self.exit_backup_ms < self.exit_animation_ms {
            return Err(HomewardError::validation(format!(
                "gate exit_backup_ms ({}) must be >= exit_animation_ms ({})",
                self.exit_backup_ms, self.exit_animation_ms
            )));
        }
        Ok(())
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }
}

/// Lifecycle of the loading screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Waiting for readiness.
    Loading,
    /// Ready (or forced), waiting out the display floor and hide delay.
    ReadyPending,
    /// Exit fade running.
    Exiting,
    /// Gone. Terminal.
    Hidden,
}

/// Result of one [`PreloadGate::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateUpdate {
    /// State after the tick.
    pub state: GateState,
    /// `true` only on the tick where the one-shot completion fired.
    pub completed: bool,
}

/// Decides when the loading screen may go away.
///
/// Time is supplied by the caller as the offset since the gate was shown.
#[derive(Clone, Debug)]
pub struct PreloadGate {
    timings: GateTimings,
    state: GateState,
    progress: u8,
    ready_at: Option<Duration>,
    forced: bool,
    exit_started_at: Option<Duration>,
    completion: OnceLatch,
}

impl PreloadGate {
    pub fn new(timings: GateTimings) -> HomewardResult<Self> {
        timings.validate()?;
        Ok(Self {
            timings,
            state: GateState::Loading,
            progress: 0,
            ready_at: None,
            forced: false,
            exit_started_at: None,
            completion: OnceLatch::new(),
        })
    }

    /// Record that the priority frames have settled. Only the first call counts.
    pub fn mark_ready(&mut self, now: Duration) {
        if self.ready_at.is_none() {
            self.ready_at = Some(now);
        }
    }

    /// Latest load percentage for display.
    pub fn update_progress(&mut self, percent: u8) {
        self.progress = self.progress.max(percent.min(100));
    }

    /// Advance the state machine to `now`.
    pub fn tick(&mut self, now: Duration) -> GateUpdate {
        let mut completed = false;

        if self.state == GateState::Loading {
            if self.ready_at.is_none() && now >= GateTimings::ms(self.timings.max_wait_ms) {
                tracing::warn!(
                    max_wait_ms = self.timings.max_wait_ms,
                    progress = self.progress,
                    "preloader timed out, forcing ready state"
                );
                self.forced = true;
                self.ready_at = Some(GateTimings::ms(self.timings.max_wait_ms));
            }
            if self.ready_at.is_some() {
                self.state = GateState::ReadyPending;
            }
        }

        if self.state == GateState::ReadyPending
            && let Some(ready_at) = self.ready_at
        {
            let due = ready_at.max(GateTimings::ms(self.timings.min_display_ms))
                + GateTimings::ms(self.timings.hide_delay_ms);
            if now >= due {
                tracing::debug!(at_ms = due.as_millis() as u64, "preloader exit started");
                self.state = GateState::Exiting;
                self.exit_started_at = Some(due);
            }
        }

        if self.state == GateState::Exiting
            && let Some(started) = self.exit_started_at
            && now >= started + GateTimings::ms(self.timings.exit_backup_ms)
        {
            completed = self.finish();
        }

        GateUpdate {
            state: self.state,
            completed,
        }
    }

    /// Report that the exit fade finished. Returns `true` if this fired the completion.
    pub fn notify_exit_complete(&mut self, now: Duration) -> bool {
        if self.tick(now).completed {
            return true;
        }
        if self.state != GateState::Exiting {
            return false;
        }
        self.finish()
    }

    /// Opacity of the loading screen: 1 until the exit starts, then fading to 0.
    pub fn overlay_opacity(&self, now: Duration) -> f64 {
        match (self.state, self.exit_started_at) {
            (GateState::Hidden, _) => 0.0,
            (GateState::Exiting, Some(started)) => {
                let span = GateTimings::ms(self.timings.exit_animation_ms);
                if span.is_zero() {
                    return 0.0;
                }
                let t = now.saturating_sub(started).as_secs_f64() / span.as_secs_f64();
                (1.0 - t).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Whether the exit fade has run its full length at `now`.
    pub fn exit_animation_done(&self, now: Duration) -> bool {
        self.state == GateState::Exiting && self.overlay_opacity(now) == 0.0
    }

    /// Whether readiness was forced by the max-wait ceiling.
    pub fn forced(&self) -> bool {
        self.forced
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_fired()
    }

    /// Text shown under the progress ring.
    pub fn status_label(&self) -> &'static str {
        if self.ready_at.is_some() {
            "Ready"
        } else {
            "Loading experience"
        }
    }

    fn finish(&mut self) -> bool {
        self.state = GateState::Hidden;
        let fired = self.completion.fire();
        if fired {
            tracing::info!(forced = self.forced, "preloader hidden");
        }
        fired
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/preload.rs"]
mod tests;

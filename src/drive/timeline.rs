use crate::{
    animation::ease::Ease,
    foundation::error::{HomewardError, HomewardResult},
    foundation::math::unlerp_clamped,
};

/// Narrative phase for a normalized progress value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPhase {
    /// Intro text fully visible, canvas hidden.
    Intro,
    /// Intro text fades out while the canvas fades in.
    TransitionIn,
    /// Progress drives the frame index.
    Scrub,
    /// Canvas fades out, finale text fades in.
    Finale,
}

/// Phase boundaries over `[0, 1]`.
///
/// Phases are half-open on the right: Intro is `[0, intro_end)`, TransitionIn is
/// `[intro_end, transition_end)`, Scrub is `[transition_end, scrub_end)` and Finale is
/// `[scrub_end, 1]`. Finale starts exactly where Scrub ends.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhaseTimeline {
    pub intro_end: f64,
    pub transition_end: f64,
    pub scrub_end: f64,
    /// Curve used by every overlay fade.
    pub ease: Ease,
}

impl Default for PhaseTimeline {
    fn default() -> Self {
        Self {
            intro_end: 0.12,
            transition_end: 0.20,
            scrub_end: 0.80,
            ease: Ease::InOutCubic,
        }
    }
}

impl PhaseTimeline {
    /// Check `0 <= intro_end <= transition_end < scrub_end <= 1`.
    pub fn validate(&self) -> HomewardResult<()> {
        let Self {
            intro_end: a,
            transition_end: b,
            scrub_end: c,
            ..
        } = *self;
        if ![a, b, c].iter().all(|v| v.is_finite()) {
            return Err(HomewardError::validation(
                "timeline boundaries must be finite",
            ));
        }
        if !(0.0 <= a && a <= b && b < c && c <= 1.0) {
            return Err(HomewardError::validation(format!(
                "timeline must satisfy 0 <= intro_end <= transition_end < scrub_end <= 1 \
                 (got {a}, {b}, {c})"
            )));
        }
        Ok(())
    }

    /// Phase owning `p` (clamped to `[0, 1]`).
    pub fn phase_at(&self, p: f64) -> AnimationPhase {
        let p = clamp_unit(p);
        if p < self.intro_end {
            AnimationPhase::Intro
        } else if p < self.transition_end {
            AnimationPhase::TransitionIn
        } else if p < self.scrub_end {
            AnimationPhase::Scrub
        } else {
            AnimationPhase::Finale
        }
    }

    /// `p` re-normalized within the Scrub window, clamped to `[0, 1]`.
    pub fn scrub_fraction(&self, p: f64) -> f64 {
        unlerp_clamped(self.transition_end, self.scrub_end, clamp_unit(p))
    }

    /// Intro layer: 1 through Intro, eased to 0 across TransitionIn.
    pub fn intro_opacity(&self, p: f64) -> f64 {
        self.ease
            .fade_out(self.intro_end, self.transition_end, clamp_unit(p))
    }

    /// Canvas layer: eased in across TransitionIn, held through Scrub, eased out across Finale.
    pub fn canvas_opacity(&self, p: f64) -> f64 {
        let p = clamp_unit(p);
        match self.phase_at(p) {
            AnimationPhase::Intro => 0.0,
            AnimationPhase::TransitionIn => {
                self.ease.fade_in(self.intro_end, self.transition_end, p)
            }
            AnimationPhase::Scrub => 1.0,
            AnimationPhase::Finale => self.ease.fade_out(self.scrub_end, 1.0, p),
        }
    }

    /// Finale layer: 0 until Finale, then eased to 1 by the end of the timeline.
    pub fn finale_opacity(&self, p: f64) -> f64 {
        let p = clamp_unit(p);
        if p < self.scrub_end {
            return 0.0;
        }
        self.ease.fade_in(self.scrub_end, 1.0, p)
    }
}

/// Frame index for a normalized position: `floor(p * (n - 1))`, clamped to `[0, n - 1]`.
///
/// Non-decreasing in `p`. Returns 0 for an empty sequence.
pub fn map_progress_to_frame(p: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let last = n - 1;
    let idx = (clamp_unit(p) * last as f64).floor() as usize;
    idx.min(last)
}

fn clamp_unit(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/drive/timeline.rs"]
mod tests;

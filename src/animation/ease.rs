/// Easing curves used for overlay fades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Identity.
    Linear,
    /// Quadratic ease-in-out.
    InOutQuad,
    /// Cubic ease-in-out.
    #[default]
    InOutCubic,
    /// Cubic ease-out.
    OutCubic,
}

impl Ease {
    /// Map `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// Opacity rising 0 -> 1 across the window `[start, end]`.
    pub fn fade_in(self, start: f64, end: f64, p: f64) -> f64 {
        self.apply(crate::foundation::math::unlerp_clamped(start, end, p))
    }

    /// Opacity falling 1 -> 0 across the window `[start, end]`.
    pub fn fade_out(self, start: f64, end: f64, p: f64) -> f64 {
        1.0 - self.fade_in(start, end, p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;

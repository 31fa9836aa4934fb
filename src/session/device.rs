/// Client capabilities read once at session start.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceSignals {
    /// Viewport width in CSS pixels.
    pub viewport_width: u32,
    /// Touch input available.
    pub touch: bool,
    pub user_agent: String,
    /// The visitor asked for reduced motion.
    pub reduced_motion: bool,
}

/// Which asset set to play.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    #[default]
    Desktop,
    Mobile,
}

impl std::str::FromStr for Density {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown density '{other}' (expected desktop|mobile)")),
        }
    }
}

/// Why the animated core was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaticReason {
    ReducedMotion,
}

/// Experience chosen for the session. Not re-evaluated afterward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExperienceMode {
    /// Static content only.
    Static { reason: StaticReason },
    /// The animated journey with the given asset set.
    Animated(Density),
}

const MOBILE_UA_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
    "mobile",
];

/// Narrow viewport, or touch input on a user agent that names a mobile platform.
pub fn is_mobile(signals: &DeviceSignals, breakpoint_px: u32) -> bool {
    if signals.viewport_width < breakpoint_px {
        return true;
    }
    if !signals.touch {
        return false;
    }
    let ua = signals.user_agent.to_ascii_lowercase();
    MOBILE_UA_TOKENS.iter().any(|t| ua.contains(t))
}

/// Pick the experience for a session.
pub fn select_experience(signals: &DeviceSignals, breakpoint_px: u32) -> ExperienceMode {
    if signals.reduced_motion {
        return ExperienceMode::Static {
            reason: StaticReason::ReducedMotion,
        };
    }
    if is_mobile(signals, breakpoint_px) {
        ExperienceMode::Animated(Density::Mobile)
    } else {
        ExperienceMode::Animated(Density::Desktop)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/device.rs"]
mod tests;

use super::*;

fn signals(width: u32, touch: bool, ua: &str) -> DeviceSignals {
    DeviceSignals {
        viewport_width: width,
        touch,
        user_agent: ua.to_string(),
        reduced_motion: false,
    }
}

const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
const MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) Safari/605.1.15";

#[test]
fn reduced_motion_wins_over_everything() {
    let mut s = signals(320, true, IPHONE);
    s.reduced_motion = true;
    assert_eq!(
        select_experience(&s, 768),
        ExperienceMode::Static {
            reason: StaticReason::ReducedMotion
        }
    );
}

#[test]
fn narrow_viewport_is_mobile() {
    assert_eq!(
        select_experience(&signals(767, false, MAC), 768),
        ExperienceMode::Animated(Density::Mobile)
    );
    assert_eq!(
        select_experience(&signals(768, false, MAC), 768),
        ExperienceMode::Animated(Density::Desktop)
    );
}

#[test]
fn touch_needs_a_mobile_user_agent() {
    assert!(is_mobile(&signals(1024, true, IPHONE), 768));
    assert!(!is_mobile(&signals(1024, true, MAC), 768));
    assert!(!is_mobile(&signals(1024, false, IPHONE), 768));
}

#[test]
fn density_parses_case_insensitively() {
    assert_eq!("Mobile".parse::<Density>(), Ok(Density::Mobile));
    assert_eq!("desktop".parse::<Density>(), Ok(Density::Desktop));
    assert!("tablet".parse::<Density>().is_err());
}

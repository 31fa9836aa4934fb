use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = JourneyConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, JourneyConfig::default());
    assert!(cfg.validate().is_ok());

    assert_eq!(cfg.desktop.total_frames, 240);
    assert_eq!(cfg.desktop.priority_frames, 50);
    assert_eq!(cfg.desktop.batch_size, 10);
    assert_eq!(cfg.mobile.total_frames, 120);
    assert_eq!(cfg.mobile.fit, FitMode::Cover);
    assert_eq!(cfg.gate.max_wait_ms, 10_000);
    assert_eq!(cfg.drive.duration_ms, 7_000);
    assert_eq!(cfg.mobile_breakpoint_px, 768);
}

#[test]
fn partial_sections_keep_their_other_defaults() {
    let cfg = JourneyConfig::from_json_str(
        r#"{
            "desktop": { "total_frames": 60, "priority_frames": 12 },
            "timeline": { "intro_end": 0.15, "transition_end": 0.25, "scrub_end": 0.85 },
            "renderer": { "background_rgba": [0, 0, 0, 255] },
            "drive": { "mode": "scrub" }
        }"#,
    )
    .unwrap();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.desktop.total_frames, 60);
    assert_eq!(cfg.desktop.batch_size, 10);
    assert_eq!(cfg.desktop.extension, "jpg");
    assert_eq!(cfg.timeline.scrub_end, 0.85);
    assert_eq!(cfg.drive.drive_mode(), DriveMode::Scrub);

    let r = cfg.renderer_config(Density::Desktop);
    assert_eq!(r.background, Rgba8::opaque(0, 0, 0));
    assert_eq!(r.fit, FitMode::Contain);
    assert_eq!(r.crop.fraction, 0.04);
    assert_eq!(r.smoothing, 0.05);
}

#[test]
fn unknown_fields_and_bad_json_are_serde_errors() {
    assert!(matches!(
        JourneyConfig::from_json_str(r#"{ "desktp": {} }"#),
        Err(HomewardError::Serde(_))
    ));
    assert!(matches!(
        JourneyConfig::from_json_str("{"),
        Err(HomewardError::Serde(_))
    ));
}

#[test]
fn validation_names_the_failing_set() {
    let mut cfg = JourneyConfig::default();
    cfg.mobile.priority_frames = 500;
    let err = cfg.validate().unwrap_err().to_string();
    assert!(err.contains("mobile"), "{err}");

    let mut cfg = JourneyConfig::default();
    cfg.desktop.crop_fraction = 0.5;
    assert!(cfg.validate().is_err());

    let mut cfg = JourneyConfig::default();
    cfg.loader_threads = Some(0);
    assert!(cfg.validate().is_err());

    let mut cfg = JourneyConfig::default();
    cfg.renderer.smoothing = 1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn load_plan_uses_the_asset_naming() {
    let plan = JourneyConfig::default().mobile.load_plan();
    assert_eq!(plan.naming.file_name(0), "frame-001.webp");
    assert_eq!(plan.total, 120);
    assert_eq!(plan.background_batches().len(), 6);
}

#[test]
fn round_trips_through_pretty_json() {
    let mut cfg = JourneyConfig::default();
    cfg.loader_threads = Some(3);
    let text = cfg.to_json_pretty().unwrap();
    assert_eq!(JourneyConfig::from_json_str(&text).unwrap(), cfg);
}

#[test]
fn from_path_reports_missing_files() {
    let err = JourneyConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, HomewardError::Validation(_)));
}

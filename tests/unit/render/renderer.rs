use super::*;
use crate::sequence::frames::Frame;

fn layout() -> LayoutBox {
    LayoutBox::new(16.0, 9.0, 1.0)
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> Frame {
    Frame::from_rgba(image::RgbaImage::from_pixel(w, h, image::Rgba(px)))
}

// Frame i is a solid gray of value i, so the painted index can be read back from a pixel.
fn sequence(len: usize) -> FrameSequence {
    let mut seq = FrameSequence::new(len);
    for i in 0..len {
        let v = i as u8;
        seq.settle(i, Some(solid(16, 9, [v, v, v, 255]))).unwrap();
    }
    seq
}

fn renderer(viewport: &mut Viewport) -> SequenceRenderer {
    SequenceRenderer::new(RendererConfig::default(), viewport).unwrap()
}

#[test]
fn config_validation() {
    assert!(RendererConfig::default().validate().is_ok());
    for smoothing in [0.0, 1.0, -0.1, f64::NAN] {
        let cfg = RendererConfig {
            smoothing,
            ..RendererConfig::default()
        };
        assert!(cfg.validate().is_err(), "smoothing {smoothing}");
    }
    let cfg = RendererConfig {
        epsilon: 0.0,
        ..RendererConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn new_fails_without_a_drawable_surface() {
    let mut vp = Viewport::new(LayoutBox::new(0.0, 100.0, 1.0));
    let err = SequenceRenderer::new(RendererConfig::default(), &mut vp)
        .err()
        .unwrap();
    assert!(matches!(err, HomewardError::Surface(_)));
}

#[test]
fn first_adoption_paints_frame_zero_over_the_background() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    assert_eq!(r.surface().pixel(0, 0), Some([248, 246, 243, 255]));
    assert_eq!(r.displayed_frame(), None);

    r.set_frames(sequence(5));
    assert_eq!(r.displayed_frame(), Some(0));
    assert_eq!(r.surface().pixel(8, 4), Some([0, 0, 0, 255]));
    assert!(!r.is_animating());
}

#[test]
fn set_target_clamps_and_starts_the_loop() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    r.set_frames(sequence(5));

    r.set_target(99);
    assert_eq!(r.target_frame(), 4);
    assert!(r.is_animating());

    // Idempotent while running.
    r.set_target(4);
    assert!(r.is_animating());
}

#[test]
fn target_requested_before_frames_survives_adoption() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    r.set_target(3);
    assert_eq!(r.target_frame(), 0);
    while r.tick() {}

    r.set_frames(sequence(5));
    assert_eq!(r.target_frame(), 3);
    assert!(r.is_animating());
    while r.tick() {}
    assert_eq!(r.displayed_frame(), Some(3));
    assert_eq!(r.surface().pixel(8, 4), Some([3, 3, 3, 255]));

    // Re-clamped against a shorter sequence.
    r.set_target(99);
    r.set_frames(sequence(2));
    assert_eq!(r.target_frame(), 1);
}

#[test]
fn converges_monotonically_and_stops_on_target() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    r.set_frames(sequence(11));
    r.set_target(10);

    let mut last = r.current_frame();
    let mut ticks = 0;
    while r.tick() {
        let now = r.current_frame();
        assert!(now >= last, "{now} < {last}");
        assert!(now <= 10.0);
        last = now;
        ticks += 1;
        assert!(ticks < 1_000, "animation never settled");
    }

    assert_eq!(r.current_frame(), 10.0);
    assert_eq!(r.displayed_frame(), Some(10));
    assert_eq!(r.surface().pixel(8, 4), Some([10, 10, 10, 255]));
    assert!(!r.tick());
}

#[test]
fn follows_a_target_that_moves_mid_flight() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    r.set_frames(sequence(21));
    r.set_target(20);
    for _ in 0..30 {
        r.tick();
    }
    let midway = r.current_frame();
    assert!(midway > 0.0 && midway < 20.0);

    r.set_target(0);
    let mut last = midway;
    while r.tick() {
        assert!(r.current_frame() <= last);
        last = r.current_frame();
    }
    assert_eq!(r.displayed_frame(), Some(0));
}

#[test]
fn missing_frames_paint_background_only() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    let mut seq = FrameSequence::new(3);
    seq.settle(0, Some(solid(16, 9, [1, 2, 3, 255]))).unwrap();
    seq.settle(1, None).unwrap();
    r.set_frames(seq);

    r.set_target(2);
    while r.tick() {}
    assert_eq!(r.displayed_frame(), Some(2));
    assert_eq!(r.surface().pixel(8, 4), Some([248, 246, 243, 255]));
}

#[test]
fn later_adoption_repaints_the_current_frame() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);

    let mut partial = FrameSequence::new(3);
    partial.settle(0, Some(solid(16, 9, [0, 0, 0, 255]))).unwrap();
    r.set_frames(partial);
    r.set_target(2);
    while r.tick() {}
    assert_eq!(r.surface().pixel(8, 4), Some([248, 246, 243, 255]));

    r.set_frames(sequence(3));
    assert_eq!(r.displayed_frame(), Some(2));
    assert_eq!(r.surface().pixel(8, 4), Some([2, 2, 2, 255]));
}

#[test]
fn resize_keeps_animation_state() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    r.set_frames(sequence(11));
    r.set_target(10);
    for _ in 0..10 {
        r.tick();
    }
    let before = r.state();

    vp.resize(LayoutBox::new(32.0, 18.0, 1.0));
    r.poll_resize();
    assert_eq!(r.surface().width(), 32);
    assert_eq!(r.surface().height(), 18);
    assert_eq!(r.state(), before);
    assert!(r.is_animating());
}

#[test]
fn undrawable_resize_is_ignored() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    vp.resize(LayoutBox::new(0.0, 0.0, 1.0));
    r.poll_resize();
    assert_eq!(r.surface().width(), 16);
}

#[test]
fn teardown_releases_observer_and_is_idempotent() {
    let mut vp = Viewport::new(layout());
    let mut r = renderer(&mut vp);
    r.set_frames(sequence(5));
    r.set_target(4);
    assert_eq!(vp.observer_count(), 1);

    r.teardown();
    r.teardown();
    assert!(r.is_torn_down());
    assert!(!r.is_animating());
    assert!(!r.tick());

    vp.resize(LayoutBox::new(8.0, 8.0, 1.0));
    assert_eq!(vp.observer_count(), 0);

    let paints = r.paint_count();
    r.set_target(1);
    r.set_frames(sequence(5));
    assert_eq!(r.paint_count(), paints);
}

use super::*;

const EPS: f64 = 1e-9;

fn contain(img: (f64, f64), surf: (f64, f64)) -> Placement {
    compute_placement(
        Size::new(img.0, img.1),
        Size::new(surf.0, surf.1),
        FitMode::Contain,
        SourceCrop::NONE,
    )
    .unwrap()
}

#[test]
fn contain_wider_surface_fits_height_and_centers() {
    let p = contain((1920.0, 1080.0), (3000.0, 1000.0));
    assert!((p.dst.height() - 1000.0).abs() < EPS);
    assert!(p.dst.width() < 3000.0);
    assert!(p.dst.x0 > 0.0);
    assert!((p.dst.x0 - (3000.0 - p.dst.x1)).abs() < EPS);
    assert!((p.dst.width() / p.dst.height() - 16.0 / 9.0).abs() < 1e-9);
}

#[test]
fn contain_narrower_surface_fits_width_and_centers() {
    let p = contain((1920.0, 1080.0), (800.0, 1200.0));
    assert!((p.dst.width() - 800.0).abs() < EPS);
    assert!(p.dst.height() < 1200.0);
    assert!(p.dst.y0 > 0.0);
    assert!((p.dst.y0 - (1200.0 - p.dst.y1)).abs() < EPS);
}

#[test]
fn contain_square_surface_letterboxes_a_wide_frame() {
    let p = contain((1600.0, 900.0), (1000.0, 1000.0));
    assert!((p.dst.width() - 1000.0).abs() < EPS);
    assert!((p.dst.height() - 562.5).abs() < EPS);
    assert!((p.dst.y0 - 218.75).abs() < EPS);
    assert_eq!(p.src, Rect::new(0.0, 0.0, 1600.0, 900.0));
}

#[test]
fn contain_same_ratio_fills_exactly() {
    let p = contain((1920.0, 1080.0), (1280.0, 720.0));
    assert!(p.dst.x0.abs() < EPS && p.dst.y0.abs() < 1e-6);
    assert!((p.dst.width() - 1280.0).abs() < EPS);
    assert!((p.dst.height() - 720.0).abs() < 1e-6);
}

#[test]
fn crop_changes_effective_ratio() {
    let crop = SourceCrop::top_bottom(0.04).unwrap();
    let src = crop.apply(Size::new(1920.0, 1080.0));
    assert_eq!(src.y0, 43.0);
    assert_eq!(src.height(), 993.0);

    let p = compute_placement(
        Size::new(1920.0, 1080.0),
        Size::new(1920.0, 1080.0),
        FitMode::Contain,
        crop,
    )
    .unwrap();
    // The cropped band is wider than 16:9, so it fits the width.
    assert!((p.dst.width() - 1920.0).abs() < EPS);
    assert!(p.dst.height() < 1080.0);
    assert_eq!(p.src, src);
}

#[test]
fn cover_fills_surface_and_clips_source_evenly() {
    let p = compute_placement(
        Size::new(1920.0, 1080.0),
        Size::new(1000.0, 1000.0),
        FitMode::Cover,
        SourceCrop::NONE,
    )
    .unwrap();
    assert_eq!(p.dst, Rect::new(0.0, 0.0, 1000.0, 1000.0));
    assert!((p.src.width() - 1080.0).abs() < EPS);
    assert!((p.src.height() - 1080.0).abs() < EPS);
    assert!((p.src.x0 - 420.0).abs() < EPS);

    let wide = compute_placement(
        Size::new(1000.0, 1000.0),
        Size::new(2000.0, 500.0),
        FitMode::Cover,
        SourceCrop::NONE,
    )
    .unwrap();
    assert!((wide.src.height() - 250.0).abs() < EPS);
    assert!((wide.src.y0 - 375.0).abs() < EPS);
}

#[test]
fn degenerate_sizes_draw_nothing() {
    let s = Size::new(10.0, 10.0);
    assert!(compute_placement(Size::ZERO, s, FitMode::Contain, SourceCrop::NONE).is_none());
    assert!(compute_placement(s, Size::new(0.0, 5.0), FitMode::Cover, SourceCrop::NONE).is_none());
    assert!(
        compute_placement(s, Size::new(f64::NAN, 5.0), FitMode::Contain, SourceCrop::NONE)
            .is_none()
    );
}

#[test]
fn crop_fraction_is_validated() {
    assert!(SourceCrop::top_bottom(0.0).is_ok());
    assert!(SourceCrop::top_bottom(0.5).is_err());
    assert!(SourceCrop::top_bottom(-0.1).is_err());
    assert!(SourceCrop::top_bottom(f64::NAN).is_err());
}

use std::io::Cursor;

use super::*;
use crate::assets::source::MemoryFrameSource;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn plan(total: usize, priority: usize, batch_size: usize) -> LoadPlan {
    LoadPlan {
        base_path: "/seq".to_string(),
        naming: FrameNaming::new("frame-", "png"),
        total,
        priority,
        batch_size,
    }
}

fn source_with(total: usize, missing: &[usize]) -> Arc<dyn FrameSource> {
    let naming = FrameNaming::new("frame-", "png");
    let mut src = MemoryFrameSource::new();
    for i in 0..total {
        if !missing.contains(&i) {
            src.insert(format!("seq/{}", naming.file_name(i)), png(4, 2));
        }
    }
    Arc::new(src)
}

#[test]
fn plan_validation() {
    assert!(plan(10, 5, 2).validate().is_ok());
    assert!(plan(10, 10, 1).validate().is_ok());
    assert!(plan(0, 0, 1).validate().is_err());
    assert!(plan(10, 0, 1).validate().is_err());
    assert!(plan(10, 11, 1).validate().is_err());
    assert!(plan(10, 5, 0).validate().is_err());

    let mut bad = plan(10, 5, 1);
    bad.base_path = "../up".to_string();
    assert!(bad.validate().is_err());
}

#[test]
fn background_batches_cover_the_tail_in_order() {
    assert_eq!(
        plan(25, 10, 4).background_batches(),
        vec![10..14, 14..18, 18..22, 22..25]
    );
    assert!(plan(5, 5, 4).background_batches().is_empty());
    assert_eq!(plan(240, 50, 10).background_batches().len(), 19);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(FrameLoader::new(plan(4, 2, 1), Some(0)).is_err());
}

#[test]
fn run_reports_ready_then_batches_then_complete() {
    let loader = FrameLoader::new(plan(7, 3, 2), Some(2)).unwrap();
    let mut events = Vec::new();
    let summary = loader
        .run(source_with(7, &[]), &CancelToken::new(), |e| events.push(e))
        .unwrap();

    assert_eq!(summary.loaded, 7);
    assert_eq!(summary.failed, 0);
    assert!(!summary.cancelled);

    let ready_at = events
        .iter()
        .position(|e| matches!(e, LoadEvent::Ready(_)))
        .unwrap();
    let progress_before_ready = events[..ready_at]
        .iter()
        .filter(|e| matches!(e, LoadEvent::Progress(_)))
        .count();
    assert_eq!(progress_before_ready, 3);

    let LoadEvent::Ready(snapshot) = &events[ready_at] else {
        unreachable!()
    };
    assert_eq!(snapshot.leading_settled(), 3);
    assert!((3..7).all(|i| !snapshot.slot(i).unwrap().is_settled()));

    let batches: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            LoadEvent::Batch { batch, .. } => Some(*batch),
            _ => None,
        })
        .collect();
    assert_eq!(batches, vec![0, 1]);
    assert!(matches!(events.last(), Some(LoadEvent::Complete(_))));
}

#[test]
fn failed_frames_settle_and_count_once() {
    let loader = FrameLoader::new(plan(6, 2, 2), None).unwrap();
    let mut last_frames = None;
    let mut last_progress = LoadProgress::default();
    let summary = loader
        .run(source_with(6, &[1, 4]), &CancelToken::new(), |e| match e {
            LoadEvent::Batch { frames, .. } => last_frames = Some(frames),
            LoadEvent::Progress(p) => last_progress = p,
            _ => {}
        })
        .unwrap();

    assert_eq!(summary.loaded, 4);
    assert_eq!(summary.failed, 2);
    assert_eq!(last_progress.percent(), 100);
    assert_eq!(last_progress.settled, 6);

    let frames = last_frames.unwrap();
    assert!(frames.is_complete());
    assert!(frames.get(1).is_none());
    assert!(frames.get(4).is_none());
    assert_eq!(frames.get(0).unwrap().width, 4);
}

#[test]
fn all_priority_failures_still_become_ready() {
    let loader = FrameLoader::new(plan(4, 2, 2), None).unwrap();
    let mut ready = 0;
    loader
        .run(source_with(4, &[0, 1]), &CancelToken::new(), |e| {
            if let LoadEvent::Ready(frames) = e {
                ready += 1;
                assert_eq!(frames.failed_count(), 2);
            }
        })
        .unwrap();
    assert_eq!(ready, 1);
}

#[test]
fn cancel_stops_applying_results() {
    let loader = FrameLoader::new(plan(10, 2, 2), None).unwrap();
    let cancel = CancelToken::new();
    let mut after_ready = 0;
    let mut seen_ready = false;
    let summary = loader
        .run(source_with(10, &[]), &cancel, |e| {
            if seen_ready {
                after_ready += 1;
            }
            if matches!(e, LoadEvent::Ready(_)) {
                seen_ready = true;
                cancel.cancel();
            }
        })
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.loaded, 2);
    assert_eq!(after_ready, 0);
}

#[test]
fn spawned_loader_streams_events_and_joins() {
    let loader = FrameLoader::new(plan(5, 2, 2), None).unwrap();
    let handle = loader.spawn(source_with(5, &[])).unwrap();
    let mut complete = None;
    while let Some(e) = handle.next_blocking() {
        if let LoadEvent::Complete(s) = e {
            complete = Some(s);
        }
    }
    assert_eq!(complete.unwrap().loaded, 5);
    assert!(!handle.is_cancelled());
    assert_eq!(handle.join().unwrap().loaded, 5);
}

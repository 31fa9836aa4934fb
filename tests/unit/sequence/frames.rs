use super::*;

fn frame(w: u32, h: u32) -> Frame {
    Frame::from_rgba(image::RgbaImage::new(w, h))
}

#[test]
fn unfilled_slots_read_as_unavailable() {
    let seq = FrameSequence::new(3);
    assert_eq!(seq.len(), 3);
    assert!(seq.get(0).is_none());
    assert!(seq.get(99).is_none());
    assert_eq!(seq.settled_count(), 0);
    assert!(!seq.is_complete());
}

#[test]
fn settle_is_write_once() {
    let mut seq = FrameSequence::new(2);
    seq.settle(0, Some(frame(4, 2))).unwrap();
    assert!(seq.settle(0, Some(frame(1, 1))).is_err());
    assert!(seq.settle(0, None).is_err());
    assert_eq!(seq.get(0).unwrap().width, 4);

    seq.settle(1, None).unwrap();
    assert!(seq.settle(1, Some(frame(1, 1))).is_err());
    assert!(seq.get(1).is_none());
    assert!(seq.slot(1).unwrap().is_settled());
    assert!(seq.settle(2, None).is_err());
}

#[test]
fn counts_track_loaded_and_failed() {
    let mut seq = FrameSequence::new(4);
    seq.settle(0, Some(frame(1, 1))).unwrap();
    seq.settle(1, None).unwrap();
    seq.settle(3, Some(frame(1, 1))).unwrap();
    assert_eq!(seq.settled_count(), 3);
    assert_eq!(seq.loaded_count(), 2);
    assert_eq!(seq.failed_count(), 1);
    assert_eq!(seq.leading_settled(), 2);
    assert!(!seq.is_complete());

    seq.settle(2, None).unwrap();
    assert!(seq.is_complete());
    assert_eq!(seq.leading_settled(), 4);
}

#[test]
fn snapshots_share_frames() {
    let mut seq = FrameSequence::new(1);
    seq.settle(0, Some(frame(2, 2))).unwrap();
    let snap = seq.clone();
    assert!(Arc::ptr_eq(seq.get(0).unwrap(), snap.get(0).unwrap()));
}

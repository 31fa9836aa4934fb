use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "homeward_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn fs_source_reads_relative_to_root() {
    let tmp = temp_dir("fs_source");
    std::fs::create_dir_all(tmp.join("seq")).unwrap();
    std::fs::write(tmp.join("seq/frame-001.jpg"), b"abc").unwrap();

    let src = FsFrameSource::new(&tmp);
    assert_eq!(src.fetch("seq/frame-001.jpg").unwrap(), b"abc");
    let err = src.fetch("seq/frame-002.jpg").unwrap_err();
    assert!(err.to_string().contains("frame-002.jpg"));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn memory_source_missing_is_asset_error() {
    let mut src = MemoryFrameSource::new();
    assert!(src.is_empty());
    src.insert("a/frame-001.png", vec![1, 2, 3]);
    assert_eq!(src.len(), 1);
    assert_eq!(src.fetch("a/frame-001.png").unwrap(), vec![1, 2, 3]);
    assert!(matches!(
        src.fetch("a/frame-002.png"),
        Err(HomewardError::Asset(_))
    ));
}

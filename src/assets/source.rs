use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{HomewardError, HomewardResult};

/// Where encoded frame bytes come from.
///
/// Implementations are called from loader worker threads, concurrently.
pub trait FrameSource: Send + Sync {
    /// Fetch the encoded bytes stored at `rel_path` (normalized, forward slashes).
    fn fetch(&self, rel_path: &str) -> HomewardResult<Vec<u8>>;
}

impl<T: FrameSource + ?Sized> FrameSource for std::sync::Arc<T> {
    fn fetch(&self, rel_path: &str) -> HomewardResult<Vec<u8>> {
        (**self).fetch(rel_path)
    }
}

/// Reads frames from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsFrameSource {
    root: PathBuf,
}

impl FsFrameSource {
    /// Source rooted at `root`; relative frame paths resolve beneath it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used when resolving relative frame paths.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameSource for FsFrameSource {
    fn fetch(&self, rel_path: &str) -> HomewardResult<Vec<u8>> {
        let path = self.root.join(Path::new(rel_path));
        let bytes = std::fs::read(&path).with_context(|| format!("read '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// In-memory map of relative path to encoded bytes.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFrameSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `rel_path`.
    pub fn insert(&mut self, rel_path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(rel_path.into(), bytes);
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for MemoryFrameSource {
    fn fetch(&self, rel_path: &str) -> HomewardResult<Vec<u8>> {
        self.files
            .get(rel_path)
            .cloned()
            .ok_or_else(|| HomewardError::asset(format!("no such frame '{rel_path}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;

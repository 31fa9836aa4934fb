use crate::foundation::error::{HomewardError, HomewardResult};

/// Positional file naming for a frame sequence: `{prefix}{index + 1, zero padded}.{extension}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameNaming {
    /// File name prefix, e.g. `frame-`.
    pub prefix: String,
    /// Extension without the dot, e.g. `jpg` or `webp`.
    pub extension: String,
    /// Minimum digit count of the 1-based position.
    pub pad: usize,
}

impl Default for FrameNaming {
    fn default() -> Self {
        Self {
            prefix: "frame-".to_string(),
            extension: "jpg".to_string(),
            pad: 3,
        }
    }
}

impl FrameNaming {
    /// Build a naming scheme with the default 3 digit padding.
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
            pad: 3,
        }
    }

    /// File name for zero-based `index` (index 0 -> `frame-001.jpg`).
    pub fn file_name(&self, index: usize) -> String {
        format!(
            "{}{:0pad$}.{}",
            self.prefix,
            index + 1,
            self.extension.trim_start_matches('.'),
            pad = self.pad
        )
    }

    /// Normalized relative path of frame `index` under `base_path`.
    pub fn rel_path(&self, base_path: &str, index: usize) -> HomewardResult<String> {
        let base = normalize_rel_path(base_path)?;
        Ok(format!("{base}/{}", self.file_name(index)))
    }
}

/// Normalize a base path into a relative, forward-slash form.
///
/// Leading slashes are dropped (web-root style paths like `/assets/sequence` are
/// accepted). Empty paths and `..` segments are rejected.
pub fn normalize_rel_path(source: &str) -> HomewardResult<String> {
    let s = source.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(HomewardError::validation(format!(
                "frame path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(HomewardError::validation("frame base path must be non-empty"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/naming.rs"]
mod tests;

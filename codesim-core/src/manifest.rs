use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One unit of work: two files whose structural distance is computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComparisonPair {
    pub left: PathBuf,
    pub right: PathBuf,
}

impl ComparisonPair {
    #[must_use]
    pub fn new(left: impl Into<PathBuf>, right: impl Into<PathBuf>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Read a manifest file. Relative paths resolve against the manifest's own directory.
pub fn load_manifest(path: &Path) -> Result<Vec<ComparisonPair>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&content, &manifest_dir(path))
}

/// The directory manifest-relative paths are resolved against.
#[must_use]
pub fn manifest_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Parse manifest text: one pair of whitespace-separated paths per line.
///
/// Blank lines are skipped. Any other line must have exactly two fields.
pub fn parse_manifest(content: &str, base: &Path) -> Result<Vec<ComparisonPair>> {
    let mut pairs = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => {}
            [left, right] => pairs.push(ComparisonPair::new(base.join(left), base.join(right))),
            _ => {
                return Err(Error::ManifestLine {
                    line: idx + 1,
                    fields: fields.len(),
                });
            }
        }
    }
    Ok(pairs)
}

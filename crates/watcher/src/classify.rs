//! Mapping changed paths to watch keys
//!
//! A watch key is the top-level entry under the watched root that a change
//! belongs to: the file name for direct children, or the first directory
//! component for anything deeper.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Component, Path};

/// Name of a top-level entry under the watched root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchKey(OsString);

impl WatchKey {
    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }
}

impl From<&str> for WatchKey {
    fn from(name: &str) -> Self {
        Self(OsString::from(name))
    }
}

impl From<&OsStr> for WatchKey {
    fn from(name: &OsStr) -> Self {
        Self(name.to_os_string())
    }
}

impl AsRef<Path> for WatchKey {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for WatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

/// Classify `changed` into the watch key it belongs to under `root`.
///
/// Returns `None` when `changed` is not strictly inside `root` (including
/// `root` itself), which callers filter out before getting here.
pub fn classify(changed: &Path, root: &Path) -> Option<WatchKey> {
    let name = changed.file_name()?;
    let dir = changed.parent()?;
    let rel = dir.strip_prefix(root).ok()?;

    match rel.components().next() {
        None => Some(WatchKey::from(name)),
        Some(Component::Normal(first)) => Some(WatchKey::from(first)),
        Some(_) => None,
    }
}

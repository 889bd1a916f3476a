//! Error types for watching and relocation

use crate::classify::WatchKey;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Everything that can go wrong between the event source and the relocator.
///
/// `StartupConfig`, `Subscription`, `StreamFatal` and `StreamClosed` are
/// fatal to the process. `PerEvent` and `Relocation` are reported and the
/// loop keeps going.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Missing or invalid source/destination roots
    #[error("invalid configuration: {0}")]
    StartupConfig(String),

    /// The event source could not be initialized on the watched root
    #[error("failed to subscribe to {}: {source}", .path.display())]
    Subscription {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// The event source failed mid-stream
    #[error("event stream failed: {0}")]
    StreamFatal(String),

    /// The event source hung up; it cannot be resubscribed without missing events
    #[error("event stream closed")]
    StreamClosed,

    /// A single notification whose path could not be resolved
    #[error("could not resolve path for event: {0}")]
    PerEvent(String),

    /// Moving a settled entry failed
    #[error(transparent)]
    Relocation(#[from] RelocationError),
}

impl WatchError {
    /// Whether this error must terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WatchError::StartupConfig(_)
                | WatchError::Subscription { .. }
                | WatchError::StreamFatal(_)
                | WatchError::StreamClosed
        )
    }
}

/// A failed move of one watch key
#[derive(Debug, Error)]
#[error("error moving {} to {}: {source}", .from.display(), .to.display())]
pub struct RelocationError {
    pub key: WatchKey,
    pub from: PathBuf,
    pub to: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_kinds() {
        assert!(WatchError::StartupConfig("no src".into()).is_fatal());
        assert!(WatchError::StreamFatal("read failed".into()).is_fatal());
        assert!(WatchError::StreamClosed.is_fatal());
        assert!(!WatchError::PerEvent("no path".into()).is_fatal());

        let relocation = RelocationError {
            key: WatchKey::from("a.txt"),
            from: PathBuf::from("/src/a.txt"),
            to: PathBuf::from("/dst/a.txt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let err = WatchError::from(relocation);
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("/src/a.txt"));
    }
}

//! Quiescence-based relocation for Quiesce
//!
//! This crate watches a directory tree and moves each top-level entry to a
//! destination tree once it has stopped receiving writes:
//! - Path classification into watch keys (file name or first directory)
//! - Per-key debouncing with resettable deadlines
//! - Atomic rename of settled entries
//! - A `notify`-backed event source and the drain loop feeding the registry

pub mod classify;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod relocate;
pub mod source;

// Re-exports
pub use classify::{classify, WatchKey};
pub use debounce::{Arming, DebounceRegistry};
pub use dispatch::{DispatchStats, Dispatcher};
pub use error::{RelocationError, Result, WatchError};
pub use relocate::{FsRelocator, Relocate, RelocationJob};
pub use source::{EventKind, EventSource, Notification, NotifySource, WatchEvent};

//! Draining an event source into the debounce registry

use crate::classify::classify;
use crate::debounce::{Arming, DebounceRegistry};
use crate::error::Result;
use crate::relocate::Relocate;
use crate::source::{EventKind, EventSource, Notification};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Counters for one run of the drain loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: u64,
    pub qualifying: u64,
    /// Qualifying events that created a new timer rather than resetting one
    pub armed: u64,
    pub out_of_scope: u64,
    pub ignored_kind: u64,
    pub unresolved: u64,
}

/// Feeds qualifying notifications for paths under `root` into a registry
pub struct Dispatcher<R: Relocate> {
    root: PathBuf,
    registry: Arc<DebounceRegistry<R>>,
}

impl<R: Relocate> Dispatcher<R> {
    pub fn new(root: PathBuf, registry: Arc<DebounceRegistry<R>>) -> Self {
        Self { root, registry }
    }

    /// Process notifications one at a time until the source ends.
    ///
    /// Blocks the calling thread. A source error is returned as-is and ends
    /// the loop; per-notification problems are logged and skipped.
    pub fn run<S: EventSource>(&self, source: &mut S) -> Result<DispatchStats> {
        let mut stats = DispatchStats::default();

        while let Some(notification) = source.next_event()? {
            stats.received += 1;
            self.handle(&notification, &mut stats);
            // Released before the next one is read
            drop(notification);
        }

        debug!("Event stream ended: {:?}", stats);
        Ok(stats)
    }

    fn handle<N: Notification>(&self, notification: &N, stats: &mut DispatchStats) {
        let path = match notification.path() {
            Ok(path) => path,
            Err(err) => {
                warn!("{}", err);
                stats.unresolved += 1;
                return;
            }
        };

        if !path.starts_with(&self.root) || path == self.root.as_path() {
            stats.out_of_scope += 1;
            return;
        }

        debug!("Received an event for {}", path.display());

        if !(notification.matches_kind(EventKind::ContentModified)
            || notification.matches_kind(EventKind::CloseAfterWrite))
        {
            stats.ignored_kind += 1;
            return;
        }

        let Some(key) = classify(path, &self.root) else {
            stats.out_of_scope += 1;
            return;
        };

        stats.qualifying += 1;
        if self.registry.on_event(key) == Arming::Created {
            stats.armed += 1;
        }
    }
}

//! Event sources feeding the dispatcher
//!
//! The dispatcher only needs a blocking stream of notifications that can
//! resolve their path and answer whether they are of a given kind. Each
//! notification is released when it is dropped.

use crate::error::{Result, WatchError};
use crossbeam_channel::{unbounded, Receiver};
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::info;

/// Kinds of write activity the dispatcher cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// File content was modified
    ContentModified,
    /// A handle opened for writing was closed
    CloseAfterWrite,
}

/// A single change notification.
///
/// Dropping the notification releases whatever the source tied to it.
pub trait Notification {
    /// Absolute path of the changed entry
    fn path(&self) -> Result<&Path>;

    fn matches_kind(&self, kind: EventKind) -> bool;
}

/// Blocking stream of notifications for paths under a watched root
pub trait EventSource {
    type Notification: Notification;

    /// Block until the next notification.
    ///
    /// `Ok(None)` means the stream has ended. An error means the
    /// subscription is broken and will produce nothing further.
    fn next_event(&mut self) -> Result<Option<Self::Notification>>;
}

/// File system event delivered by [`NotifySource`]
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// Path that changed, if the backend reported one
    pub path: Option<PathBuf>,
    /// Backend event kind
    pub kind: notify::EventKind,
}

impl Notification for WatchEvent {
    fn path(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .ok_or_else(|| WatchError::PerEvent(format!("{:?} event without a path", self.kind)))
    }

    fn matches_kind(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::ContentModified => matches!(
                self.kind,
                notify::EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
            ),
            EventKind::CloseAfterWrite => matches!(
                self.kind,
                notify::EventKind::Access(AccessKind::Close(AccessMode::Write))
            ),
        }
    }
}

/// Recursive subscription to a directory tree through `notify`.
///
/// The backend forwards into an unbounded channel so nothing is dropped on
/// our side when the dispatcher falls behind.
pub struct NotifySource {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<notify::Event>>,
    pending: VecDeque<WatchEvent>,
}

impl NotifySource {
    /// Subscribe to every change below `root`
    pub fn subscribe(root: &Path) -> Result<Self> {
        let (tx, rx) = unbounded();

        let subscription_error = |source: notify::Error| WatchError::Subscription {
            path: root.to_path_buf(),
            source,
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                // Receiver only goes away with the source itself
                let _ = tx.send(res);
            },
            Config::default(),
        )
        .map_err(subscription_error)?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(subscription_error)?;

        info!("Subscribed to {}", root.display());

        Ok(Self {
            _watcher: watcher,
            rx,
            pending: VecDeque::new(),
        })
    }

    /// Split a backend event into one notification per path
    fn enqueue(&mut self, event: notify::Event) {
        if event.paths.is_empty() {
            self.pending.push_back(WatchEvent {
                path: None,
                kind: event.kind,
            });
            return;
        }

        for path in event.paths {
            self.pending.push_back(WatchEvent {
                path: Some(path),
                kind: event.kind,
            });
        }
    }
}

impl EventSource for NotifySource {
    type Notification = WatchEvent;

    fn next_event(&mut self) -> Result<Option<WatchEvent>> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        match self.rx.recv() {
            Ok(Ok(event)) => {
                self.enqueue(event);
                Ok(self.pending.pop_front())
            }
            Ok(Err(err)) => Err(WatchError::StreamFatal(err.to_string())),
            Err(_) => Ok(None),
        }
    }
}

//! Per-key quiescence timers
//!
//! Every watch key with recent write activity owns exactly one timer entry.
//! A qualifying event either creates the entry (and spawns its expiry task)
//! or pushes its deadline forward. The expiry task sleeps until the current
//! deadline, then retires the entry only if no reset moved the deadline in
//! the meantime. Creation, reset and retirement all happen under the map's
//! shard lock for that key, so a reset can never be lost to a concurrent
//! fire. Relocation runs after the entry is gone and outside any lock.

use crate::classify::WatchKey;
use crate::relocate::{Relocate, RelocationJob};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

/// Stand-in deadline when `now + wait_for` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// What `on_event` did with the key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arming {
    /// No timer existed; one was created and armed
    Created,
    /// An existing timer's deadline was pushed forward
    Reset,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    /// Distinguishes this entry from any later entry for the same key
    epoch: u64,
    deadline: Instant,
}

/// Registry of armed quiescence timers, keyed by watch key
pub struct DebounceRegistry<R: Relocate> {
    timers: DashMap<WatchKey, Timer>,
    wait_for: Duration,
    source_root: Arc<PathBuf>,
    destination_root: Arc<PathBuf>,
    relocator: Arc<R>,
    runtime: Handle,
    next_epoch: AtomicU64,
}

impl<R: Relocate> DebounceRegistry<R> {
    /// Create a registry whose expiry tasks run on `runtime`
    pub fn new(
        source_root: PathBuf,
        destination_root: PathBuf,
        wait_for: Duration,
        relocator: R,
        runtime: Handle,
    ) -> Arc<Self> {
        Arc::new(Self {
            timers: DashMap::new(),
            wait_for,
            source_root: Arc::new(source_root),
            destination_root: Arc::new(destination_root),
            relocator: Arc::new(relocator),
            runtime,
            next_epoch: AtomicU64::new(0),
        })
    }

    /// Record write activity for `key`.
    ///
    /// Creates and arms a timer at `now + wait_for` if none exists, otherwise
    /// moves the existing deadline to `now + wait_for`. Safe to call from any
    /// thread; calls for the same key serialize on its shard lock.
    pub fn on_event(self: &Arc<Self>, key: WatchKey) -> Arming {
        let now = Instant::now();
        let deadline = now
            .checked_add(self.wait_for)
            .unwrap_or_else(|| now + FAR_FUTURE);

        let spawned = match self.timers.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().deadline = deadline;
                debug!("Received an event, so resetting the timer for {}", entry.key());
                None
            }
            Entry::Vacant(entry) => {
                let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
                let job = RelocationJob {
                    key: entry.key().clone(),
                    source_root: Arc::clone(&self.source_root),
                    destination_root: Arc::clone(&self.destination_root),
                };
                entry.insert(Timer { epoch, deadline });
                Some((job, epoch))
            }
        };

        // Spawn only after the shard lock is released
        match spawned {
            Some((job, epoch)) => {
                info!("New content detected, watching: {}", job.key);
                let registry = Arc::clone(self);
                self.runtime
                    .spawn(async move { registry.expire_when_quiet(job, epoch).await });
                Arming::Created
            }
            None => Arming::Reset,
        }
    }

    async fn expire_when_quiet(self: Arc<Self>, job: RelocationJob, epoch: u64) {
        loop {
            let deadline = match self.timers.get(&job.key) {
                Some(timer) if timer.epoch == epoch => timer.deadline,
                _ => return,
            };

            sleep_until(deadline).await;

            if self.expire(&job.key, epoch) {
                break;
            }
        }

        match job.run(&*self.relocator).await {
            Ok(()) => info!("Moved {} to {}", job.source().display(), job.destination().display()),
            Err(err) => error!("{}", err),
        }
    }

    /// Retire `key` if its entry is still `epoch` and its deadline has passed.
    fn expire(&self, key: &WatchKey, epoch: u64) -> bool {
        self.timers
            .remove_if(key, |_, timer| {
                timer.epoch == epoch && timer.deadline <= Instant::now()
            })
            .is_some()
    }

    /// Number of keys currently waiting to go quiet
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn contains(&self, key: &WatchKey) -> bool {
        self.timers.contains_key(key)
    }

    /// Current deadline for `key`, if armed
    pub fn deadline(&self, key: &WatchKey) -> Option<Instant> {
        self.timers.get(key).map(|timer| timer.deadline)
    }
}

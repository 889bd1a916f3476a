//! Watch loop lifecycle

use crate::config::Settings;
use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info};
use watcher::{DebounceRegistry, Dispatcher, FsRelocator, NotifySource, WatchError};

/// Watch `settings.source` until interrupted or the event stream breaks.
///
/// Returns `Ok(())` on Ctrl-C. Timers still armed at that point are
/// abandoned, so nothing mid-write is ever moved.
pub async fn run(settings: Settings) -> Result<()> {
    info!(
        "Watching directory {} and moving to {}",
        settings.source.display(),
        settings.destination.display()
    );

    let mut source = NotifySource::subscribe(&settings.source)?;

    let registry = DebounceRegistry::new(
        settings.source.clone(),
        settings.destination.clone(),
        settings.wait_for,
        FsRelocator,
        Handle::current(),
    );
    let dispatcher = Dispatcher::new(settings.source.clone(), registry.clone());

    // next_event blocks, so the drain loop gets its own thread. It is not
    // joined on shutdown: it only ever exits when the stream does.
    let (done_tx, done_rx) = oneshot::channel();
    std::thread::Builder::new()
        .name("quiesce-drain".into())
        .spawn(move || {
            let _ = done_tx.send(dispatcher.run(&mut source));
        })
        .context("Failed to spawn event drain thread")?;

    tokio::select! {
        finished = done_rx => {
            let stats = finished.context("Event drain thread exited without reporting")??;
            debug!("Drain loop stopped: {:?}", stats);
            Err(WatchError::StreamClosed.into())
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, abandoning {} pending entries", registry.len());
            Ok(())
        }
    }
}

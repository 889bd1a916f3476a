//! Moving settled entries into the destination tree

use crate::classify::WatchKey;
use crate::error::RelocationError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Performs the move once a watch key has gone quiet
#[async_trait]
pub trait Relocate: Send + Sync + 'static {
    async fn relocate(
        &self,
        key: &WatchKey,
        source_root: &Path,
        destination_root: &Path,
    ) -> Result<(), RelocationError>;
}

/// Renames `source_root/key` to `destination_root/key`.
///
/// Both roots are expected on the same volume; the rename is atomic there
/// and fails with `CrossesDevices` otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRelocator;

#[async_trait]
impl Relocate for FsRelocator {
    async fn relocate(
        &self,
        key: &WatchKey,
        source_root: &Path,
        destination_root: &Path,
    ) -> Result<(), RelocationError> {
        let from = source_root.join(key);
        let to = destination_root.join(key);

        info!("Timer expired, moving {} to {}", from.display(), to.display());

        tokio::fs::rename(&from, &to)
            .await
            .map_err(|source| RelocationError {
                key: key.clone(),
                from,
                to,
                source,
            })
    }
}

/// Everything an armed timer needs to relocate its key when it fires.
///
/// Built once when the timer is created and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RelocationJob {
    pub key: WatchKey,
    pub source_root: Arc<PathBuf>,
    pub destination_root: Arc<PathBuf>,
}

impl RelocationJob {
    pub fn source(&self) -> PathBuf {
        self.source_root.join(&self.key)
    }

    pub fn destination(&self) -> PathBuf {
        self.destination_root.join(&self.key)
    }

    pub async fn run<R: Relocate + ?Sized>(&self, relocator: &R) -> Result<(), RelocationError> {
        relocator
            .relocate(&self.key, &self.source_root, &self.destination_root)
            .await
    }
}

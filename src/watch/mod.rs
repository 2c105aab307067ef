//! Per-library poll loop.
//!
//! A [`Watcher`] snapshots its library root on a fixed interval, announces
//! every newly appeared `Title (Year)` folder and asks the rescan dispatcher
//! to refresh its section.

use crate::config::WatchTarget;
use crate::metadata::{LookupError, MetadataResolver};
use crate::notifications::NotificationManager;
use crate::rescan::RescanSignal;
use crate::scanner::{parse_directory_name, read_snapshot, DirectoryReader, Snapshot};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The first snapshot could not be taken, so there is nothing to diff against.
    #[error("cannot read root {root:?} of library '{name}': {source}")]
    Startup {
        name: String,
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Collaborators shared by every watcher.
#[derive(Clone)]
pub struct WatchContext {
    pub reader: Arc<dyn DirectoryReader>,
    pub resolver: Arc<dyn MetadataResolver>,
    pub notifier: Arc<NotificationManager>,
    pub rescan_tx: mpsc::Sender<RescanSignal>,
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The root could not be read; the previous snapshot was kept.
    ReadFailed,
    Scanned {
        /// Entries absent from the previous snapshot.
        new_entries: usize,
        /// New entries that were resolved and announced.
        announced: usize,
    },
}

/// Watches one library root.
pub struct Watcher {
    target: WatchTarget,
    ctx: WatchContext,
    snapshot: Snapshot,
}

impl Watcher {
    /// Take the first snapshot of the library root.
    pub async fn initialize(target: WatchTarget, ctx: WatchContext) -> Result<Self, WatchError> {
        let snapshot = read_snapshot(ctx.reader.as_ref(), &target.root)
            .await
            .map_err(|source| WatchError::Startup {
                name: target.name.clone(),
                root: target.root.clone(),
                source,
            })?;

        tracing::info!(
            library = %target.name,
            section = %target.section,
            entries = snapshot.len(),
            "Monitoring folder {:?}",
            target.root
        );

        Ok(Self {
            target,
            ctx,
            snapshot,
        })
    }

    /// The snapshot new entries are detected against.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Poll on a fixed interval until `cancel` fires.
    pub async fn run(mut self, poll_interval: Duration, cancel: CancellationToken) {
        let period = poll_interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
            }
        }

        tracing::info!(library = %self.target.name, "Watcher stopped");
    }

    /// Take a new snapshot, announce new entries and signal a rescan if any
    /// entry was announced.
    pub async fn poll_once(&mut self) -> CycleOutcome {
        let current = match read_snapshot(self.ctx.reader.as_ref(), &self.target.root).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    library = %self.target.name,
                    "Failed to read {:?}, skipping this cycle: {}",
                    self.target.root,
                    e
                );
                return CycleOutcome::ReadFailed;
            }
        };

        let added = current.added_since(&self.snapshot);
        let mut announced = 0;
        for entry in &added {
            tracing::info!(library = %self.target.name, entry = %entry, "Detected new folder");
            if self.announce(entry).await {
                announced += 1;
            }
        }

        if announced > 0 {
            let signal = RescanSignal {
                section: self.target.section,
            };
            // Waits for capacity when the queue is full.
            if self.ctx.rescan_tx.send(signal).await.is_err() {
                tracing::warn!(section = %self.target.section, "Rescan dispatcher is gone, signal dropped");
            }
        }

        self.snapshot = current;

        CycleOutcome::Scanned {
            new_entries: added.len(),
            announced,
        }
    }

    /// Resolve and announce one folder. Returns `true` once announced.
    async fn announce(&self, entry: &str) -> bool {
        let parsed = match parse_directory_name(entry) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Skipping {:?}: {}", entry, e);
                return false;
            }
        };

        match self.ctx.resolver.resolve(&parsed.title, &parsed.year).await {
            Ok(record) => {
                self.ctx.notifier.notify_arrival(&record).await;
                true
            }
            Err(e @ LookupError::NotFound { .. }) => {
                tracing::warn!(entry = %entry, "{}", e);
                false
            }
            Err(e) => {
                tracing::error!(
                    entry = %entry,
                    resolver = self.ctx.resolver.name(),
                    "Metadata lookup failed: {}",
                    e
                );
                false
            }
        }
    }
}

//! Wires watchers and the rescan dispatcher together and runs them until
//! cancelled.

use crate::config::{Config, WatchTarget};
use crate::metadata::{MetadataResolver, TmdbProvider};
use crate::notifications::NotificationManager;
use crate::rescan::{CommandRescanner, RescanDispatcher, Rescanner};
use crate::scanner::{DirectoryReader, FsReader};
use crate::watch::{WatchContext, Watcher};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub struct Daemon {
    targets: Vec<WatchTarget>,
    reader: Arc<dyn DirectoryReader>,
    resolver: Arc<dyn MetadataResolver>,
    notifier: Arc<NotificationManager>,
    rescanner: Arc<dyn Rescanner>,
    poll_interval: Duration,
    debounce_window: Duration,
    channel_capacity: usize,
}

impl Daemon {
    pub fn new(
        targets: Vec<WatchTarget>,
        resolver: Arc<dyn MetadataResolver>,
        notifier: Arc<NotificationManager>,
        rescanner: Arc<dyn Rescanner>,
    ) -> Self {
        let defaults = crate::config::WatchConfig::default();
        Self {
            targets,
            reader: Arc::new(FsReader),
            resolver,
            notifier,
            rescanner,
            poll_interval: defaults.poll_interval(),
            debounce_window: defaults.debounce_window(),
            channel_capacity: defaults.channel_capacity,
        }
    }

    /// Build the production daemon: TMDB lookups, Slack announcements and
    /// the configured scanner command.
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = TmdbProvider::new(&config.tmdb)?;
        let notifier = NotificationManager::new(config);
        if !notifier.has_targets() {
            tracing::warn!("No Slack webhooks configured, arrivals will only be logged");
        }
        let rescanner = CommandRescanner::new(&config.rescan);

        Ok(Self::new(
            config.watch_targets(),
            Arc::new(resolver),
            Arc::new(notifier),
            Arc::new(rescanner),
        )
        .with_poll_interval(config.watch.poll_interval())
        .with_debounce_window(config.watch.debounce_window())
        .with_channel_capacity(config.watch.channel_capacity))
    }

    pub fn with_reader(mut self, reader: Arc<dyn DirectoryReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Take the first snapshot of every library, then poll until `cancel`
    /// fires.
    ///
    /// Fails before spawning anything when no library is configured or a
    /// library root cannot be read.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        if self.targets.is_empty() {
            anyhow::bail!("No libraries configured, add at least one [plex.<name>] section");
        }

        let (rescan_tx, rescan_rx) = mpsc::channel(self.channel_capacity.max(1));
        let ctx = WatchContext {
            reader: self.reader,
            resolver: self.resolver,
            notifier: self.notifier,
            rescan_tx,
        };

        let mut watchers = Vec::with_capacity(self.targets.len());
        for target in self.targets {
            let name = target.name.clone();
            let watcher = Watcher::initialize(target, ctx.clone())
                .await
                .with_context(|| format!("Failed to start watcher for library '{}'", name))?;
            watchers.push(watcher);
        }
        // The dispatcher stops once the last watcher drops its sender.
        drop(ctx);

        let mut tasks = JoinSet::new();
        tasks.spawn(RescanDispatcher::new(self.rescanner, self.debounce_window).run(rescan_rx));
        for watcher in watchers {
            tasks.spawn(watcher.run(self.poll_interval, cancel.clone()));
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        Ok(())
    }
}

//! Debounced library rescans.
//!
//! Every watcher sends a [`RescanSignal`] on a shared bounded channel when it
//! announced at least one new movie. A single [`RescanDispatcher`] drains the
//! channel and issues at most one rescan per section within the debounce
//! window.

pub mod command;

pub use command::CommandRescanner;

use crate::config::SectionId;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Request to rescan one library section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescanSignal {
    pub section: SectionId,
}

/// Refreshes one section of the downstream library.
#[async_trait::async_trait]
pub trait Rescanner: Send + Sync {
    async fn rescan(&self, section: SectionId) -> Result<()>;
}

/// Outcome of a single signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanDecision {
    Issued,
    Suppressed { elapsed: Duration },
}

/// Single consumer of rescan signals.
///
/// Owns the per-section "last issued" timestamps; nothing else reads or
/// writes them.
pub struct RescanDispatcher {
    rescanner: Arc<dyn Rescanner>,
    window: Duration,
    last_issued: HashMap<SectionId, Instant>,
}

impl RescanDispatcher {
    pub fn new(rescanner: Arc<dyn Rescanner>, window: Duration) -> Self {
        Self {
            rescanner,
            window,
            last_issued: HashMap::new(),
        }
    }

    /// Drain `signals` until every sender has been dropped.
    pub async fn run(mut self, mut signals: mpsc::Receiver<RescanSignal>) {
        tracing::info!("Rescan dispatcher running");

        while let Some(signal) = signals.recv().await {
            tracing::debug!(section = %signal.section, "Rescan dispatcher invoked by watcher");
            self.handle_signal(signal.section, Instant::now()).await;
        }

        tracing::info!("Rescan dispatcher stopped");
    }

    /// Issue or suppress a rescan of `section` observed at `now`.
    ///
    /// The timestamp is recorded before the rescan runs, so a failing rescan
    /// is debounced like a successful one.
    pub async fn handle_signal(&mut self, section: SectionId, now: Instant) -> RescanDecision {
        let decision = self.admit(section, now);

        match decision {
            RescanDecision::Issued => {
                tracing::info!(%section, "Rescanning library section");
                if let Err(e) = self.rescanner.rescan(section).await {
                    tracing::error!(%section, "Rescan failed: {:#}", e);
                }
            }
            RescanDecision::Suppressed { elapsed } => {
                tracing::debug!(%section, "Rescan suppressed, last issued {:?} ago", elapsed);
            }
        }

        decision
    }

    fn admit(&mut self, section: SectionId, now: Instant) -> RescanDecision {
        if let Some(last) = self.last_issued.get(&section) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.window {
                return RescanDecision::Suppressed { elapsed };
            }
        }

        self.last_issued.insert(section, now);
        RescanDecision::Issued
    }

    /// When `section` was last rescanned, if ever.
    #[cfg(test)]
    fn last_issued(&self, section: SectionId) -> Option<Instant> {
        self.last_issued.get(&section).copied()
    }
}

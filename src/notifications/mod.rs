//! Arrival announcements.
//!
//! [`NotificationManager`] formats one [`ArrivalMessage`] per new movie and
//! delivers it to every configured [`NotificationSink`].

pub mod slack;

pub use slack::SlackWebhook;

use crate::config::Config;
use crate::metadata::MovieRecord;
use anyhow::Result;
use futures::future::join_all;

/// Announcement for one newly arrived movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalMessage {
    pub headline: String,
    pub title_line: String,
    pub thumbnail: String,
    pub synopsis: String,
}

impl ArrivalMessage {
    pub fn new(record: &MovieRecord, library_url: &str) -> Self {
        Self {
            headline: format!(
                "New movie is now available on <{}web/index.html|Plex>",
                library_url
            ),
            title_line: format!("{} ({})", record.title, record.year),
            thumbnail: record.thumbnail.clone(),
            synopsis: record.synopsis.clone(),
        }
    }
}

/// A destination for arrival announcements.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    async fn send(&self, message: &ArrivalMessage) -> Result<()>;
}

/// Manages all notification targets (Slack webhooks, etc.)
pub struct NotificationManager {
    sinks: Vec<Box<dyn NotificationSink>>,
    library_url: String,
}

impl NotificationManager {
    pub fn new(config: &Config) -> Self {
        let sinks = config
            .slack
            .webhooks
            .iter()
            .enumerate()
            .map(|(index, url)| Box::new(SlackWebhook::new(index, url)) as Box<dyn NotificationSink>)
            .collect();

        Self::with_sinks(sinks, &config.plex_url)
    }

    pub fn with_sinks(sinks: Vec<Box<dyn NotificationSink>>, library_url: &str) -> Self {
        Self {
            sinks,
            library_url: library_url.to_string(),
        }
    }

    /// Announce a new movie to every sink concurrently.
    /// This method is fire-and-forget - errors are logged but not propagated.
    pub async fn notify_arrival(&self, record: &MovieRecord) {
        let message = ArrivalMessage::new(record, &self.library_url);

        let deliveries = self.sinks.iter().map(|sink| {
            let message = &message;
            async move {
                match sink.send(message).await {
                    Ok(()) => {
                        tracing::info!("Sent {} info to '{}'", message.title_line, sink.name());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to notify '{}': {:#}", sink.name(), e);
                    }
                }
            }
        });

        join_all(deliveries).await;
    }

    /// Check if there are any notification targets
    pub fn has_targets(&self) -> bool {
        !self.sinks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingSink {
        fail: bool,
        received: Arc<Mutex<Vec<ArrivalMessage>>>,
    }

    #[async_trait::async_trait]
    impl NotificationSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, message: &ArrivalMessage) -> Result<()> {
            self.received.lock().unwrap().push(message.clone());
            if self.fail {
                anyhow::bail!("sink down");
            }
            Ok(())
        }
    }

    fn record() -> MovieRecord {
        MovieRecord {
            title: "Matrix".into(),
            year: "1999".into(),
            thumbnail: "https://image.tmdb.org/t/p/w92/m.jpg".into(),
            synopsis: "Neo wakes up.".into(),
        }
    }

    #[test]
    fn message_layout() {
        let message = ArrivalMessage::new(&record(), "https://apps.plex.tv/");

        assert_eq!(
            message.headline,
            "New movie is now available on <https://apps.plex.tv/web/index.html|Plex>"
        );
        assert_eq!(message.title_line, "Matrix (1999)");
        assert_eq!(message.thumbnail, "https://image.tmdb.org/t/p/w92/m.jpg");
        assert_eq!(message.synopsis, "Neo wakes up.");
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_others() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let third = Arc::new(Mutex::new(Vec::new()));

        let manager = NotificationManager::with_sinks(
            vec![
                Box::new(RecordingSink { fail: false, received: first.clone() }),
                Box::new(RecordingSink { fail: true, received: second.clone() }),
                Box::new(RecordingSink { fail: false, received: third.clone() }),
            ],
            "https://apps.plex.tv/",
        );

        manager.notify_arrival(&record()).await;

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
        assert_eq!(third.lock().unwrap().len(), 1);
        assert_eq!(third.lock().unwrap()[0].title_line, "Matrix (1999)");
    }

    #[test]
    fn one_sink_per_webhook() {
        let mut config = Config::default();
        assert!(!NotificationManager::new(&config).has_targets());

        config.slack.webhooks = vec!["http://a".into(), "http://b".into()];
        let manager = NotificationManager::new(&config);
        assert_eq!(manager.sinks.len(), 2);
        assert_eq!(manager.sinks[1].name(), "slack[1]");
    }
}

//! Shared fakes for integration tests.
//!
//! Provides recording stand-ins for the external collaborators (metadata
//! lookup, notification sink, rescan command) so the watch pipeline can be
//! exercised against a real temporary directory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use reelwatch::config::{SectionId, WatchTarget};
use reelwatch::metadata::{LookupError, MetadataResolver, MovieRecord};
use reelwatch::notifications::{ArrivalMessage, NotificationManager, NotificationSink};
use reelwatch::rescan::Rescanner;
use reelwatch::scanner::{DirectoryReader, FsReader};

/// Resolver answering from a fixed title table and recording every query.
#[derive(Default)]
pub struct FakeResolver {
    known: HashMap<String, MovieRecord>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeResolver {
    pub fn knowing(titles: &[(&str, &str)]) -> Self {
        let known = titles
            .iter()
            .map(|(title, year)| {
                (
                    title.to_string(),
                    MovieRecord {
                        title: title.to_string(),
                        year: year.to_string(),
                        thumbnail: format!("https://image.tmdb.org/t/p/w92/{title}.jpg"),
                        synopsis: format!("About {title}"),
                    },
                )
            })
            .collect();
        Self {
            known,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MetadataResolver for FakeResolver {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn resolve(&self, title: &str, year: &str) -> Result<MovieRecord, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), year.to_string()));
        self.known
            .get(title)
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                title: title.to_string(),
                year: year.to_string(),
            })
    }
}

/// Sink recording every message it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub messages: Arc<Mutex<Vec<ArrivalMessage>>>,
}

#[async_trait::async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &ArrivalMessage) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

impl RecordingSink {
    pub fn titles(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.title_line.clone())
            .collect()
    }

    pub fn manager(&self) -> Arc<NotificationManager> {
        Arc::new(NotificationManager::with_sinks(
            vec![Box::new(self.clone())],
            "https://apps.plex.tv/",
        ))
    }
}

/// Rescanner recording the sections it was asked to refresh.
#[derive(Default)]
pub struct RecordingRescanner {
    sections: Mutex<Vec<SectionId>>,
}

impl RecordingRescanner {
    pub fn sections(&self) -> Vec<SectionId> {
        self.sections.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Rescanner for RecordingRescanner {
    async fn rescan(&self, section: SectionId) -> anyhow::Result<()> {
        self.sections.lock().unwrap().push(section);
        Ok(())
    }
}

/// Filesystem reader whose listings can be made to fail on demand.
#[derive(Default)]
pub struct FlakyReader {
    failing: AtomicBool,
}

impl FlakyReader {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DirectoryReader for FlakyReader {
    async fn list_entries(&self, path: &Path) -> std::io::Result<Vec<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "device not ready",
            ));
        }
        FsReader.list_entries(path).await
    }
}

pub fn target(name: &str, root: &Path, section: u32) -> WatchTarget {
    WatchTarget {
        name: name.to_string(),
        root: root.to_path_buf(),
        section: SectionId(section),
    }
}

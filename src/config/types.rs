use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Public URL of the Plex server, referenced in arrival announcements
    #[serde(default)]
    pub plex_url: String,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    /// Libraries to watch, keyed by a free-form library name
    #[serde(default)]
    pub plex: BTreeMap<String, LibraryConfig>,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub rescan: RescanConfig,
}

impl Config {
    /// One watch target per configured library, in library-name order.
    pub fn watch_targets(&self) -> Vec<WatchTarget> {
        self.plex
            .iter()
            .map(|(name, lib)| WatchTarget {
                name: name.clone(),
                root: lib.root.clone(),
                section: lib.section,
            })
            .collect()
    }
}

/// Opaque identifier of a Plex library section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SectionId(pub u32);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LibraryConfig {
    /// Directory holding one sub-folder per movie
    pub root: PathBuf,

    pub section: SectionId,
}

/// A directory to monitor together with the section it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub name: String,
    pub root: PathBuf,
    pub section: SectionId,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_tmdb_api_url")]
    pub api_url: String,

    /// Prefix joined with a result's poster path to build the thumbnail URL
    #[serde(default = "default_tmdb_image_base_url")]
    pub image_base_url: String,

    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w92".to_string()
}

fn default_request_timeout() -> u64 {
    5
}

impl TmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_tmdb_api_url(),
            image_base_url: default_tmdb_image_base_url(),
            timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SlackConfig {
    /// Incoming webhook URLs that receive every arrival announcement
    #[serde(default)]
    pub webhooks: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WatchConfig {
    /// Delay between two directory snapshots
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Minimum delay between two rescans of the same section
    #[serde(default = "default_debounce")]
    pub debounce_secs: u64,

    /// Capacity of the rescan signal queue shared by all watchers
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_debounce() -> u64 {
    5
}

fn default_channel_capacity() -> usize {
    100
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            debounce_secs: default_debounce(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RescanConfig {
    /// Shell command run for a rescan; `{section}` is replaced by the section id
    #[serde(default = "default_rescan_command")]
    pub command: String,
}

fn default_rescan_command() -> String {
    r#"sudo -u plex -E -H "$LD_LIBRARY_PATH/Plex Media Scanner" --scan --refresh --section {section}"#
        .to_string()
}

impl Default for RescanConfig {
    fn default() -> Self {
        Self {
            command: default_rescan_command(),
        }
    }
}

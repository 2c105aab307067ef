//! TMDB (The Movie Database) metadata resolver.
//!
//! Implements [`MetadataResolver`] with a single call to the TMDB v3
//! `/search/movie` endpoint. The first search result wins; there is no
//! ranking, retry, or rate limiting.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::metadata::provider::{LookupError, MetadataResolver, MovieRecord};

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    results: Vec<TmdbMovieSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    poster_path: Option<String>,
    overview: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB movie search client.
///
/// # Examples
///
/// ```no_run
/// use reelwatch::config::TmdbConfig;
/// use reelwatch::metadata::providers::TmdbProvider;
///
/// let config = TmdbConfig { api_key: "your-api-key".into(), ..Default::default() };
/// let provider = TmdbProvider::new(&config).unwrap();
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    image_base_url: String,
    timeout: Duration,
}

impl TmdbProvider {
    pub fn new(config: &TmdbConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build TMDB HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            timeout: config.timeout(),
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn search_movie(&self, title: &str, year: &str) -> Result<TmdbSearchResponse, LookupError> {
        let url = format!("{}/search/movie", self.api_url);
        debug!(title, year, "TMDB search movie");

        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title), ("year", year)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LookupError::Service(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LookupError::Service(format!(
                "HTTP response {}",
                resp.status().as_u16()
            )));
        }

        resp.json::<TmdbSearchResponse>()
            .await
            .map_err(|e| LookupError::Service(format!("failed to parse TMDB search response: {e}")))
    }
}

#[async_trait]
impl MetadataResolver for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn resolve(&self, title: &str, year: &str) -> Result<MovieRecord, LookupError> {
        let response = self.search_movie(title, year).await?;

        let first = match response.results.into_iter().next() {
            Some(first) if response.total_results > 0 => first,
            _ => {
                return Err(LookupError::NotFound {
                    title: title.to_string(),
                    year: year.to_string(),
                })
            }
        };

        Ok(MovieRecord {
            title: title.to_string(),
            year: year.to_string(),
            thumbnail: format!(
                "{}{}",
                self.image_base_url,
                first.poster_path.unwrap_or_default()
            ),
            synopsis: first.overview.unwrap_or_default(),
        })
    }
}

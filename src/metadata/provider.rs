//! Trait definition and types for metadata resolvers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata announced for a newly arrived movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub year: String,
    /// Fully-qualified poster thumbnail URL.
    pub thumbnail: String,
    pub synopsis: String,
}

/// Failure outcomes of a metadata lookup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    /// The service answered but had no match for the query.
    #[error("Couldn't find {title} ({year}) in TMDb")]
    NotFound { title: String, year: String },

    /// Transport failure, timeout, bad status or undecodable response.
    #[error("{0}")]
    Service(String),
}

/// Resolves a movie title and year to a [`MovieRecord`].
///
/// Implementations perform exactly one lookup per call and never retry.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Short, lowercase identifier for this resolver (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    async fn resolve(&self, title: &str, year: &str) -> Result<MovieRecord, LookupError>;
}

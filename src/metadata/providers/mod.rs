//! Concrete metadata resolver implementations.
//!
//! Each submodule wraps a single external API and implements the
//! [`MetadataResolver`](super::MetadataResolver) trait.

pub mod tmdb;

pub use tmdb::TmdbProvider;

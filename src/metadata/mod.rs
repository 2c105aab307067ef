//! Metadata lookup for newly detected movies.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and shared data types.
//! - [`providers`] -- Concrete resolver implementations (TMDB).

pub mod provider;
pub mod providers;

pub use provider::{LookupError, MetadataResolver, MovieRecord};
pub use providers::TmdbProvider;

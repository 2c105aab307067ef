//! Reelwatch - announces new movies in Plex libraries
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod daemon;
pub mod metadata;
pub mod notifications;
pub mod rescan;
pub mod scanner;
pub mod watch;

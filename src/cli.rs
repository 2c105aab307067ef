use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelwatch")]
#[command(author, version, about = "Announces new movies and refreshes Plex libraries")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the configured libraries until interrupted
    Start,

    /// Validate configuration file
    Validate {
        /// Config file to validate (searches the default locations if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

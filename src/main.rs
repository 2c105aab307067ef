mod cli;

use reelwatch::{config, daemon::Daemon};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tokio_util::sync::CancellationToken;

async fn start(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_from_search_path(config_path)?;

    tracing::info!("Starting reelwatch");
    tracing::info!("Watching {} libraries", config.plex.len());

    let daemon = Daemon::from_config(&config)?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutting down..."),
            Err(e) => tracing::warn!("Failed to listen for shutdown signal: {}", e),
        }
        shutdown.cancel();
    });

    daemon.run(cancel).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelwatch=trace".to_string()
        } else {
            "reelwatch=debug".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start(cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelwatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let path = config::locate_config(path, &config::default_config_paths())?;

    println!("Validating config: {:?}", path);
    let config = config::load_config(&path)?;
    println!("✓ Configuration is valid");
    println!("  Plex URL: {}", config.plex_url);
    println!("  Slack webhooks: {}", config.slack.webhooks.len());
    println!("  Libraries: {}", config.plex.len());
    if config.plex.is_empty() {
        println!("  Warning: no [plex.<name>] libraries, `start` will refuse to run");
    }
    for target in config.watch_targets() {
        println!(
            "    {} -> {} (section {})",
            target.name,
            target.root.display(),
            target.section
        );
    }
    println!("  Poll interval: {}s", config.watch.poll_interval_secs);
    println!("  Debounce window: {}s", config.watch.debounce_secs);

    Ok(())
}

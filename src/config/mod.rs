mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Candidate config locations, in search order.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = vec![
        PathBuf::from("./config.toml"),
        PathBuf::from("./reelwatch.toml"),
    ];

    // config.toml next to the binary
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join("config.toml"));
    }

    for path_str in ["~/.config/reelwatch/config.toml", "/etc/reelwatch/config.toml"] {
        paths.push(PathBuf::from(shellexpand::tilde(path_str).as_ref()));
    }

    paths
}

/// Pick the config file to use: `custom_path` when given, otherwise the first
/// existing entry of `candidates`.
pub fn locate_config(custom_path: Option<&Path>, candidates: &[PathBuf]) -> Result<PathBuf> {
    if let Some(path) = custom_path {
        return Ok(path.to_path_buf());
    }

    match candidates.iter().find(|path| path.exists()) {
        Some(path) => {
            tracing::debug!("Using config file {:?}", path);
            Ok(path.clone())
        }
        None => anyhow::bail!("No config file found (searched: {:?})", candidates),
    }
}

/// Load `custom_path`, or the first config file found in the default
/// locations. A missing config file is an error.
pub fn load_config_from_search_path(custom_path: Option<&Path>) -> Result<Config> {
    let path = locate_config(custom_path, &default_config_paths())?;
    load_config(&path)
}

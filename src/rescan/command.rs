use super::Rescanner;
use crate::config::{RescanConfig, SectionId};
use anyhow::{Context, Result};
use tokio::process::Command;

/// Runs the configured scanner command through `/bin/sh -c`, with
/// `{section}` replaced by the section id.
pub struct CommandRescanner {
    template: String,
}

impl CommandRescanner {
    pub fn new(config: &RescanConfig) -> Self {
        Self {
            template: config.command.clone(),
        }
    }

    fn command_for(&self, section: SectionId) -> String {
        self.template.replace("{section}", &section.to_string())
    }
}

#[async_trait::async_trait]
impl Rescanner for CommandRescanner {
    async fn rescan(&self, section: SectionId) -> Result<()> {
        let command = self.command_for(section);
        tracing::debug!(%section, "Executing rescan command: {}", command);

        let result = Command::new("/bin/sh")
            .arg("-c")
            .arg(&command)
            .output()
            .await
            .with_context(|| format!("Failed to execute: {}", command))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            anyhow::bail!(
                "Rescan command failed with exit code {:?}\nStderr: {}",
                result.status.code(),
                stderr
            );
        }

        tracing::debug!(
            "Rescan output: {}",
            String::from_utf8_lossy(&result.stdout)
        );
        Ok(())
    }
}

use super::{ArrivalMessage, NotificationSink};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize, PartialEq)]
struct SlackPayload<'a> {
    text: &'a str,
    attachments: Vec<SlackAttachment<'a>>,
}

#[derive(Debug, Serialize, PartialEq)]
struct SlackAttachment<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

impl<'a> From<&'a ArrivalMessage> for SlackPayload<'a> {
    fn from(message: &'a ArrivalMessage) -> Self {
        Self {
            text: &message.headline,
            attachments: vec![
                SlackAttachment {
                    title: &message.title_line,
                    image_url: Some(message.thumbnail.as_str()),
                    text: None,
                },
                SlackAttachment {
                    title: "Synopsis",
                    image_url: None,
                    text: Some(message.synopsis.as_str()),
                },
            ],
        }
    }
}

/// Slack incoming webhook.
///
/// The webhook URL is a credential: it never appears in the sink label or in
/// returned errors.
pub struct SlackWebhook {
    client: Client,
    url: String,
    label: String,
}

impl SlackWebhook {
    /// `index` is the position of the webhook in the configuration and is
    /// used as the log label.
    pub fn new(index: usize, url: &str) -> Self {
        let client = Client::builder()
            .timeout(CONNECTION_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            url: url.to_string(),
            label: format!("slack[{}]", index),
        }
    }
}

#[async_trait::async_trait]
impl NotificationSink for SlackWebhook {
    fn name(&self) -> &str {
        &self.label
    }

    async fn send(&self, message: &ArrivalMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&SlackPayload::from(message))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to reach Slack webhook")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Slack webhook rejected message ({}): {}", status, body);
        }

        Ok(())
    }
}

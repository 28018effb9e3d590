use std::time::Duration;

use {
    async_trait::async_trait, herald_canvas::RenderedCanvas, herald_common::ChannelType,
    tracing::debug,
};

use crate::{Error, Result, envelope::envelope, sender::ChannelSender};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts the channel envelope as JSON to a fixed webhook URL.
pub struct WebhookSender {
    http: reqwest::Client,
    url: String,
}

impl WebhookSender {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::external("build webhook client", e))?;
        Ok(Self::with_client(http, url))
    }

    pub fn with_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ChannelSender for WebhookSender {
    async fn send(&self, channel: ChannelType, payload: &RenderedCanvas) -> Result<()> {
        let body = envelope(channel, payload)?;
        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::external(format!("{channel} webhook request"), e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Rejected {
                channel,
                status: status.as_u16(),
                body,
            });
        }
        debug!(%channel, status = status.as_u16(), "webhook accepted");
        Ok(())
    }
}

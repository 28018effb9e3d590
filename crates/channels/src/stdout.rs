use {
    async_trait::async_trait,
    herald_canvas::RenderedCanvas,
    herald_common::ChannelType,
    std::io::Write,
};

use crate::{Result, envelope::envelope, sender::ChannelSender};

/// Prints each envelope as pretty JSON on stdout, for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSender;

#[async_trait]
impl ChannelSender for StdoutSender {
    async fn send(&self, channel: ChannelType, payload: &RenderedCanvas) -> Result<()> {
        let body = envelope(channel, payload)?;
        let pretty = serde_json::to_string_pretty(&body)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "── {channel} ──")?;
        writeln!(out, "{pretty}")?;
        Ok(())
    }
}

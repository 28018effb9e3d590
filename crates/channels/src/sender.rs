use {async_trait::async_trait, herald_canvas::RenderedCanvas, herald_common::ChannelType};

use crate::Result;

/// Transmit a rendered canvas to one chat platform.
///
/// Implementations own their transport and timeouts; callers never impose
/// one and treat any error as a failure of this channel only.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, channel: ChannelType, payload: &RenderedCanvas) -> Result<()>;
}

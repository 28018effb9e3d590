//! Render a briefing once per channel and hand it to that channel's sender.
//!
//! Sends run one after another in configuration order. A failed channel is
//! logged and skipped; the rest are still attempted.

use std::sync::Arc;

use {
    herald_canvas::render,
    herald_channels::{Error as ChannelError, SenderRegistry},
    herald_common::ChannelType,
    tracing::{error, info, warn},
};

use crate::{aggregator::Composer, kind::BriefingKind};

/// What happened to one dispatch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<ChannelType>,
    pub failed: Vec<(ChannelType, String)>,
    /// Set when the canvas could not be built; no channel was attempted.
    pub aggregation_error: Option<String>,
}

impl DispatchReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.aggregation_error.is_none() && self.failed.is_empty()
    }
}

pub struct Dispatcher {
    composer: Arc<dyn Composer>,
    senders: SenderRegistry,
    channels: Vec<ChannelType>,
}

impl Dispatcher {
    pub fn new(
        composer: Arc<dyn Composer>,
        senders: SenderRegistry,
        channels: Vec<ChannelType>,
    ) -> Self {
        Self {
            composer,
            senders,
            channels,
        }
    }

    pub fn channels(&self) -> &[ChannelType] {
        &self.channels
    }

    /// Compose the `kind` briefing and deliver it. Never fails; the report
    /// says which channels got it.
    pub async fn dispatch(&self, kind: BriefingKind) -> DispatchReport {
        let mut report = DispatchReport::default();

        let canvas = match self.composer.compose(kind).await {
            Ok(canvas) => canvas,
            Err(e) => {
                error!(%kind, error = %e, "briefing generation failed");
                report.aggregation_error = Some(e.to_string());
                return report;
            },
        };
        info!(%kind, channels = self.channels.len(), "dispatching briefing");

        for &channel in &self.channels {
            let Some(sender) = self.senders.get(channel) else {
                let e = ChannelError::MissingSender { channel };
                warn!(%kind, %channel, error = %e, "failed to send briefing");
                report.failed.push((channel, e.to_string()));
                continue;
            };

            let payload = render(channel, &canvas);
            match sender.send(channel, &payload).await {
                Ok(()) => {
                    info!(%kind, %channel, "briefing sent");
                    report.delivered.push(channel);
                },
                Err(e) => {
                    warn!(%kind, %channel, error = %e, "failed to send briefing");
                    report.failed.push((channel, e.to_string()));
                },
            }
        }

        report
    }
}

use std::{collections::HashMap, sync::Arc};

use herald_common::ChannelType;

use crate::sender::ChannelSender;

/// Senders keyed by channel. At most one sender per channel.
#[derive(Clone, Default)]
pub struct SenderRegistry {
    senders: HashMap<ChannelType, Arc<dyn ChannelSender>>,
}

impl SenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sender` for `channel`, replacing any previous one.
    pub fn register(&mut self, channel: ChannelType, sender: Arc<dyn ChannelSender>) {
        self.senders.insert(channel, sender);
    }

    #[must_use]
    pub fn with(mut self, channel: ChannelType, sender: Arc<dyn ChannelSender>) -> Self {
        self.register(channel, sender);
        self
    }

    pub fn get(&self, channel: ChannelType) -> Option<&dyn ChannelSender> {
        self.senders.get(&channel).map(|s| s.as_ref())
    }

    /// Registered channels in enumeration order.
    pub fn list(&self) -> Vec<ChannelType> {
        let mut channels: Vec<_> = self.senders.keys().copied().collect();
        channels.sort();
        channels
    }
}

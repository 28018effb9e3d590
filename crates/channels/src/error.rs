use std::error::Error as StdError;

use herald_common::ChannelType;

/// Crate-wide result type for send operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed send errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload family does not fit the channel's wire format.
    #[error("invalid payload for {channel}: {message}")]
    InvalidPayload {
        channel: ChannelType,
        message: String,
    },

    /// No sender is registered for an enabled channel.
    #[error("no sender registered for {channel}")]
    MissingSender { channel: ChannelType },

    /// The platform answered with a non-success status.
    #[error("{channel} send failed ({status}): {body}")]
    Rejected {
        channel: ChannelType,
        status: u16,
        body: String,
    },

    /// Wrapped source error from an external dependency.
    #[error("send failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_payload(channel: ChannelType, message: impl std::fmt::Display) -> Self {
        Self::InvalidPayload {
            channel,
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

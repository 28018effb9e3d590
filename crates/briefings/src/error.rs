use thiserror::Error;

use crate::kind::BriefingKind;

#[derive(Debug, Error)]
pub enum Error {
    /// Building the canvas failed; nothing was sent.
    #[error("{kind} briefing aggregation failed: {message}")]
    Aggregation { kind: BriefingKind, message: String },

    #[error("invalid time '{time}': expected HH:MM")]
    InvalidTime { time: String },

    #[error("unknown briefing kind: {name}")]
    UnknownKind { name: String },

    #[error(transparent)]
    Cron(#[from] herald_cron::Error),
}

impl Error {
    #[must_use]
    pub fn aggregation(kind: BriefingKind, message: impl std::fmt::Display) -> Self {
        Self::Aggregation {
            kind,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

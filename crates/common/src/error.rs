use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A channel name outside the closed [`crate::ChannelType`] set.
    #[error("unsupported channel: {name}")]
    UnsupportedChannel { name: String },
}

impl Error {
    #[must_use]
    pub fn unsupported_channel(name: impl Into<String>) -> Self {
        Self::UnsupportedChannel { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

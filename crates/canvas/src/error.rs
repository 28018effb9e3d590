use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("section index {index} out of range (canvas has {len} sections)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unsupported channel: {channel}")]
    UnsupportedChannel { channel: String },
}

impl From<herald_common::Error> for Error {
    fn from(err: herald_common::Error) -> Self {
        match err {
            herald_common::Error::UnsupportedChannel { name } => {
                Self::UnsupportedChannel { channel: name }
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

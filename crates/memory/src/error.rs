use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response. The status code is part of the message so retry
    /// predicates that inspect text can see it.
    #[error("API error: {status} {reason}")]
    Api { status: u16, reason: String },

    #[error("API call failed after {attempts} attempt(s): {last_error}")]
    ApiCallFailed {
        attempts: u32,
        #[source]
        last_error: Box<Error>,
    },

    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// The error that ended a retried call, or `self` otherwise.
    #[must_use]
    pub fn last_error(&self) -> &Error {
        match self {
            Self::ApiCallFailed { last_error, .. } => last_error,
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

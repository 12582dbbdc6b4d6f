use thiserror::Error;

/// Generic text shown when a failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Failures from a provider call.
///
/// A search with zero matches is not an error; providers normalize it to an
/// empty result set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{message}")]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("{0}")]
    Business(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ProviderError {
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Network { .. } => "network",
            Self::Business(_) => "provider",
            Self::Cancelled => "cancelled",
        }
    }

    /// HTTP status attached to a network failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }

    /// Only transport failures may succeed on a retry with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Text for display. Falls back to [`GENERIC_ERROR_MESSAGE`] when blank.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::InvalidArgument(m) | Self::Business(m) => m.clone(),
            Self::Network { message, .. } => message.clone(),
            Self::Cancelled => self.to_string(),
        };
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Startup-time configuration failure. Fatal; never raised per request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

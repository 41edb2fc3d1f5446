use serde::Serialize;

/// Error taxonomy for the console.
///
/// Every error is scoped to the action that raised it; nothing here is fatal
/// to the process. Retries are always user-initiated.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ConsoleError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    /// Message suitable for display to the operator.
    ///
    /// Internal errors return a generic message to avoid leaking
    /// implementation details; everything else carries the real cause.
    pub fn user_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal error".to_string(),
            Self::Network(_) => "Network error; please try again".to_string(),
            _ => self.to_string(),
        }
    }

    /// True when retrying the same action without changes could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Service(_))
    }
}

impl From<validator::ValidationErrors> for ConsoleError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConsoleError::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ConsoleError::Internal(format!("Malformed service response: {}", err))
        } else {
            ConsoleError::Network(err.to_string())
        }
    }
}

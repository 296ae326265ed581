use reqwest::StatusCode;
use std::io;
use thiserror::Error;

pub type GenResult<T> = std::result::Result<T, GenError>;

/// Main error type for script generation
#[derive(Error, Debug)]
pub enum GenError {
    /// The GenerationConfig failed validation; recoverable by fixing the input
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request timed out
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Unexpected HTTP status code from the model API
    #[error("unexpected status {0}: {1}")]
    UnexpectedStatus(StatusCode, String),

    /// Rate limit exceeded
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// Authentication error
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Provider-specific error
    #[error("provider error: {0}")]
    Provider(String),

    /// Model not found or not available
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The model answered with no usable candidate text
    #[error("model returned an empty response")]
    EmptyResponse,

    /// Environment variable error
    #[error("missing environment variable: {0}")]
    EnvVar(#[from] EnvVarError),

    // Automatic conversions for common external error types
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Environment variable error
#[derive(Debug)]
pub struct EnvVarError {
    /// Name of the environment variable that is missing
    pub var: String,
    /// Optional instructions to help the user get a valid value
    pub instructions: Option<String>,
}

impl std::fmt::Display for EnvVarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing environment variable: `{}`", self.var)?;
        if let Some(instructions) = &self.instructions {
            write!(f, ". {}", instructions)?;
        }
        Ok(())
    }
}

impl std::error::Error for EnvVarError {}

impl GenError {
    /// Check if the error is retryable by the caller
    pub fn is_retryable(&self) -> bool {
        match self {
            GenError::Timeout(_) => true,
            GenError::RateLimit(_) => true,
            GenError::EmptyResponse => true,
            GenError::UnexpectedStatus(status, _) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Check if the error is a client error (should not retry)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GenError::InvalidConfig(_)
                | GenError::Authentication(_)
                | GenError::ModelNotFound(_)
                | GenError::EnvVar(_)
        )
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            GenError::UnexpectedStatus(status, _) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_client_error_not_retryable() {
        let err = GenError::InvalidConfig("task description must not be empty".into());
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn rate_limit_and_server_errors_are_retryable() {
        assert!(GenError::RateLimit("quota exhausted".into()).is_retryable());
        let err = GenError::UnexpectedStatus(StatusCode::BAD_GATEWAY, String::new());
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), Some(StatusCode::BAD_GATEWAY));
    }
}

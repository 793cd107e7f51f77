use std::time::Duration;
use thiserror::Error;

/// Coarse classification shown to the user next to every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Timeout,
    Connection,
    Http,
    Decode,
    RemoteApi,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Connection => "connection",
            ErrorCategory::Http => "http",
            ErrorCategory::Decode => "decode",
            ErrorCategory::RemoteApi => "remote_api",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Credentials or endpoint settings are missing. The deployment has to be fixed.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The user has to fix the input.
    #[error("invalid input: {message}")]
    Validation { message: String },

    #[error("contact API did not answer within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("could not reach contact API: {source}")]
    Connection {
        #[source]
        source: reqwest::Error,
    },

    #[error("contact API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("could not decode contact API response: {message}")]
    Decode { message: String },

    #[error("contact API reported an error: {message}")]
    RemoteApi { message: String },
}

impl ApiError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ApiError::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Configuration { .. } => ErrorCategory::Configuration,
            ApiError::Validation { .. } => ErrorCategory::Validation,
            ApiError::Timeout { .. } => ErrorCategory::Timeout,
            ApiError::Connection { .. } => ErrorCategory::Connection,
            ApiError::Http { .. } => ErrorCategory::Http,
            ApiError::Decode { .. } => ErrorCategory::Decode,
            ApiError::RemoteApi { .. } => ErrorCategory::RemoteApi,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

//! Failure taxonomy for a prediction round-trip and its user-facing wording.

use shared::error::ContractViolation;
use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "Prediction failed";
pub const CONTRACT_FAILURE_MESSAGE: &str = "Prediction service returned an unexpected response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Server,
    Contract,
    LocalRead,
    Config,
}

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The call could not complete: unreachable host, timeout, or a body
    /// that is not JSON at all.
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("prediction service returned HTTP {status}")]
    Server { status: u16, detail: Option<String> },
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error("could not read {filename}: {reason}")]
    LocalRead { filename: String, reason: String },
    #[error("invalid server url '{0}'")]
    InvalidServerUrl(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Server { .. } => ErrorCategory::Server,
            Self::Contract(_) => ErrorCategory::Contract,
            Self::LocalRead { .. } => ErrorCategory::LocalRead,
            Self::InvalidServerUrl(_) => ErrorCategory::Config,
        }
    }

    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::Server { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            Self::Contract(_) => CONTRACT_FAILURE_MESSAGE.to_string(),
            Self::LocalRead { filename, reason } => format!("Could not read {filename}: {reason}"),
            Self::InvalidServerUrl(url) => format!("Invalid server URL: {url}"),
        }
    }
}

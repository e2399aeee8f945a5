//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ClientError, ErrorCategory, SubmissionTicket};
use shared::protocol::PredictionResult;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    PredictionFinished {
        ticket: SubmissionTicket,
        outcome: Result<PredictionResult, ClientError>,
    },
    HealthChecked(Result<String, ClientError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Local,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Predict,
    HealthCheck,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Unknown,
            context,
            message: message.into(),
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err.category() {
            ErrorCategory::Transport => UiErrorCategory::Transport,
            ErrorCategory::Server => UiErrorCategory::Server,
            ErrorCategory::Contract | ErrorCategory::Config => UiErrorCategory::Validation,
            ErrorCategory::LocalRead => UiErrorCategory::Local,
        };
        let message = match context {
            UiErrorContext::HealthCheck => {
                format!("Prediction service unreachable: {err}")
            }
            UiErrorContext::BackendStartup | UiErrorContext::Predict => err.user_message(),
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Server => "Service",
        UiErrorCategory::Validation => "Invalid response",
        UiErrorCategory::Local => "File",
        UiErrorCategory::Unknown => "Error",
    }
}

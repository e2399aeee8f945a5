use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the prediction service sends with a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorDetail {
    /// Parses a failure body leniently. Anything that is not an object with a
    /// string `detail` yields `None`.
    pub fn detail_from_body(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorDetail>(body)
            .ok()
            .and_then(|parsed| parsed.detail)
            .filter(|detail| !detail.trim().is_empty())
    }
}

/// A 2xx body that does not satisfy the prediction contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("malformed prediction body: {0}")]
    Malformed(String),
    #[error("rul must be a finite number, got {0}")]
    InvalidRul(f64),
}

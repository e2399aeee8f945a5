use serde::{Deserialize, Serialize};

use crate::{
    domain::{HealthStatus, SeverityColor},
    error::ContractViolation,
};

pub const PREDICT_PATH: &str = "/predict";
pub const HEALTH_PATH: &str = "/health";
/// Multipart field carrying the raw CSV bytes.
pub const UPLOAD_FIELD: &str = "file";
pub const CSV_MIME: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub rul: f64,
    pub status: HealthStatus,
    pub color: SeverityColor,
    pub cycles_analyzed: u64,
    pub rows_received: u64,
    #[serde(default)]
    pub last_cycle: Option<i64>,
}

impl PredictionResult {
    /// Decodes and validates an already-parsed success body. Unknown
    /// `status`/`color` values and missing fields are rejected here rather
    /// than rendered.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ContractViolation> {
        let parsed: PredictionResult = serde_json::from_value(value)
            .map_err(|err| ContractViolation::Malformed(err.to_string()))?;
        parsed.validated()
    }

    pub fn validated(self) -> Result<Self, ContractViolation> {
        // Engines past end of life come back negative; the gauge clamps them.
        if !self.rul.is_finite() {
            return Err(ContractViolation::InvalidRul(self.rul));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

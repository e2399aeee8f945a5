use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    error::ErrorDetail,
    protocol::{HealthResponse, PredictionResult, CSV_MIME, HEALTH_PATH, PREDICT_PATH, UPLOAD_FIELD},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod controller;
pub mod error;
pub mod interpret;
pub mod upload;

pub use config::{load_settings, Settings};
pub use controller::{Completion, Phase, SubmissionController, SubmissionState, SubmissionTicket};
pub use error::{ClientError, ErrorCategory};
pub use interpret::{interpret, DisplayAttributes, GaugeScale, StatusIcon};
pub use upload::{CsvUpload, SelectedFile};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote collaborator that turns an uploaded sensor log into a verdict.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, upload: CsvUpload) -> Result<PredictionResult, ClientError>;
}

/// HTTP client for the prediction service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    server_url: String,
}

impl PredictionClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(server_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        Self::with_timeout(&settings.server_url, settings.request_timeout())
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        config::validate_server_url(server_url)
            .map_err(|_| ClientError::InvalidServerUrl(server_url.to_string()))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            server_url: server_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Url::parse(&format!("{}{path}", self.server_url))
            .map_err(|_| ClientError::InvalidServerUrl(self.server_url.clone()))
    }

    /// Connectivity probe against `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                detail: ErrorDetail::detail_from_body(&body),
            });
        }
        serde_json::from_slice(&body)
            .map_err(|err| ClientError::Transport(format!("invalid health response: {err}")))
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(&self, upload: CsvUpload) -> Result<PredictionResult, ClientError> {
        let url = self.endpoint(PREDICT_PATH)?;
        let size_bytes = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename.clone())
            .mime_str(CSV_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(%url, filename = %upload.filename, size_bytes, "posting sensor log");
        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = ErrorDetail::detail_from_body(&body);
            warn!(status = status.as_u16(), detail = ?detail, "prediction service rejected upload");
            return Err(ClientError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let value: serde_json::Value = serde_json::from_slice(&body).map_err(|err| {
            ClientError::Transport(format!("prediction response is not valid JSON: {err}"))
        })?;
        let result = PredictionResult::from_value(value)?;
        info!(
            filename = %upload.filename,
            rul = result.rul,
            status = result.status.as_str(),
            color = result.color.as_str(),
            "prediction received"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

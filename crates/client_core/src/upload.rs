use std::path::{Path, PathBuf};

use crate::error::ClientError;

/// A file chosen by the user. Only the path is held; bytes are read when a
/// submission is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
    display_name: String,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, display_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Picker hint only. Content is validated by the prediction service.
    pub fn has_csv_suffix(&self) -> bool {
        has_csv_suffix(&self.display_name)
    }

    pub async fn read(&self) -> Result<CsvUpload, ClientError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|err| ClientError::LocalRead {
                filename: self.display_name.clone(),
                reason: err.to_string(),
            })?;
        Ok(CsvUpload::new(self.display_name.clone(), bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl CsvUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

pub fn has_csv_suffix(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

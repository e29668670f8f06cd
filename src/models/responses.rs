use serde::{Deserialize, Serialize};
use crate::models::domain::ScreenshotAnalysisResult;

/// Metadata about an accepted screenshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Response for the upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub file: UploadedFile,
    pub analysis: ScreenshotAnalysisResult,
    pub next: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "remoteModel")]
    pub remote_model: bool,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

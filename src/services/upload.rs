use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

use crate::config::UploadSettings;
use crate::models::{ScreenshotInput, UploadRequest, UploadedFile};
use crate::services::claude::{data_url_mime_type, strip_base64_prefix};

/// Errors raised while validating an uploaded screenshot
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload requires a non-empty image")]
    MissingImage,

    #[error("Unsupported image type '{0}'. Please upload png, jpg, jpeg, webp, heic, or heif files.")]
    UnsupportedType(String),

    #[error("Screenshot must be <= {max_bytes} bytes (got {size})")]
    InvalidSize { size: usize, max_bytes: usize },

    #[error("Image data is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

impl UploadError {
    /// HTTP status the route should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::MissingImage | UploadError::InvalidEncoding(_) => 400,
            UploadError::UnsupportedType(_) => 415,
            UploadError::InvalidSize { .. } => 413,
        }
    }
}

/// An upload that passed validation
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    pub file: UploadedFile,
    pub input: ScreenshotInput,
}

/// Validate an upload request and normalise it into analyzer input
///
/// Checks, in order: declared MIME type (the `mimeType` field, else the
/// data URL prefix), base64 payload, decoded size.
pub fn accept_upload(
    request: &UploadRequest,
    settings: &UploadSettings,
) -> Result<AcceptedUpload, UploadError> {
    let raw = request.image_base64.trim();
    if raw.is_empty() {
        return Err(UploadError::MissingImage);
    }

    let declared = request
        .mime_type
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or_else(|| data_url_mime_type(raw))
        .map(str::to_lowercase);

    if let Some(mime) = &declared {
        if !settings.is_allowed(mime) {
            return Err(UploadError::UnsupportedType(mime.clone()));
        }
    }

    let payload = strip_base64_prefix(raw);
    let bytes = STANDARD.decode(payload)?;

    if bytes.is_empty() {
        return Err(UploadError::MissingImage);
    }
    if bytes.len() > settings.max_bytes {
        return Err(UploadError::InvalidSize {
            size: bytes.len(),
            max_bytes: settings.max_bytes,
        });
    }

    let name = request
        .file_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "screenshot".to_string());

    let mime_type = infer_mime_type(declared.as_deref(), &name);

    tracing::debug!("Accepted upload {} ({} bytes, {})", name, bytes.len(), mime_type);

    Ok(AcceptedUpload {
        input: ScreenshotInput {
            image_data_url: format!("data:{};base64,{}", mime_type, payload),
            filename: request.file_name.clone(),
        },
        file: UploadedFile {
            name,
            size: bytes.len(),
            mime_type,
        },
    })
}

/// Resolve the image type: the already-validated declared type, else the
/// file extension
fn infer_mime_type(declared: Option<&str>, file_name: &str) -> String {
    if let Some(mime) = declared {
        return mime.to_string();
    }

    let lower = file_name.to_lowercase();
    let from_extension = match lower.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "image/png",
    };
    from_extension.to_string()
}

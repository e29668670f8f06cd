// Service exports
pub mod claude;
pub mod upload;

pub use claude::{parse_model_response, ClaudeClient, ClaudeError, RemoteModelAnalyzer};
pub use upload::{accept_upload, AcceptedUpload, UploadError};

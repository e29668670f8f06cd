// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ConfidenceLevel, ConversationMessage, Impact, MessageInsight, ModelInfo, ModelProvider,
    RomanticAnalysis, ScreenshotAnalysisResult, ScreenshotInput, Sender,
};
pub use requests::{IncomingMessage, ScoreConversationRequest, UploadRequest};
pub use responses::{ErrorResponse, HealthResponse, UploadResponse, UploadedFile};

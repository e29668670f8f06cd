use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{ConversationMessage, Sender};

/// Screenshot upload request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadRequest {
    #[validate(length(max = 255))]
    #[serde(alias = "filename", rename = "fileName", default)]
    pub file_name: Option<String>,
    #[validate(length(max = 64))]
    #[serde(alias = "mime_type", rename = "mimeType", default)]
    pub mime_type: Option<String>,
    /// Data URL or bare base64 payload
    #[validate(length(min = 1))]
    #[serde(alias = "image_base64", rename = "imageBase64", default)]
    pub image_base64: String,
}

/// Message as submitted by a client; the id is optional
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub sender: Sender,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Request to score an already-parsed conversation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreConversationRequest {
    #[validate(length(max = 500))]
    pub conversation: Vec<IncomingMessage>,
    #[validate(length(max = 255))]
    #[serde(alias = "filename", rename = "fileName", default)]
    pub file_name: Option<String>,
}

impl ScoreConversationRequest {
    /// Convert into scorer input, assigning positional ids where missing
    pub fn into_messages(self) -> Vec<ConversationMessage> {
        self.conversation
            .into_iter()
            .enumerate()
            .map(|(index, entry)| ConversationMessage {
                id: entry.id.unwrap_or_else(|| index.to_string()),
                sender: entry.sender,
                text: entry.text,
                timestamp: entry.timestamp,
            })
            .collect()
    }
}

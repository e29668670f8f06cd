use serde::{Deserialize, Serialize};

/// Conversation participant
///
/// `PersonA` is the texter whose interest is being evaluated ("Target"),
/// `PersonB` is the user reviewing the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    PersonA,
    PersonB,
}

/// Effect of a single message on perceived romantic momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Helped,
    Neutral,
    Hurt,
}

/// Coarse certainty label, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// A single message extracted from a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ConversationMessage {
    pub fn new(id: impl Into<String>, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender,
            text: text.into(),
            timestamp: None,
        }
    }
}

/// Per-message classification produced by the keyword classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInsight {
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub sender: Sender,
    pub impact: Impact,
    pub explanation: String,
    pub confidence: ConfidenceLevel,
}

/// Which backend produced an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Claude,
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: ModelProvider,
    pub version: String,
}

/// Aggregate romantic interest analysis for one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomanticAnalysis {
    #[serde(rename = "parsedMessages")]
    pub parsed_messages: Vec<ConversationMessage>,
    #[serde(rename = "romanticInterestScore")]
    pub romantic_interest_score: u8,
    pub confidence: ConfidenceLevel,
    pub summary: String,
    #[serde(rename = "messageInsights")]
    pub message_insights: Vec<MessageInsight>,
    pub suggestions: Vec<String>,
    pub model: ModelInfo,
}

/// Outer envelope returned by every analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotAnalysisResult {
    pub analysis: RomanticAnalysis,
    #[serde(rename = "queryContextId")]
    pub query_context_id: String,
}

/// Screenshot handed to an analyzer, already validated by the upload layer
#[derive(Debug, Clone)]
pub struct ScreenshotInput {
    /// `data:<mime>;base64,<payload>` URL
    pub image_data_url: String,
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_wire_format() {
        assert_eq!(serde_json::to_string(&Sender::PersonA).unwrap(), "\"personA\"");
        let sender: Sender = serde_json::from_str("\"personB\"").unwrap();
        assert_eq!(sender, Sender::PersonB);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium < ConfidenceLevel::High);
        assert_eq!(serde_json::to_string(&ConfidenceLevel::High).unwrap(), "\"High\"");
    }

    #[test]
    fn test_message_without_timestamp_omits_field() {
        let message = ConversationMessage::new("0", Sender::PersonA, "hi");
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("timestamp").is_none());
        assert_eq!(json["sender"], "personA");
    }
}

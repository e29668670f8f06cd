use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClaudeSettings;
use crate::core::{Analyzer, AnalyzerError};
use crate::models::{ScreenshotAnalysisResult, ScreenshotInput};

/// Errors that can occur when calling the Claude Messages API
#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("Claude API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Claude API error: {status} {body}")]
    ApiError { status: u16, body: String },
}

impl From<ClaudeError> for AnalyzerError {
    fn from(err: ClaudeError) -> Self {
        AnalyzerError::Remote(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Text { text: &'static str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

/// Claude Messages API client
///
/// Sends a screenshot together with the analysis prompt and returns the raw
/// text the model produced.
pub struct ClaudeClient {
    api_url: String,
    api_key: String,
    model: String,
    anthropic_version: String,
    max_tokens: u32,
    client: Client,
}

impl ClaudeClient {
    /// Create a new client from settings
    pub fn new(settings: &ClaudeSettings) -> Result<Self, ClaudeError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ClaudeError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
            anthropic_version: settings.anthropic_version.clone(),
            max_tokens: settings.max_tokens,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a screenshot and return the model's raw text answer
    pub async fn analyze_screenshot(&self, image_data_url: &str) -> Result<String, ClaudeError> {
        let media_type = extract_mime_type(image_data_url);
        let data = strip_base64_prefix(image_data_url);

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: 0.0,
            system: build_prompt(&self.model),
            messages: vec![RequestMessage {
                role: "user",
                content: vec![
                    ContentBlock::Text {
                        text: "Please analyze this screenshot and return the JSON result.",
                    },
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type,
                            data,
                        },
                    },
                ],
            }],
        };

        tracing::debug!("Calling Claude model {} ({} bytes of image data)", self.model, data.len());

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.anthropic_version)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Claude API returned {}: {}", status, body);
            return Err(ClaudeError::ApiError { status, body });
        }

        let json: Value = response.json().await?;
        Ok(extract_text(&json))
    }
}

/// First text block of a Messages API response, or the whole body when there is none
fn extract_text(json: &Value) -> String {
    let text = json
        .get("content")
        .and_then(|c| c.as_array())
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
        })
        .and_then(|block| block.get("text"))
        .and_then(|t| t.as_str())
        .map(str::trim)
        .unwrap_or_default();

    if text.is_empty() {
        json.to_string()
    } else {
        text.to_string()
    }
}

fn build_prompt(model: &str) -> String {
    format!(
        r#"You are a texting coach. Analyze the provided screenshot that represents a text conversation.
Return ONLY valid JSON that matches this TypeScript schema:
{{
  "analysis": {{
    "parsedMessages": {{ "id": string, "sender": "personA" | "personB", "text": string }}[],
    "romanticInterestScore": number, // 0-100 integer
    "confidence": "Low" | "Medium" | "High",
    "summary": string,
    "messageInsights": {{
      "messageId": string,
      "sender": "personA" | "personB",
      "impact": "helped" | "neutral" | "hurt",
      "explanation": string,
      "confidence": "Low" | "Medium" | "High"
    }}[],
    "suggestions": string[],
    "model": {{ "provider": "claude", "version": "{model}" }}
  }},
  "queryContextId": string
}}

Person A is the texter whose romantic interest is being evaluated, and Person B is the other participant (the user reviewing this analysis).
Whenever you refer to Person A in any part of the response, call them "Target".
Whenever you refer to Person B, speak directly using second-person pronouns (you/your).
Focus on whether Target shows romantic interest toward you.
Respond with raw JSON only, without markdown fences or commentary.
"#
    )
}

/// Media type named by a `data:` URL prefix, if any
pub fn data_url_mime_type(data_url: &str) -> Option<&str> {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
}

/// Media type of a `data:` URL, defaulting to PNG
pub fn extract_mime_type(data_url: &str) -> &str {
    data_url_mime_type(data_url).unwrap_or("image/png")
}

/// Payload of a `data:` URL; bare base64 is returned unchanged
pub fn strip_base64_prefix(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .unwrap_or(data_url)
}

/// Parse model output into an analysis result
///
/// Accepts raw JSON, optionally wrapped in a markdown code fence. The result
/// must carry `analysis.parsedMessages`; the score is clamped to 0-100.
pub fn parse_model_response(raw: &str) -> Result<ScreenshotAnalysisResult, AnalyzerError> {
    let body = strip_code_fence(raw.trim());

    let mut value: Value = serde_json::from_str(body)
        .map_err(|e| AnalyzerError::Unparseable(format!("invalid JSON: {}", e)))?;

    let analysis = value
        .get_mut("analysis")
        .and_then(|a| a.as_object_mut())
        .ok_or_else(|| AnalyzerError::Unparseable("missing analysis object".into()))?;

    if !analysis.get("parsedMessages").map_or(false, Value::is_array) {
        return Err(AnalyzerError::Unparseable("missing analysis.parsedMessages".into()));
    }

    // Models occasionally return fractional or out-of-range scores
    if let Some(score) = analysis.get("romanticInterestScore").and_then(Value::as_f64) {
        let clamped = score.clamp(0.0, 100.0).round() as u64;
        analysis.insert("romanticInterestScore".to_string(), Value::from(clamped));
    }

    serde_json::from_value(value)
        .map_err(|e| AnalyzerError::Unparseable(format!("unexpected shape: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    // drop an optional language tag on the opening line
    let inner = match inner.split_once('\n') {
        Some((_tag, rest)) => rest,
        None => inner,
    };
    inner.trim_end().strip_suffix("```").unwrap_or(inner).trim()
}

/// Analyzer that delegates to the Claude vision model
pub struct RemoteModelAnalyzer {
    client: ClaudeClient,
}

impl RemoteModelAnalyzer {
    pub fn new(client: ClaudeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Analyzer for RemoteModelAnalyzer {
    fn name(&self) -> &'static str {
        "claude"
    }

    async fn analyze(&self, input: &ScreenshotInput) -> Result<ScreenshotAnalysisResult, AnalyzerError> {
        let raw = self.client.analyze_screenshot(&input.image_data_url).await?;
        let result = parse_model_response(&raw)?;

        tracing::info!(
            "Claude scored {:?} at {} ({} messages)",
            input.filename,
            result.analysis.romantic_interest_score,
            result.analysis.parsed_messages.len()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ClaudeSettings {
        ClaudeSettings {
            api_key: Some("test_key".to_string()),
            ..ClaudeSettings::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ClaudeClient::new(&settings()).unwrap();
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.model(), ClaudeSettings::default().model);
    }

    #[test]
    fn test_client_requires_key() {
        let mut s = settings();
        s.api_key = Some("  ".to_string());
        assert!(matches!(ClaudeClient::new(&s), Err(ClaudeError::MissingApiKey)));
    }

    #[test]
    fn test_data_url_helpers() {
        let url = "data:image/jpeg;base64,QUJD";
        assert_eq!(extract_mime_type(url), "image/jpeg");
        assert_eq!(strip_base64_prefix(url), "QUJD");

        assert_eq!(extract_mime_type("QUJD"), "image/png");
        assert_eq!(data_url_mime_type("QUJD"), None);
        assert_eq!(data_url_mime_type("data:image/gif;base64,R0lG"), Some("image/gif"));
        assert_eq!(strip_base64_prefix("QUJD"), "QUJD");
    }

    #[test]
    fn test_extract_text_prefers_text_block() {
        let json = serde_json::json!({
            "content": [
                { "type": "tool_use", "id": "x" },
                { "type": "text", "text": "  {\"a\": 1}  " }
            ]
        });
        assert_eq!(extract_text(&json), "{\"a\": 1}");

        let no_text = serde_json::json!({ "content": [] });
        assert_eq!(extract_text(&no_text), no_text.to_string());
    }

    #[test]
    fn test_prompt_names_model() {
        let prompt = build_prompt("some-model");
        assert!(prompt.contains("\"version\": \"some-model\""));
        assert!(prompt.contains("\"Target\""));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_rejects_missing_messages() {
        let err = parse_model_response(r#"{"analysis": {"summary": "x"}, "queryContextId": "q"}"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::Unparseable(_)));

        assert!(parse_model_response("not json").is_err());
    }
}

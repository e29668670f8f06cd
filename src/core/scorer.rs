use crate::core::{
    classifier::classify_message,
    keywords::KeywordTables,
    scoring::{calculate_interest_score, coaching_suggestions, conversation_confidence, summarize, ScoringParams},
};
use crate::models::{
    ConversationMessage, ModelInfo, ModelProvider, RomanticAnalysis, ScreenshotAnalysisResult, Sender,
};

/// Context identifier stamped on heuristic results
pub const MOCK_CONTEXT_ID: &str = "mock-context";
const MOCK_VERSION: &str = "mock-v1";

/// Deterministic fallback scorer
///
/// # Pipeline
/// 1. Keyword classification of each message
/// 2. Summing positive and negative hits across the conversation
/// 3. Linear score, clamped to 0-100
/// 4. Confidence, summary and suggestions
///
/// Holds only immutable configuration, so a single instance can be shared
/// across request handlers.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    tables: KeywordTables,
    params: ScoringParams,
}

impl HeuristicScorer {
    pub fn new(tables: KeywordTables, params: ScoringParams) -> Self {
        Self { tables, params }
    }

    pub fn with_defaults() -> Self {
        Self::new(KeywordTables::default(), ScoringParams::default())
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// Score a conversation
    ///
    /// Never fails: an empty conversation yields the baseline score with
    /// `Low` confidence and no insights.
    ///
    /// # Arguments
    /// * `messages` - Parsed conversation, in display order
    /// * `filename_hint` - Name of the uploaded screenshot, used for the model version stamp
    pub fn score_conversation(
        &self,
        messages: &[ConversationMessage],
        filename_hint: Option<&str>,
    ) -> RomanticAnalysis {
        let mut positive_count = 0usize;
        let mut negative_count = 0usize;

        let message_insights: Vec<_> = messages
            .iter()
            .map(|message| {
                let (insight, hits) = classify_message(message, &self.tables);
                positive_count += hits.positive;
                negative_count += hits.negative;
                tracing::trace!(
                    "Message {} hits: positive={}, curious={}, negative={}, supportive={}",
                    message.id,
                    hits.positive,
                    hits.curious,
                    hits.negative,
                    hits.supportive
                );
                insight
            })
            .collect();

        let score = calculate_interest_score(positive_count, negative_count, &self.params);

        tracing::debug!(
            "Heuristic score {} from {} messages (positive={}, negative={})",
            score,
            messages.len(),
            positive_count,
            negative_count
        );

        RomanticAnalysis {
            parsed_messages: messages.to_vec(),
            romantic_interest_score: score,
            confidence: conversation_confidence(messages.len()),
            summary: summarize(score).to_string(),
            message_insights,
            suggestions: coaching_suggestions(),
            model: ModelInfo {
                provider: ModelProvider::Mock,
                version: mock_version(filename_hint),
            },
        }
    }

    /// Score a conversation and wrap it in the outer result envelope
    pub fn score_to_result(
        &self,
        messages: &[ConversationMessage],
        filename_hint: Option<&str>,
    ) -> ScreenshotAnalysisResult {
        ScreenshotAnalysisResult {
            analysis: self.score_conversation(messages, filename_hint),
            query_context_id: MOCK_CONTEXT_ID.to_string(),
        }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn mock_version(filename_hint: Option<&str>) -> String {
    match filename_hint.map(str::trim) {
        Some(name) if !name.is_empty() => format!("mock-from-{}", name),
        _ => MOCK_VERSION.to_string(),
    }
}

/// Built-in demo conversation used when no real conversation was extracted
pub fn fallback_conversation() -> Vec<ConversationMessage> {
    vec![
        ConversationMessage::new("0", Sender::PersonA, "Hey! Had an awesome time last night 😊"),
        ConversationMessage::new("1", Sender::PersonB, "Same! Still thinking about those tacos haha"),
        ConversationMessage::new(
            "2",
            Sender::PersonA,
            "We should do another adventure soon, maybe the night market?",
        ),
        ConversationMessage::new("3", Sender::PersonB, "That sounds fun, I am free Friday after 7!"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfidenceLevel, Impact};

    #[test]
    fn test_empty_conversation() {
        let scorer = HeuristicScorer::with_defaults();
        let analysis = scorer.score_conversation(&[], None);

        assert_eq!(analysis.romantic_interest_score, 55);
        assert_eq!(analysis.confidence, ConfidenceLevel::Low);
        assert!(analysis.message_insights.is_empty());
        assert!(analysis.parsed_messages.is_empty());
        assert_eq!(analysis.suggestions.len(), 3);
    }

    #[test]
    fn test_fallback_conversation_scores_79() {
        let scorer = HeuristicScorer::with_defaults();
        let analysis = scorer.score_conversation(&fallback_conversation(), None);

        assert_eq!(analysis.romantic_interest_score, 79);
        assert_eq!(analysis.confidence, ConfidenceLevel::Medium);
        assert!(analysis
            .message_insights
            .iter()
            .all(|insight| insight.impact == Impact::Helped));
    }

    #[test]
    fn test_model_version_from_filename() {
        let scorer = HeuristicScorer::with_defaults();

        let named = scorer.score_conversation(&[], Some("chat.png"));
        assert_eq!(named.model.provider, ModelProvider::Mock);
        assert_eq!(named.model.version, "mock-from-chat.png");

        let blank = scorer.score_conversation(&[], Some("   "));
        assert_eq!(blank.model.version, "mock-v1");

        let missing = scorer.score_conversation(&[], None);
        assert_eq!(missing.model.version, "mock-v1");
    }

    #[test]
    fn test_result_envelope() {
        let scorer = HeuristicScorer::with_defaults();
        let result = scorer.score_to_result(&fallback_conversation(), Some("x.jpg"));
        assert_eq!(result.query_context_id, MOCK_CONTEXT_ID);
        assert_eq!(result.analysis.parsed_messages, fallback_conversation());
    }

    #[test]
    fn test_custom_tables_change_outcome() {
        let tables = KeywordTables::new(&["tacos"], &["?"], &["night"], &["glad"]).unwrap();
        let scorer = HeuristicScorer::new(tables, ScoringParams::default());
        let analysis = scorer.score_conversation(&fallback_conversation(), None);

        // "tacos" once, "night" twice
        assert_eq!(analysis.romantic_interest_score, 49);
    }
}

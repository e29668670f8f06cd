//! Cupid Score - conversation screenshot analysis service
//!
//! Screenshots are analysed by a remote vision model. When that call is
//! unavailable or returns something unusable, a deterministic keyword
//! heuristic scores the conversation instead.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{fallback_conversation, Analyzer, FallbackAnalyzer, HeuristicAnalyzer, HeuristicScorer, KeywordTables, ScoringParams};
pub use crate::models::{ConversationMessage, MessageInsight, RomanticAnalysis, ScreenshotAnalysisResult, Sender};
pub use crate::services::RemoteModelAnalyzer;

/// Score a conversation with the default keyword tables and parameters
pub fn score_conversation(messages: &[ConversationMessage], filename_hint: Option<&str>) -> RomanticAnalysis {
    HeuristicScorer::with_defaults().score_conversation(messages, filename_hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let analysis = score_conversation(&fallback_conversation(), None);
        assert_eq!(analysis.romantic_interest_score, 79);
    }
}

// Core algorithm exports
pub mod analyzer;
pub mod classifier;
pub mod keywords;
pub mod scorer;
pub mod scoring;

pub use analyzer::{Analyzer, AnalyzerError, FallbackAnalyzer, HeuristicAnalyzer};
pub use classifier::{classify_message, message_confidence};
pub use keywords::{KeywordError, KeywordHits, KeywordTables};
pub use scorer::{fallback_conversation, HeuristicScorer, MOCK_CONTEXT_ID};
pub use scoring::{calculate_interest_score, conversation_confidence, summarize, ScoringParams};

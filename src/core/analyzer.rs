use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::core::scorer::{fallback_conversation, HeuristicScorer};
use crate::models::{ScreenshotAnalysisResult, ScreenshotInput};

/// Errors an analyzer can report
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Remote model call failed: {0}")]
    Remote(String),

    #[error("Model output could not be parsed: {0}")]
    Unparseable(String),
}

/// Capability to turn a screenshot into an analysis
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn analyze(&self, input: &ScreenshotInput) -> Result<ScreenshotAnalysisResult, AnalyzerError>;
}

/// Analyzer backed by the keyword heuristic
///
/// A screenshot cannot be read without the remote model, so this scores the
/// built-in demo conversation and stamps the result with the filename.
#[derive(Debug, Clone)]
pub struct HeuristicAnalyzer {
    scorer: Arc<HeuristicScorer>,
}

impl HeuristicAnalyzer {
    pub fn new(scorer: Arc<HeuristicScorer>) -> Self {
        Self { scorer }
    }

    pub fn analyze_now(&self, input: &ScreenshotInput) -> ScreenshotAnalysisResult {
        self.scorer
            .score_to_result(&fallback_conversation(), input.filename.as_deref())
    }
}

#[async_trait]
impl Analyzer for HeuristicAnalyzer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn analyze(&self, input: &ScreenshotInput) -> Result<ScreenshotAnalysisResult, AnalyzerError> {
        Ok(self.analyze_now(input))
    }
}

/// Tries the primary analyzer and falls back to the heuristic on any failure
#[derive(Clone)]
pub struct FallbackAnalyzer {
    primary: Option<Arc<dyn Analyzer>>,
    fallback: HeuristicAnalyzer,
}

impl FallbackAnalyzer {
    pub fn new(primary: Option<Arc<dyn Analyzer>>, fallback: HeuristicAnalyzer) -> Self {
        Self { primary, fallback }
    }

    pub fn heuristic_only(fallback: HeuristicAnalyzer) -> Self {
        Self::new(None, fallback)
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Run the analysis; always produces a result
    pub async fn run(&self, input: &ScreenshotInput) -> ScreenshotAnalysisResult {
        if let Some(primary) = &self.primary {
            match primary.analyze(input).await {
                Ok(result) => {
                    tracing::info!("Analysis produced by {} analyzer", primary.name());
                    return result;
                }
                Err(e) => {
                    tracing::warn!(
                        "{} analyzer failed, falling back to heuristic: {}",
                        primary.name(),
                        e
                    );
                }
            }
        } else {
            tracing::debug!("No remote analyzer configured, using heuristic");
        }

        self.fallback.analyze_now(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scorer::MOCK_CONTEXT_ID;
    use crate::models::{ModelInfo, ModelProvider};

    struct FailingAnalyzer;

    #[async_trait]
    impl Analyzer for FailingAnalyzer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn analyze(&self, _input: &ScreenshotInput) -> Result<ScreenshotAnalysisResult, AnalyzerError> {
            Err(AnalyzerError::Remote("connection refused".into()))
        }
    }

    struct CannedAnalyzer(ScreenshotAnalysisResult);

    #[async_trait]
    impl Analyzer for CannedAnalyzer {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn analyze(&self, _input: &ScreenshotInput) -> Result<ScreenshotAnalysisResult, AnalyzerError> {
            Ok(self.0.clone())
        }
    }

    fn input() -> ScreenshotInput {
        ScreenshotInput {
            image_data_url: "data:image/png;base64,AAAA".to_string(),
            filename: Some("chat.png".to_string()),
        }
    }

    fn heuristic() -> HeuristicAnalyzer {
        HeuristicAnalyzer::new(Arc::new(HeuristicScorer::with_defaults()))
    }

    #[test]
    fn test_heuristic_analyzer_uses_demo_conversation() {
        let result = tokio_test::block_on(heuristic().analyze(&input())).unwrap();
        assert_eq!(result.query_context_id, MOCK_CONTEXT_ID);
        assert_eq!(result.analysis.parsed_messages.len(), 4);
        assert_eq!(result.analysis.romantic_interest_score, 79);
        assert_eq!(result.analysis.model.version, "mock-from-chat.png");
    }

    #[test]
    fn test_fallback_on_primary_failure() {
        let analyzer = FallbackAnalyzer::new(Some(Arc::new(FailingAnalyzer)), heuristic());
        let result = tokio_test::block_on(analyzer.run(&input()));
        assert_eq!(result.analysis.model.provider, ModelProvider::Mock);
    }

    #[test]
    fn test_primary_result_preferred() {
        let mut canned = heuristic().analyze_now(&input());
        canned.query_context_id = "remote-ctx".to_string();
        canned.analysis.model = ModelInfo {
            provider: ModelProvider::Claude,
            version: "test-model".to_string(),
        };

        let analyzer = FallbackAnalyzer::new(Some(Arc::new(CannedAnalyzer(canned))), heuristic());
        let result = tokio_test::block_on(analyzer.run(&input()));
        assert_eq!(result.query_context_id, "remote-ctx");
        assert_eq!(result.analysis.model.provider, ModelProvider::Claude);
    }

    #[test]
    fn test_heuristic_only() {
        let analyzer = FallbackAnalyzer::heuristic_only(heuristic());
        assert!(!analyzer.has_primary());
        let result = tokio_test::block_on(analyzer.run(&input()));
        assert_eq!(result.analysis.romantic_interest_score, 79);
    }
}

use crate::models::ConfidenceLevel;

pub const SUMMARY_ENCOURAGING: &str = "Target is sending encouraging signals. Their replies carry warmth and they keep the conversation moving toward you.";
pub const SUMMARY_MIXED: &str = "Signals are mixed. Target is engaged and friendly, but the warmth has not clearly tipped toward romance yet.";
pub const SUMMARY_LOW_WARMTH: &str = "Warmth looks low right now. Target's replies read as polite or distant rather than romantically invested.";

/// Coaching suggestions returned with every heuristic analysis
pub const COACHING_SUGGESTIONS: [&str; 3] = [
    "Ask an open-ended question about something Target mentioned to keep the thread going.",
    "Match Target's energy: mirror their message length and emoji use instead of over-investing.",
    "Suggest a specific plan with a day and time so interest can turn into a real date.",
];

/// Linear scoring parameters
///
/// score = baseline + (positive_hits - negative_hits) * step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub baseline: f64,
    pub step: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            baseline: 55.0,
            step: 6.0,
        }
    }
}

/// Calculate the romantic interest score (0-100) from summed keyword hits
pub fn calculate_interest_score(
    positive_count: usize,
    negative_count: usize,
    params: &ScoringParams,
) -> u8 {
    let net = positive_count as f64 - negative_count as f64;
    let base_score = params.baseline + net * params.step;

    // NaN from a degenerate config lands on the lower bound
    let clamped = if base_score.is_nan() {
        0.0
    } else {
        base_score.clamp(0.0, 100.0)
    };

    clamped.round() as u8
}

/// Aggregate confidence from the number of messages
#[inline]
pub fn conversation_confidence(message_count: usize) -> ConfidenceLevel {
    if message_count >= 8 {
        ConfidenceLevel::High
    } else if message_count >= 4 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Pick the summary sentence for a score band
#[inline]
pub fn summarize(score: u8) -> &'static str {
    if score >= 70 {
        SUMMARY_ENCOURAGING
    } else if score >= 50 {
        SUMMARY_MIXED
    } else {
        SUMMARY_LOW_WARMTH
    }
}

pub fn coaching_suggestions() -> Vec<String> {
    COACHING_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

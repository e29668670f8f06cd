use crate::core::keywords::{KeywordHits, KeywordTables};
use crate::models::{ConfidenceLevel, ConversationMessage, Impact, MessageInsight, Sender};

pub const EXPLAIN_WARMTH: &str = "Positive language and warmth keeps momentum.";
pub const EXPLAIN_CURIOSITY: &str = "Follow-up questions show interest and investment.";
pub const EXPLAIN_DISTANCING: &str = "Hesitation or distancing language lowers momentum.";
pub const EXPLAIN_NEUTRAL: &str = "This message maintains tone without major impact.";

/// Classify a single message into an impact category
///
/// Rules are evaluated in order and the first match wins:
/// 1. warmth: positive + supportive hits outweigh negative hits, with at least one positive hit
/// 2. curiosity: the reviewing user (`PersonB`) asked a question
/// 3. distancing: negative hits outweigh positive hits
/// 4. otherwise neutral
///
/// Returns the insight together with the raw hit counts so the aggregator
/// does not have to scan the text a second time.
pub fn classify_message(
    message: &ConversationMessage,
    tables: &KeywordTables,
) -> (MessageInsight, KeywordHits) {
    let hits = tables.count_hits(&message.text);
    let (impact, explanation) = decide_impact(message.sender, &hits);

    let insight = MessageInsight {
        message_id: message.id.clone(),
        sender: message.sender,
        impact,
        explanation: explanation.to_string(),
        confidence: message_confidence(&message.text),
    };

    (insight, hits)
}

#[inline]
fn decide_impact(sender: Sender, hits: &KeywordHits) -> (Impact, &'static str) {
    if hits.positive + hits.supportive > hits.negative && hits.positive > 0 {
        (Impact::Helped, EXPLAIN_WARMTH)
    } else if sender == Sender::PersonB && hits.curious > 0 {
        (Impact::Helped, EXPLAIN_CURIOSITY)
    } else if hits.negative > hits.positive {
        (Impact::Hurt, EXPLAIN_DISTANCING)
    } else {
        (Impact::Neutral, EXPLAIN_NEUTRAL)
    }
}

/// Per-message confidence from text length in characters
///
/// Length stands in for effort; it is not a statistical measure.
#[inline]
pub fn message_confidence(text: &str) -> ConfidenceLevel {
    let length = text.chars().count();
    if length > 40 {
        ConfidenceLevel::High
    } else if length > 15 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: Sender, text: &str) -> ConversationMessage {
        ConversationMessage::new("m", sender, text)
    }

    #[test]
    fn test_warmth_helps() {
        let (insight, hits) = classify_message(&msg(Sender::PersonA, "so excited!!"), &KeywordTables::default());
        assert_eq!(insight.impact, Impact::Helped);
        assert_eq!(insight.explanation, EXPLAIN_WARMTH);
        assert_eq!(hits.positive, 1);
    }

    #[test]
    fn test_supportive_without_positive_is_not_warmth() {
        let (insight, _) = classify_message(&msg(Sender::PersonA, "proud of you"), &KeywordTables::default());
        assert_eq!(insight.impact, Impact::Neutral);
    }

    #[test]
    fn test_supportive_tips_balance() {
        // one positive, one negative, one supportive
        let (insight, _) = classify_message(
            &msg(Sender::PersonA, "sorry, glad it was fun"),
            &KeywordTables::default(),
        );
        assert_eq!(insight.impact, Impact::Helped);
    }

    #[test]
    fn test_curiosity_only_counts_for_person_b() {
        let tables = KeywordTables::default();

        let (from_b, _) = classify_message(&msg(Sender::PersonB, "what are you up to"), &tables);
        assert_eq!(from_b.impact, Impact::Helped);
        assert_eq!(from_b.explanation, EXPLAIN_CURIOSITY);

        let (from_a, _) = classify_message(&msg(Sender::PersonA, "what are you up to"), &tables);
        assert_eq!(from_a.impact, Impact::Neutral);
    }

    #[test]
    fn test_distancing_hurts() {
        let (insight, _) = classify_message(&msg(Sender::PersonA, "busy this week, idk"), &KeywordTables::default());
        assert_eq!(insight.impact, Impact::Hurt);
        assert_eq!(insight.explanation, EXPLAIN_DISTANCING);
    }

    #[test]
    fn test_dismissive_reply_is_not_curiosity() {
        let (insight, hits) = classify_message(&msg(Sender::PersonB, "whatever"), &KeywordTables::default());
        assert_eq!(hits.curious, 0);
        assert_eq!(hits.negative, 1);
        assert_eq!(insight.impact, Impact::Hurt);

        let (insight, _) = classify_message(&msg(Sender::PersonB, "show me how"), &KeywordTables::default());
        assert_eq!(insight.impact, Impact::Neutral);
    }

    #[test]
    fn test_tie_is_neutral() {
        let (insight, hits) = classify_message(&msg(Sender::PersonA, "fun but busy"), &KeywordTables::default());
        assert_eq!(hits.positive, 1);
        assert_eq!(hits.negative, 1);
        assert_eq!(insight.impact, Impact::Neutral);
    }

    #[test]
    fn test_length_confidence_boundaries() {
        assert_eq!(message_confidence(&"a".repeat(15)), ConfidenceLevel::Low);
        assert_eq!(message_confidence(&"a".repeat(16)), ConfidenceLevel::Medium);
        assert_eq!(message_confidence(&"a".repeat(40)), ConfidenceLevel::Medium);
        assert_eq!(message_confidence(&"a".repeat(41)), ConfidenceLevel::High);
        assert_eq!(message_confidence(""), ConfidenceLevel::Low);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 16 emoji are 64 bytes but only 16 characters
        assert_eq!(message_confidence(&"😊".repeat(16)), ConfidenceLevel::Medium);
    }
}

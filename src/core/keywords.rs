use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while building keyword tables
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("Keyword set '{0}' is empty")]
    EmptySet(&'static str),

    #[error("Keyword '{keyword}' in '{first}' overlaps '{other}' in '{second}'")]
    Overlap {
        keyword: String,
        other: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Failed to read keyword file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid keyword file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Raw table definition as written in a TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
struct KeywordFile {
    positive: Vec<String>,
    curious: Vec<String>,
    negative: Vec<String>,
    supportive: Vec<String>,
}

/// The four disjoint keyword sets used by the classifier
///
/// Keywords are stored lower-cased and matched as plain substrings of the
/// lower-cased message text. Since matching is by substring, no keyword may
/// contain (or be contained in) a keyword of another set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTables {
    positive: Vec<String>,
    curious: Vec<String>,
    negative: Vec<String>,
    supportive: Vec<String>,
}

/// Keyword hit counts for one message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub positive: usize,
    pub curious: usize,
    pub negative: usize,
    pub supportive: usize,
}

const DEFAULT_POSITIVE: &[&str] = &[
    "great", "cute", "love", "miss", "soon", "excited", "fun", "haha", "😊",
];
const DEFAULT_CURIOUS: &[&str] = &[
    "?", "maybe", "what's", "what are", "what do", "how's", "how are", "how was", "when", "where",
    "tell me", "wyd",
];
const DEFAULT_NEGATIVE: &[&str] = &[
    "busy", "idk", "not sure", "later", "tired", "sorry", "nah", "whatever", "can't",
];
const DEFAULT_SUPPORTIVE: &[&str] = &[
    "proud", "you got this", "glad", "happy for you", "sounds good", "of course", "no worries",
];

impl KeywordTables {
    /// Build validated tables: every set non-empty, no keyword of one set
    /// contained in a keyword of another
    pub fn new<S: AsRef<str>>(
        positive: &[S],
        curious: &[S],
        negative: &[S],
        supportive: &[S],
    ) -> Result<Self, KeywordError> {
        let tables = Self {
            positive: normalize("positive", positive)?,
            curious: normalize("curious", curious)?,
            negative: normalize("negative", negative)?,
            supportive: normalize("supportive", supportive)?,
        };
        tables.check_disjoint()?;
        Ok(tables)
    }

    /// Parse tables from a TOML document with `positive`, `curious`,
    /// `negative` and `supportive` string arrays
    pub fn from_toml_str(source: &str) -> Result<Self, KeywordError> {
        let file: KeywordFile = toml::from_str(source)?;
        Self::new(
            &file.positive[..],
            &file.curious[..],
            &file.negative[..],
            &file.supportive[..],
        )
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, KeywordError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn positive(&self) -> &[String] {
        &self.positive
    }

    /// Count keyword hits of every set in `text`
    pub fn count_hits(&self, text: &str) -> KeywordHits {
        let lowered = text.to_lowercase();
        KeywordHits {
            positive: count_in(&lowered, &self.positive),
            curious: count_in(&lowered, &self.curious),
            negative: count_in(&lowered, &self.negative),
            supportive: count_in(&lowered, &self.supportive),
        }
    }

    fn sets(&self) -> [(&'static str, &[String]); 4] {
        [
            ("positive", self.positive.as_slice()),
            ("curious", self.curious.as_slice()),
            ("negative", self.negative.as_slice()),
            ("supportive", self.supportive.as_slice()),
        ]
    }

    fn check_disjoint(&self) -> Result<(), KeywordError> {
        let sets = self.sets();
        for (i, (first, words)) in sets.iter().enumerate() {
            for (second, others) in &sets[i + 1..] {
                for keyword in words.iter() {
                    let overlapping = others
                        .iter()
                        .find(|o| o.contains(keyword.as_str()) || keyword.contains(o.as_str()));
                    if let Some(other) = overlapping {
                        return Err(KeywordError::Overlap {
                            keyword: keyword.clone(),
                            other: other.clone(),
                            first: *first,
                            second: *second,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for KeywordTables {
    fn default() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            positive: owned(DEFAULT_POSITIVE),
            curious: owned(DEFAULT_CURIOUS),
            negative: owned(DEFAULT_NEGATIVE),
            supportive: owned(DEFAULT_SUPPORTIVE),
        }
    }
}

fn normalize<S: AsRef<str>>(name: &'static str, words: &[S]) -> Result<Vec<String>, KeywordError> {
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    for word in words {
        let word = word.as_ref().trim().to_lowercase();
        if !word.is_empty() && !out.contains(&word) {
            out.push(word);
        }
    }
    if out.is_empty() {
        return Err(KeywordError::EmptySet(name));
    }
    Ok(out)
}

#[inline]
fn count_in(haystack: &str, keywords: &[String]) -> usize {
    keywords.iter().map(|k| haystack.matches(k.as_str()).count()).sum()
}

use std::collections::BTreeMap;

use crate::config::FallbackSettings;
use crate::domain::MergedResult;
use crate::sentinel::is_insufficient_information;

pub const DEFAULT_MIN_WORDS: usize = 8;

pub const DEFAULT_FALLBACK_RESPONSE: &str = "I'm happy to play along.

since the context is empty, i'll answer the question directly:
I am an AI designed to simulate human-like conversations and provide information on a wide range of topics. I don't have personal experiences, emotions, or physical presence, but I'm here to help answer your questions and engage in discussions to the best of my abilities.";

/// Final gate between the merged result and what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    min_words: usize,
    response: String,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WORDS, DEFAULT_FALLBACK_RESPONSE)
    }
}

impl FallbackPolicy {
    pub fn new(min_words: usize, response: impl Into<String>) -> Self {
        Self {
            min_words,
            response: response.into(),
        }
    }

    pub fn from_settings(settings: &FallbackSettings) -> Self {
        Self::new(settings.min_words, settings.response.clone())
    }

    /// Short inputs without a document never reach the backend.
    pub fn should_short_circuit(&self, raw_user_input: Option<&str>, document_present: bool) -> bool {
        !document_present && word_count(raw_user_input.unwrap_or("")) < self.min_words
    }

    /// Resolve the string shown to the user. Pure: makes no backend calls.
    pub fn resolve(
        &self,
        merged: &MergedResult,
        raw_user_input: Option<&str>,
        document_present: bool,
    ) -> String {
        self.decide(merged, raw_user_input, document_present).answer
    }

    /// Like [`Self::resolve`], also reporting whether the canned response was used.
    pub fn decide(
        &self,
        merged: &MergedResult,
        raw_user_input: Option<&str>,
        document_present: bool,
    ) -> Resolution {
        if self.should_short_circuit(raw_user_input, document_present) {
            return self.canned();
        }
        match merged {
            _ if merged.is_empty() => self.canned(),
            MergedResult::QaAnswer(text) if is_insufficient_information(text) => self.canned(),
            MergedResult::AbbreviationIndex(map) => Resolution::merged(render_index(map)),
            MergedResult::QaAnswer(text) => Resolution::merged(text.clone()),
            MergedResult::Empty => self.canned(),
        }
    }

    pub fn canned(&self) -> Resolution {
        Resolution {
            answer: self.response.clone(),
            fallback_used: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub fallback_used: bool,
}

impl Resolution {
    fn merged(answer: String) -> Self {
        Self {
            answer,
            fallback_used: false,
        }
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `KEY = VALUE` lines in key order.
pub fn render_index(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(k, v)| format!("{k} = {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_without_document_short_circuits() {
        let policy = FallbackPolicy::default();
        let merged = MergedResult::QaAnswer("a real answer".to_string());
        assert_eq!(
            policy.resolve(&merged, Some("what is this thing"), false),
            DEFAULT_FALLBACK_RESPONSE
        );
        assert_eq!(policy.resolve(&merged, None, false), DEFAULT_FALLBACK_RESPONSE);
    }

    #[test]
    fn short_question_with_document_is_not_short_circuited() {
        let policy = FallbackPolicy::default();
        let merged = MergedResult::QaAnswer("42".to_string());
        assert_eq!(policy.resolve(&merged, Some("why?"), true), "42");
    }

    #[test]
    fn threshold_is_exclusive() {
        let policy = FallbackPolicy::new(3, "canned");
        assert!(policy.should_short_circuit(Some("one two"), false));
        assert!(!policy.should_short_circuit(Some("one two three"), false));
    }

    #[test]
    fn sentinel_answer_falls_back() {
        let policy = FallbackPolicy::new(8, "canned");
        let merged = MergedResult::QaAnswer(
            "I don't have enough information in the document to answer that.".to_string(),
        );
        assert_eq!(policy.resolve(&merged, None, true), "canned");
        assert_eq!(policy.resolve(&MergedResult::Empty, None, true), "canned");
        assert_eq!(
            policy.resolve(&MergedResult::AbbreviationIndex(BTreeMap::new()), None, true),
            "canned"
        );
    }

    #[test]
    fn answer_equal_to_canned_text_is_not_a_fallback() {
        let policy = FallbackPolicy::new(8, "canned");
        let echoed = policy.decide(&MergedResult::QaAnswer("canned".to_string()), None, true);
        assert_eq!(echoed.answer, "canned");
        assert!(!echoed.fallback_used);

        let empty = policy.decide(&MergedResult::Empty, None, true);
        assert!(empty.fallback_used);
    }

    #[test]
    fn index_renders_sorted_lines() {
        let mut map = BTreeMap::new();
        map.insert("ML".to_string(), "Machine Learning".to_string());
        map.insert("AI".to_string(), "Artificial Intelligence".to_string());
        let policy = FallbackPolicy::default();
        assert_eq!(
            policy.resolve(&MergedResult::AbbreviationIndex(map), None, true),
            "AI = Artificial Intelligence\nML = Machine Learning"
        );
    }
}

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Exact reply the abbreviation prompt asks for when a chunk has no abbreviations.
pub const NO_ABBREVIATIONS_SENTINEL: &str = "NO_ABBREVIATIONS_FOUND";

/// Exact reply the QA prompt asks for when the context cannot answer the question.
pub const INSUFFICIENT_INFORMATION_SENTINEL: &str =
    "I don't have enough information in the document to answer that.";

/// One page or logical line of an extracted document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextUnit {
    pub sequence_index: u32,
    pub content: String,
}

impl TextUnit {
    pub fn new(sequence_index: u32, content: impl Into<String>) -> Self {
        Self {
            sequence_index,
            content: content.into(),
        }
    }
}

/// A contiguous run of text units submitted to the backend as one unit of work.
///
/// Notes:
/// - `source_units` holds the `sequence_index` of every unit folded into `text`.
/// - `text_sha256` identifies the chunk in logs without echoing document text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub index: u32,
    pub text: String,
    pub source_units: Vec<u32>,
    pub text_sha256: String,
    pub char_count: u32,
}

impl Chunk {
    /// First 12 hex chars of the text digest, for log fields.
    pub fn short_hash(&self) -> &str {
        let end = self.text_sha256.len().min(12);
        &self.text_sha256[..end]
    }
}

/// Stateless request for one chunk under one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmRequest {
    pub task_prompt: String,
    pub chunk_text: String,
}

/// Backend failure taxonomy. Every provider error collapses into one of these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum BackendFailure {
    Transient(String),
    Permanent(String),
}

impl BackendFailure {
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendFailure::Transient(_))
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendFailure::Transient(d) => write!(f, "transient backend failure: {d}"),
            BackendFailure::Permanent(d) => write!(f, "permanent backend failure: {d}"),
        }
    }
}

impl std::error::Error for BackendFailure {}

/// Per-chunk outcome of one backend call.
///
/// `NoResult` is the domain-level "nothing found" outcome and is distinct from
/// the two transport failure variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum LlmResult {
    Success(String),
    NoResult,
    TransientFailure(String),
    PermanentFailure(String),
}

impl LlmResult {
    pub fn success_text(&self) -> Option<&str> {
        match self {
            LlmResult::Success(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LlmResult::TransientFailure(_) | LlmResult::PermanentFailure(_)
        )
    }
}

impl From<BackendFailure> for LlmResult {
    fn from(failure: BackendFailure) -> Self {
        match failure {
            BackendFailure::Transient(d) => LlmResult::TransientFailure(d),
            BackendFailure::Permanent(d) => LlmResult::PermanentFailure(d),
        }
    }
}

/// Which reduction the merger applies to a run's results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Abbreviation,
    Qa,
    Chat,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Abbreviation => "abbreviation",
            TaskKind::Qa => "qa",
            TaskKind::Chat => "chat",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbbreviationEntry {
    pub key: String,
    pub value: String,
}

/// Reduced output of one pipeline run.
///
/// An index with zero entries is never constructed; the merger returns `Empty` instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MergedResult {
    AbbreviationIndex(BTreeMap<String, String>),
    QaAnswer(String),
    Empty,
}

impl MergedResult {
    pub fn is_empty(&self) -> bool {
        match self {
            MergedResult::Empty => true,
            MergedResult::AbbreviationIndex(map) => map.is_empty(),
            MergedResult::QaAnswer(text) => text.trim().is_empty(),
        }
    }

    /// Index entries in key order; empty for non-index results.
    pub fn entries(&self) -> Vec<AbbreviationEntry> {
        match self {
            MergedResult::AbbreviationIndex(map) => map
                .iter()
                .map(|(k, v)| AbbreviationEntry {
                    key: k.clone(),
                    value: v.clone(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{AbbreviationEntry, LlmResult, MergedResult, TaskKind};
use crate::sentinel::{is_any_sentinel, is_insufficient_information, is_no_abbreviations};

/// How many QA answers survive the merge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QaMergeMode {
    /// First chunk (in document order) with a usable answer.
    #[default]
    FirstAnswer,
    /// Every usable answer in document order, separated by a blank line.
    Concatenate,
}

pub fn merge(results: &[LlmResult], kind: TaskKind, qa_mode: QaMergeMode) -> MergedResult {
    match kind {
        TaskKind::Abbreviation => merge_abbreviations(results),
        TaskKind::Qa => merge_qa(results, qa_mode),
        TaskKind::Chat => merge_chat(results),
    }
}

/// Fold every `KEY = VALUE` / `KEY: VALUE` line of every successful result into
/// one index. Later chunks overwrite earlier definitions of the same key.
pub fn merge_abbreviations(results: &[LlmResult]) -> MergedResult {
    let mut index: BTreeMap<String, String> = BTreeMap::new();
    for (chunk_index, result) in results.iter().enumerate() {
        let Some(text) = result.success_text() else {
            continue;
        };
        for line in text.lines() {
            match parse_abbreviation_line(line) {
                Some(entry) => {
                    if let Some(prev) = index.insert(entry.key.clone(), entry.value) {
                        tracing::debug!(chunk_index, key = %entry.key, previous = %prev, "abbreviation redefined");
                    }
                }
                None => {
                    if !line.trim().is_empty() {
                        tracing::debug!(chunk_index, "skipped malformed abbreviation line");
                    }
                }
            }
        }
    }
    if index.is_empty() {
        MergedResult::Empty
    } else {
        MergedResult::AbbreviationIndex(index)
    }
}

/// Parse one model output line. The separator is whichever of `=` or `:` comes
/// first; a leading list bullet is dropped.
pub fn parse_abbreviation_line(line: &str) -> Option<AbbreviationEntry> {
    let line = line.trim();
    if line.is_empty() || is_no_abbreviations(line) {
        return None;
    }
    let pos = line.find(|c: char| c == '=' || c == ':')?;
    let (raw_key, rest) = line.split_at(pos);
    let value = rest[1..].trim();
    let key = raw_key
        .trim()
        .trim_start_matches(|c: char| c == '•' || c == '-' || c == '*' || c == '·')
        .trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some(AbbreviationEntry {
        key: key.to_string(),
        value: value.to_string(),
    })
}

pub fn merge_qa(results: &[LlmResult], mode: QaMergeMode) -> MergedResult {
    let mut answers = results
        .iter()
        .filter_map(LlmResult::success_text)
        .map(str::trim)
        .filter(|t| !t.is_empty() && !is_insufficient_information(t));

    match mode {
        QaMergeMode::FirstAnswer => match answers.next() {
            Some(a) => MergedResult::QaAnswer(a.to_string()),
            None => MergedResult::Empty,
        },
        QaMergeMode::Concatenate => {
            let all: Vec<&str> = answers.collect();
            if all.is_empty() {
                MergedResult::Empty
            } else {
                MergedResult::QaAnswer(all.join("\n\n"))
            }
        }
    }
}

pub fn merge_chat(results: &[LlmResult]) -> MergedResult {
    results
        .iter()
        .filter_map(LlmResult::success_text)
        .map(str::trim)
        .find(|t| !t.is_empty() && !is_any_sentinel(t))
        .map(|t| MergedResult::QaAnswer(t.to_string()))
        .unwrap_or(MergedResult::Empty)
}

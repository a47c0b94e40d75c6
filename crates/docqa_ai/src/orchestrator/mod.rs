use std::time::Duration;

use docqa_core::config::OrchestratorSettings;
use docqa_core::domain::{BackendFailure, Chunk, LlmResult};
use serde::{Deserialize, Serialize};

use crate::llm::Llm;
use crate::task::Task;

mod pacer;

pub use pacer::Pacer;

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorOptions {
    pub min_call_interval: Duration,
    pub temperature: f32,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::from_settings(&OrchestratorSettings::default())
    }
}

impl OrchestratorOptions {
    pub fn from_settings(settings: &OrchestratorSettings) -> Self {
        Self {
            min_call_interval: Duration::from_millis(settings.min_call_interval_ms),
            temperature: settings.temperature,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transient,
    Permanent,
}

/// A chunk whose backend call failed and was absorbed as `NoResult`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkFailure {
    pub chunk_index: u32,
    pub kind: FailureKind,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RunOutcome {
    /// One entry per chunk, in chunk order. Never contains failure variants.
    pub results: Vec<LlmResult>,
    pub failures: Vec<ChunkFailure>,
    pub calls: u32,
}

/// Interpret one backend outcome under `task`, keeping failures visible.
pub fn classify(task: &Task, outcome: Result<String, BackendFailure>) -> LlmResult {
    match outcome {
        Ok(text) if text.trim().is_empty() || task.is_sentinel(&text) => LlmResult::NoResult,
        Ok(text) => LlmResult::Success(text),
        Err(failure) => LlmResult::from(failure),
    }
}

/// Degrade-gracefully policy: a failed chunk contributes nothing.
pub fn absorb(result: LlmResult) -> LlmResult {
    match result {
        LlmResult::TransientFailure(_) | LlmResult::PermanentFailure(_) => LlmResult::NoResult,
        other => other,
    }
}

/// Drives chunks through the backend one call at a time, in chunk order.
pub struct Orchestrator<'a> {
    llm: &'a dyn Llm,
    options: OrchestratorOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(llm: &'a dyn Llm, options: OrchestratorOptions) -> Self {
        Self { llm, options }
    }

    pub fn run(&self, task: &Task, chunks: &[Chunk]) -> RunOutcome {
        let mut outcome = RunOutcome {
            results: Vec::with_capacity(chunks.len()),
            ..RunOutcome::default()
        };
        let mut pacer = Pacer::new(self.options.min_call_interval);

        for chunk in chunks {
            let req = task.request(&chunk.text);
            pacer.wait_turn();
            outcome.calls += 1;

            let raw = self
                .llm
                .complete(&req.task_prompt, &req.chunk_text, self.options.temperature);
            let result = classify(task, raw);

            let failure = match &result {
                LlmResult::TransientFailure(d) => Some((FailureKind::Transient, d)),
                LlmResult::PermanentFailure(d) => Some((FailureKind::Permanent, d)),
                _ => None,
            };
            if let Some((kind, detail)) = failure {
                tracing::warn!(
                    provider = self.llm.name(),
                    task = task.kind().as_str(),
                    chunk_index = chunk.index,
                    chunk_sha = chunk.short_hash(),
                    ?kind,
                    detail = %detail,
                    "backend call failed; chunk treated as no result"
                );
                outcome.failures.push(ChunkFailure {
                    chunk_index: chunk.index,
                    kind,
                    detail: detail.clone(),
                });
            } else {
                tracing::debug!(
                    chunk_index = chunk.index,
                    chunk_sha = chunk.short_hash(),
                    answered = matches!(result, LlmResult::Success(_)),
                    "chunk processed"
                );
            }
            outcome.results.push(absorb(result));
        }

        tracing::info!(
            provider = self.llm.name(),
            task = task.kind().as_str(),
            chunks = chunks.len(),
            calls = outcome.calls,
            failures = outcome.failures.len(),
            "run finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_keeps_failures_and_filters_sentinels() {
        let task = Task::Abbreviation;
        assert_eq!(
            classify(&task, Ok("NO_ABBREVIATIONS_FOUND".into())),
            LlmResult::NoResult
        );
        assert_eq!(
            classify(&task, Ok("AI = x".into())),
            LlmResult::Success("AI = x".into())
        );
        assert_eq!(
            classify(&task, Err(BackendFailure::Transient("t".into()))),
            LlmResult::TransientFailure("t".into())
        );
        assert_eq!(classify(&task, Ok("   ".into())), LlmResult::NoResult);
    }

    #[test]
    fn absorb_turns_failures_into_no_result() {
        assert_eq!(absorb(LlmResult::PermanentFailure("401".into())), LlmResult::NoResult);
        assert_eq!(absorb(LlmResult::TransientFailure("x".into())), LlmResult::NoResult);
        assert_eq!(
            absorb(LlmResult::Success("a".into())),
            LlmResult::Success("a".into())
        );
    }

    #[test]
    fn options_follow_settings() {
        let opts = OrchestratorOptions::from_settings(&OrchestratorSettings {
            min_call_interval_ms: 300,
            temperature: 0.2,
        });
        assert_eq!(opts.min_call_interval, Duration::from_millis(300));
        assert_eq!(opts.temperature, 0.2);
    }
}

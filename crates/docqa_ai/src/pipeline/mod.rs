use docqa_core::chunking::{chunk_units, single_chunk};
use docqa_core::config::Settings;
use docqa_core::domain::{MergedResult, TaskKind, TextUnit};
use docqa_core::fallback::{FallbackPolicy, Resolution};
use docqa_core::merge::{merge, QaMergeMode};
use serde::{Deserialize, Serialize};

use crate::llm::Llm;
use crate::orchestrator::{ChunkFailure, Orchestrator, OrchestratorOptions};
use crate::task::Task;

/// Everything one invocation produced, for rendering and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineReport {
    pub task: TaskKind,
    pub chunk_count: u32,
    pub backend_calls: u32,
    pub failures: Vec<ChunkFailure>,
    pub merged: MergedResult,
    pub fallback_used: bool,
    pub answer: String,
}

pub struct Pipeline<'a> {
    llm: &'a dyn Llm,
    max_chars: usize,
    qa_mode: QaMergeMode,
    options: OrchestratorOptions,
    fallback: FallbackPolicy,
}

impl<'a> Pipeline<'a> {
    pub fn new(llm: &'a dyn Llm, settings: &Settings) -> Self {
        Self {
            llm,
            max_chars: settings.chunking.max_chars,
            qa_mode: settings.merge.qa_mode,
            options: OrchestratorOptions::from_settings(&settings.orchestrator),
            fallback: FallbackPolicy::from_settings(&settings.fallback),
        }
    }

    /// Document path: abbreviation extraction without a question, QA with one.
    pub fn process_document(&self, units: &[TextUnit], question: Option<&str>) -> PipelineReport {
        let question = question.map(str::trim).filter(|q| !q.is_empty());
        let task = match question {
            Some(q) => Task::qa(q),
            None => Task::Abbreviation,
        };
        let chunks = chunk_units(units, self.max_chars);
        let run = Orchestrator::new(self.llm, self.options.clone()).run(&task, &chunks);
        let merged = merge(&run.results, task.kind(), self.qa_mode);
        let resolution = self.fallback.decide(&merged, question, true);

        report(
            task.kind(),
            chunks.len(),
            run.calls,
            run.failures,
            merged,
            resolution,
        )
    }

    /// No-document path. Short messages are answered with the canned
    /// response and never reach the backend.
    pub fn chat(&self, message: &str) -> PipelineReport {
        if self.fallback.should_short_circuit(Some(message), false) {
            tracing::info!("short message without document; backend not called");
            return report(
                TaskKind::Chat,
                0,
                0,
                Vec::new(),
                MergedResult::Empty,
                self.fallback.canned(),
            );
        }

        let task = Task::Chat;
        let chunks: Vec<_> = single_chunk(message).into_iter().collect();
        let run = Orchestrator::new(self.llm, self.options.clone()).run(&task, &chunks);
        let merged = merge(&run.results, task.kind(), self.qa_mode);
        let resolution = self.fallback.decide(&merged, Some(message), false);

        report(
            task.kind(),
            chunks.len(),
            run.calls,
            run.failures,
            merged,
            resolution,
        )
    }
}

fn report(
    task: TaskKind,
    chunk_count: usize,
    backend_calls: u32,
    failures: Vec<ChunkFailure>,
    merged: MergedResult,
    resolution: Resolution,
) -> PipelineReport {
    PipelineReport {
        task,
        chunk_count: chunk_count.min(u32::MAX as usize) as u32,
        backend_calls,
        failures,
        merged,
        fallback_used: resolution.fallback_used,
        answer: resolution.answer,
    }
}

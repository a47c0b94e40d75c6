use docqa_core::domain::{LlmRequest, TaskKind};
use docqa_core::sentinel::{is_any_sentinel, is_insufficient_information, is_no_abbreviations};

pub mod prompts;

/// Closed set of pipeline tasks. Each variant carries its prompt and how its
/// replies are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Abbreviation,
    Qa { question: String },
    Chat,
}

impl Task {
    pub fn qa(question: impl Into<String>) -> Self {
        Task::Qa {
            question: question.into(),
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Abbreviation => TaskKind::Abbreviation,
            Task::Qa { .. } => TaskKind::Qa,
            Task::Chat => TaskKind::Chat,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Task::Abbreviation => prompts::ABBREVIATION_SYSTEM_PROMPT,
            Task::Qa { .. } => prompts::QA_SYSTEM_PROMPT,
            Task::Chat => prompts::CHAT_SYSTEM_PROMPT,
        }
    }

    /// User turn for one chunk. QA interpolates the chunk as context and
    /// appends the question; the other tasks send the chunk as is.
    pub fn user_text(&self, chunk_text: &str) -> String {
        match self {
            Task::Qa { question } => prompts::qa_user_text(chunk_text, question),
            Task::Abbreviation | Task::Chat => chunk_text.to_string(),
        }
    }

    pub fn request(&self, chunk_text: &str) -> LlmRequest {
        LlmRequest {
            task_prompt: self.system_prompt().to_string(),
            chunk_text: self.user_text(chunk_text),
        }
    }

    /// Whether a successful reply is really this task's "nothing found" marker.
    pub fn is_sentinel(&self, text: &str) -> bool {
        match self {
            Task::Abbreviation => is_no_abbreviations(text),
            Task::Qa { .. } => is_insufficient_information(text),
            Task::Chat => is_any_sentinel(text),
        }
    }
}

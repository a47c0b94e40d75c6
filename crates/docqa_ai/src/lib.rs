pub mod llm;
pub mod ollama;
pub mod orchestrator;
pub mod pipeline;
pub mod task;

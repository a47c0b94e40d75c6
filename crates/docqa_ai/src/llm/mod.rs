use std::time::Duration;

use docqa_core::config::{BackendSettings, ProviderKind};
use docqa_core::domain::BackendFailure;
use docqa_core::error::AppError;

use crate::ollama::OllamaClient;

mod http;
pub mod gemini_llm;
pub mod ollama_llm;
pub mod openai_llm;

pub use gemini_llm::GeminiLlm;
pub use ollama_llm::OllamaLlm;
pub use openai_llm::OpenAiLlm;

/// Capability interface over completion providers.
///
/// Implementations never panic and never surface provider errors outside the
/// [`BackendFailure`] taxonomy. Temperature 0 is a request, not a determinism
/// guarantee.
pub trait Llm {
    /// Short provider label for logs.
    fn name(&self) -> &str;

    fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
    ) -> Result<String, BackendFailure>;
}

/// Build the configured provider. Called once at process start; the result is
/// passed explicitly to the pipeline.
pub fn build_llm(settings: &BackendSettings) -> Result<Box<dyn Llm>, AppError> {
    let timeout = Duration::from_secs(settings.timeout_secs.max(1));
    let model = settings.model().to_string();

    let llm: Box<dyn Llm> = match settings.provider {
        ProviderKind::Ollama => {
            let client = OllamaClient::new(settings.base_url())?;
            Box::new(OllamaLlm::new(client, model).with_timeout(timeout))
        }
        ProviderKind::OpenAi => {
            let key = require_api_key(settings)?;
            Box::new(OpenAiLlm::new(settings.base_url(), key, model).with_timeout(timeout))
        }
        ProviderKind::Gemini => {
            let key = require_api_key(settings)?;
            Box::new(GeminiLlm::new(settings.base_url(), key, model).with_timeout(timeout))
        }
    };
    tracing::info!(
        provider = settings.provider.as_str(),
        model = settings.model(),
        "backend selected"
    );
    Ok(llm)
}

fn require_api_key(settings: &BackendSettings) -> Result<String, AppError> {
    settings.api_key().map(str::to_string).ok_or_else(|| {
        AppError::new(
            "CONFIG_MISSING_API_KEY",
            "Remote provider requires an API key",
        )
        .with_details(format!("provider={}", settings.provider.as_str()))
    })
}

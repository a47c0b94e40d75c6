use std::time::Duration;

use docqa_core::domain::BackendFailure;
use serde::{Deserialize, Serialize};

use super::http::{classify_error, decode, encode, non_empty};
use super::Llm;

const PROVIDER: &str = "openai";

/// Remote chat-completions provider.
#[derive(Clone)]
pub struct OpenAiLlm {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiLlm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiLlm")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenAiLlm {
    pub fn new(base_url: &str, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn first_choice_text(resp: CompletionResponse) -> Result<String, BackendFailure> {
    let text = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| {
            BackendFailure::Transient(format!("{PROVIDER}: response had no choices"))
        })?;
    non_empty(PROVIDER, text.trim().to_string())
}

impl Llm for OpenAiLlm {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
    ) -> Result<String, BackendFailure> {
        let url = format!("{}/chat/completions", self.base_url);
        let req = CompletionRequest {
            model: &self.model,
            temperature,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_text,
                },
            ],
        };

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(encode(PROVIDER, &req)?)
            .map_err(|e| classify_error(PROVIDER, e))?;

        first_choice_text(decode(PROVIDER, resp)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice() {
        let resp: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  AI = Artificial Intelligence \n"}}]}"#,
        )
        .expect("decode");
        assert_eq!(
            first_choice_text(resp).expect("text"),
            "AI = Artificial Intelligence"
        );
    }

    #[test]
    fn missing_choices_or_content_is_transient() {
        let resp: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).expect("decode");
        assert!(first_choice_text(resp).expect_err("empty").is_transient());

        let resp: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).expect("decode");
        assert!(first_choice_text(resp).expect_err("null").is_transient());
    }

    #[test]
    fn debug_output_hides_api_key() {
        let llm = OpenAiLlm::new("https://api.openai.com/v1/", "sk-secret", "gpt-4o-mini");
        let dbg = format!("{llm:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("https://api.openai.com/v1\""));
    }
}

use std::time::Duration;

use docqa_core::domain::BackendFailure;
use serde::{Deserialize, Serialize};

use super::http::{classify_error, decode, encode, non_empty};
use super::Llm;
use crate::ollama::OllamaClient;

const PROVIDER: &str = "ollama";

#[derive(Debug, Clone)]
pub struct OllamaLlm {
    client: OllamaClient,
    model: String,
    timeout: Duration,
}

impl OllamaLlm {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
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
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

impl Llm for OllamaLlm {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
    ) -> Result<String, BackendFailure> {
        let url = format!("{}/api/chat", self.client.base_url());
        let req = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            stream: false,
            options: ChatOptions { temperature },
        };

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .send_json(encode(PROVIDER, &req)?)
            .map_err(|e| classify_error(PROVIDER, e))?;

        let v: ChatResponse = decode(PROVIDER, resp)?;
        let content = v.message.map(|m| m.content).unwrap_or_default();
        non_empty(PROVIDER, content)
    }
}

use std::time::Duration;

use docqa_core::domain::BackendFailure;
use serde::{Deserialize, Serialize};

use super::http::{classify_error, decode, encode, non_empty};
use super::Llm;

const PROVIDER: &str = "gemini";

/// Remote `generateContent` provider.
#[derive(Clone)]
pub struct GeminiLlm {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiLlm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiLlm")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiLlm {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: SystemInstruction,
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

fn candidate_text(resp: GenerateResponse) -> Result<String, BackendFailure> {
    let content = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| {
            BackendFailure::Transient(format!("{PROVIDER}: response had no candidates"))
        })?;
    let text = content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");
    non_empty(PROVIDER, text.trim().to_string())
}

impl Llm for GeminiLlm {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
    ) -> Result<String, BackendFailure> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let req = GenerateRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![RequestContent {
                role: "user",
                parts: vec![Part {
                    text: user_text.to_string(),
                }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .set("x-goog-api-key", &self.api_key)
            .send_json(encode(PROVIDER, &req)?)
            .map_err(|e| classify_error(PROVIDER, e))?;

        candidate_text(decode(PROVIDER, resp)?)
    }
}

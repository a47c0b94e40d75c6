use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::fallback::{DEFAULT_FALLBACK_RESPONSE, DEFAULT_MIN_WORDS};
use crate::merge::QaMergeMode;

/// Runtime settings. Every field has a default so partial files and bare
/// environments deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingSettings,
    pub orchestrator: OrchestratorSettings,
    pub merge: MergeSettings,
    pub fallback: FallbackSettings,
    pub backend: BackendSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingSettings {
    pub max_chars: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { max_chars: 2000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrchestratorSettings {
    pub min_call_interval_ms: u64,
    pub temperature: f32,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            min_call_interval_ms: 250,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct MergeSettings {
    pub qa_mode: QaMergeMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FallbackSettings {
    pub min_words: usize,
    pub response: String,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
            response: DEFAULT_FALLBACK_RESPONSE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" | "local" => Some(Self::Ollama),
            "openai" => Some(Self::OpenAi),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "llama3.2:latest",
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-2.5-flash",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "http://127.0.0.1:11434",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendSettings {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            base_url: None,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl BackendSettings {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    /// Configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.chunking.max_chars == 0 {
            return Err(AppError::config_invalid("chunking.max_chars must be at least 1"));
        }
        if self.fallback.min_words == 0 {
            return Err(AppError::config_invalid("fallback.min_words must be at least 1"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(AppError::config_invalid("backend.timeout_secs must be at least 1"));
        }
        let t = self.orchestrator.temperature;
        if !(0.0..=2.0).contains(&t) {
            return Err(
                AppError::config_invalid("orchestrator.temperature must be within [0, 2]")
                    .with_details(format!("temperature={t}")),
            );
        }
        Ok(())
    }
}

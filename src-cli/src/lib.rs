use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use docqa_ai::llm::build_llm;
use docqa_ai::ollama::OllamaClient;
use docqa_ai::pipeline::{Pipeline, PipelineReport};
use docqa_core::config::{ProviderKind, Settings};
use docqa_core::error::AppError;
use docqa_core::ingest::{read_document, UnitMode};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Extract abbreviation indexes from documents or ask questions about them.
#[derive(Parser, Debug)]
#[command(name = "docqa", version)]
pub struct Cli {
    /// Settings file (TOML or JSON). Environment variables prefixed DOCQA_ override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Document to process (.txt, .md, .html)
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Question about the document, or a chat message when no document is given
    #[arg(long)]
    pub question: Option<String>,

    /// Split plain text into form-feed pages, or paragraphs when it has none (default)
    #[arg(long, conflicts_with = "lines")]
    pub pages: bool,

    /// Treat every line of a plain-text document as one unit
    #[arg(long)]
    pub lines: bool,

    /// Override backend.provider (ollama, openai, gemini)
    #[arg(long)]
    pub provider: Option<String>,

    /// Override backend.model
    #[arg(long)]
    pub model: Option<String>,

    /// Print the full run report as JSON instead of only the answer
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Check that the local Ollama server answers, then exit
    #[arg(long)]
    pub health: bool,
}

pub fn init_tracing(json_format: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,docqa=info"));

    if json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .init();
    }
}

/// File (optional) first, then `DOCQA_*` environment variables, e.g.
/// `DOCQA_BACKEND__API_KEY`.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, AppError> {
    let mut builder = config::Config::builder();
    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path).required(true));
    }
    builder = builder.add_source(
        config::Environment::with_prefix("DOCQA")
            .prefix_separator("_")
            .separator("__"),
    );

    let settings: Settings = builder
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| {
            AppError::new("CONFIG_LOAD_FAILED", "Failed to load settings").with_details(e.to_string())
        })?;
    settings.validate()?;
    Ok(settings)
}

pub fn apply_overrides(settings: &mut Settings, cli: &Cli) -> Result<(), AppError> {
    if let Some(p) = cli.provider.as_deref() {
        settings.backend.provider = ProviderKind::parse(p).ok_or_else(|| {
            AppError::config_invalid("Unknown provider").with_details(format!("provider={p}"))
        })?;
    }
    if let Some(m) = cli.model.as_deref() {
        settings.backend.model = Some(m.to_string());
    }
    Ok(())
}

/// Presentation boundary: plain answer or the JSON report.
pub fn render(report: &PipelineReport, as_json: bool) -> Result<String, AppError> {
    if as_json {
        return serde_json::to_string_pretty(report).map_err(|e| {
            AppError::new("RENDER_FAILED", "Failed to encode run report").with_details(e.to_string())
        });
    }
    Ok(report.answer.clone())
}

pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), AppError> {
    let settings = load_settings(cli.config.as_deref())?;
    execute(cli, settings, out)
}

/// Everything after settings are loaded.
pub fn execute(cli: &Cli, mut settings: Settings, out: &mut dyn Write) -> Result<(), AppError> {
    apply_overrides(&mut settings, cli)?;

    if cli.health {
        let client = OllamaClient::new(settings.backend.base_url())?;
        client.health_check()?;
        return write_line(out, "ok");
    }

    let llm = build_llm(&settings.backend)?;
    let pipeline = Pipeline::new(llm.as_ref(), &settings);

    let report = match cli.document.as_deref() {
        Some(path) => {
            let mode = unit_mode(cli);
            let units = read_document(path, mode)?;
            pipeline.process_document(&units, cli.question.as_deref())
        }
        None => pipeline.chat(cli.question.as_deref().unwrap_or("")),
    };

    let rendered = render(&report, cli.json)?;
    write_line(out, &rendered)
}

fn unit_mode(cli: &Cli) -> UnitMode {
    if cli.lines {
        UnitMode::Lines
    } else {
        UnitMode::Pages
    }
}

fn write_line(out: &mut dyn Write, text: &str) -> Result<(), AppError> {
    writeln!(out, "{text}").map_err(|e| {
        AppError::new("RENDER_FAILED", "Failed to write output").with_details(e.to_string())
    })
}

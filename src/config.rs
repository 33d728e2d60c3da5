//! Startup configuration: stage templates, models and the generation backend.
//!
//! Everything here is built once in `main` and handed to the pipeline by
//! value; nothing is read from globals afterwards.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;

use crate::llm::{
    AnthropicClient, AnthropicConfig, DEFAULT_ANTHROPIC_MODEL, DEFAULT_OPENAI_MODEL, Generator,
    OpenAiClient, OpenAiConfig, REVIEWER_INSTRUCTIONS, STRUCTURE_INSTRUCTIONS,
    WRITER_INSTRUCTIONS, render_instructions,
};
use crate::models::StageKind;

/// Language the agents write in unless configured otherwise
pub const DEFAULT_LANGUAGE: &str = "English";

/// Text generation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Provider {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => DEFAULT_OPENAI_MODEL,
            Provider::Anthropic => DEFAULT_ANTHROPIC_MODEL,
        }
    }
}

/// Fixed configuration of one stage
#[derive(Debug, Clone)]
pub struct StageConfig {
    pub kind: StageKind,
    pub model: String,
    /// Rendered instructions, immutable for the process lifetime
    pub instructions: String,
}

impl StageConfig {
    pub fn new(kind: StageKind, model: impl Into<String>, language: &str) -> Self {
        let template = match kind {
            StageKind::Structure => STRUCTURE_INSTRUCTIONS,
            StageKind::Write => WRITER_INSTRUCTIONS,
            StageKind::Review => REVIEWER_INSTRUCTIONS,
        };
        Self {
            kind,
            model: model.into(),
            instructions: render_instructions(template, language),
        }
    }
}

/// Configuration for the three stages of the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub structurer: StageConfig,
    pub writer: StageConfig,
    pub reviewer: StageConfig,
}

impl PipelineConfig {
    /// All three stages on the same model, writing in `language`
    pub fn new(model: &str, language: &str) -> Self {
        Self {
            structurer: StageConfig::new(StageKind::Structure, model, language),
            writer: StageConfig::new(StageKind::Write, model, language),
            reviewer: StageConfig::new(StageKind::Review, model, language),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OPENAI_MODEL, DEFAULT_LANGUAGE)
    }
}

/// Options for constructing the generation backend
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub provider: Provider,
    pub temperature: Option<f64>,
    pub timeout: Duration,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            temperature: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Create the generation backend for the selected provider.
///
/// API keys are read from the environment.
pub fn build_generator(options: &GeneratorOptions) -> Result<Arc<dyn Generator>> {
    match options.provider {
        Provider::OpenAi => {
            let mut config = OpenAiConfig::from_env()?;
            config.temperature = options.temperature;
            config.timeout = options.timeout;
            Ok(Arc::new(OpenAiClient::new(config)?))
        }
        Provider::Anthropic => {
            let mut config = AnthropicConfig::from_env()?;
            config.temperature = options.temperature;
            config.timeout = options.timeout;
            Ok(Arc::new(AnthropicClient::new(config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.structurer.model, "gpt-4.1-mini");
        assert_eq!(config.writer.kind, StageKind::Write);
        assert!(config.reviewer.instructions.contains("Write in English."));
    }

    #[test]
    fn test_stage_config_picks_template_by_kind() {
        let stage = StageConfig::new(StageKind::Review, "m", "Japanese");
        assert!(stage.instructions.starts_with("You are the prompt reviewer agent."));
        assert!(stage.instructions.contains("Write in Japanese."));
    }

    #[test]
    fn test_provider_default_models() {
        assert_eq!(Provider::default(), Provider::OpenAi);
        assert_eq!(Provider::Anthropic.default_model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_provider_value_names() {
        assert_eq!(Provider::from_str("openai", true).unwrap(), Provider::OpenAi);
        assert_eq!(Provider::from_str("anthropic", true).unwrap(), Provider::Anthropic);
    }
}

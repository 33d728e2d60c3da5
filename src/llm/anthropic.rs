use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{check_status, decode, transport};
use super::{GenerationError, GenerationRequest, Generator};

const PROVIDER: &str = "anthropic";
const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Temperature (0-1); provider default when unset
    pub temperature: Option<f64>,
    /// Maximum tokens in response
    pub max_tokens: u32,
    /// Timeout for a whole request
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            temperature: None,
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Anthropic Messages API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn build_request(&self, request: &GenerationRequest<'_>) -> AnthropicRequest {
        AnthropicRequest {
            model: request.model.to_string(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: Some(request.instructions.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.input.to_string(),
            }],
        }
    }
}

#[async_trait]
impl Generator for AnthropicClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError> {
        let body = self.build_request(&request);
        debug!(agent = request.agent, model = request.model, "Sending messages request");

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport(PROVIDER))?;

        let response: AnthropicResponse = check_status(PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(decode(PROVIDER))?;

        response.into_text()
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

impl AnthropicResponse {
    /// Text of the first text content block
    fn into_text(self) -> Result<String, GenerationError> {
        self.content
            .into_iter()
            .find(|block| block.content_type == "text")
            .map(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyOutput)
    }
}

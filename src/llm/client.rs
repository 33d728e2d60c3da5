use async_trait::async_trait;
use reqwest::StatusCode;

/// One invocation of the text-generation capability
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Agent name of the stage making the call
    pub agent: &'a str,
    /// Model identifier understood by the backend
    pub model: &'a str,
    /// Fixed system instructions of the stage
    pub instructions: &'a str,
    /// Assembled input text for this run
    pub input: &'a str,
}

/// Failure of a single generation call
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("failed to send request to {provider}: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error: {status} - {body}")]
    Api {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("model returned no text content")]
    EmptyOutput,
}

/// Text generation backend: instructions plus input in, generated text out.
///
/// Implementations hold no per-request state and are shared across
/// concurrent pipeline runs.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable backend name (e.g. "openai", "anthropic")
    fn name(&self) -> &str;

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError>;
}

/// Map a `reqwest` error raised while sending into a transport error
pub(crate) fn transport(provider: &'static str) -> impl FnOnce(reqwest::Error) -> GenerationError {
    move |source| GenerationError::Transport { provider, source }
}

/// Map a `reqwest` error raised while reading the body into a decode error
pub(crate) fn decode(provider: &'static str) -> impl FnOnce(reqwest::Error) -> GenerationError {
    move |source| GenerationError::Decode { provider, source }
}

/// Turn a non-success response into an API error carrying the body text
pub(crate) async fn check_status(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, GenerationError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(GenerationError::Api {
        provider,
        status,
        body,
    })
}

pub mod config;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod stages;

pub use config::{GeneratorOptions, PipelineConfig, Provider, StageConfig, build_generator};
pub use llm::{
    AnthropicClient, AnthropicConfig, GenerationError, GenerationRequest, Generator, OpenAiClient,
    OpenAiConfig,
};
pub use models::{
    DraftPrompt, PipelineResult, PipelineRun, Review, ReviewVerdict, StageKind, Structure,
    UserRequest,
};
pub use pipeline::Pipeline;
pub use server::{ServerConfig, build_router, cors_layer, run_serve};
pub use stages::{PipelineError, StageRunner};

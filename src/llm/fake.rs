//! Scripted generator for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{GenerationError, GenerationRequest, Generator};

/// A recorded generation call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub agent: String,
    pub model: String,
    pub instructions: String,
    pub input: String,
}

/// Replies with a fixed text per agent, or fails for agents marked as failing
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: HashMap<String, String>,
    failing: Vec<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, agent: &str, text: &str) -> Self {
        self.replies.insert(agent.to_string(), text.to_string());
        self
    }

    pub fn fail(mut self, agent: &str) -> Self {
        self.failing.push(agent.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_for(&self, agent: &str) -> Option<RecordedCall> {
        self.calls().into_iter().find(|call| call.agent == agent)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(RecordedCall {
            agent: request.agent.to_string(),
            model: request.model.to_string(),
            instructions: request.instructions.to_string(),
            input: request.input.to_string(),
        });

        if self.failing.iter().any(|agent| agent == request.agent) {
            return Err(GenerationError::Api {
                provider: "scripted",
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: format!("{} is unavailable", request.agent),
            });
        }

        Ok(self
            .replies
            .get(request.agent)
            .cloned()
            .unwrap_or_else(|| format!("output of {}", request.agent)))
    }
}

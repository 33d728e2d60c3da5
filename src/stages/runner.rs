use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::StageConfig;
use crate::llm::{GenerationError, GenerationRequest, Generator};
use crate::models::StageKind;

/// Failure of a pipeline run, naming the stage that failed
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: StageKind,
        #[source]
        source: GenerationError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> StageKind {
        match self {
            PipelineError::Stage { stage, .. } => *stage,
        }
    }
}

/// One stage: fixed instructions and model bound to a generation backend
pub struct StageRunner {
    config: StageConfig,
    generator: Arc<dyn Generator>,
}

impl StageRunner {
    pub fn new(config: StageConfig, generator: Arc<dyn Generator>) -> Self {
        Self { config, generator }
    }

    pub fn kind(&self) -> StageKind {
        self.config.kind
    }

    /// Name of the generation backend this stage calls
    pub fn backend(&self) -> &str {
        self.generator.name()
    }

    pub fn instructions(&self) -> &str {
        &self.config.instructions
    }

    /// Invoke the model with the assembled input and return its text.
    ///
    /// Blank output counts as a failed invocation.
    pub async fn run(&self, input: &str) -> Result<String, PipelineError> {
        let kind = self.kind();
        let span = info_span!(
            "stage",
            agent = kind.agent_name(),
            backend = self.backend(),
            model = %self.config.model,
        );

        async {
            debug!(input_chars = input.len(), "Stage input:\n{}", input);

            let request = GenerationRequest {
                agent: kind.agent_name(),
                model: &self.config.model,
                instructions: &self.config.instructions,
                input,
            };

            let output = self
                .generator
                .generate(request)
                .await
                .and_then(|text| {
                    if text.trim().is_empty() {
                        Err(GenerationError::EmptyOutput)
                    } else {
                        Ok(text)
                    }
                })
                .map_err(|source| {
                    warn!("Stage {} failed: {}", kind, source);
                    PipelineError::Stage { stage: kind, source }
                })?;

            info!("Stage {}: {} chars generated", kind, output.len());
            debug!("Stage output:\n{}", output);
            Ok::<_, PipelineError>(output)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::fake::ScriptedGenerator;

    fn runner(generator: ScriptedGenerator) -> (StageRunner, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        let config = StageConfig::new(StageKind::Write, "gpt-4.1-mini", "English");
        (StageRunner::new(config, generator.clone()), generator)
    }

    #[tokio::test]
    async fn test_run_passes_fixed_instructions_and_model() {
        let (runner, generator) =
            runner(ScriptedGenerator::new().reply("prompt_writer_agent", "# Role"));

        let output = runner.run("input text").await.unwrap();
        assert_eq!(output, "# Role");

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gpt-4.1-mini");
        assert_eq!(calls[0].instructions, runner.instructions());
        assert_eq!(calls[0].input, "input text");
    }

    #[test]
    fn test_backend_reports_generator_name() {
        let (runner, _) = runner(ScriptedGenerator::new());
        assert_eq!(runner.backend(), "scripted");
    }

    #[tokio::test]
    async fn test_blank_output_is_stage_failure() {
        let (runner, _) = runner(ScriptedGenerator::new().reply("prompt_writer_agent", " \n"));

        let err = runner.run("input").await.unwrap_err();
        assert_eq!(err.stage(), StageKind::Write);
        assert!(matches!(
            err,
            PipelineError::Stage {
                source: GenerationError::EmptyOutput,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invocation_error_names_stage() {
        let (runner, _) = runner(ScriptedGenerator::new().fail("prompt_writer_agent"));

        let err = runner.run("input").await.unwrap_err();
        assert!(err.to_string().starts_with("writer stage failed:"));
    }
}

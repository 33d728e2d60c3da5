//! The three-stage prompt design pipeline.
//!
//! A run threads one [`UserRequest`] through structure, write and review in
//! strict sequence. The first failing stage aborts the run; nothing partial is
//! returned.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::llm::Generator;
use crate::models::{PipelineResult, PipelineRun, TraceInfo, UserRequest, WORKFLOW_NAME};
use crate::stages::{
    PipelineError, StageRunner, execute_stage1, execute_stage2, execute_stage3,
};

pub struct Pipeline {
    structurer: StageRunner,
    writer: StageRunner,
    reviewer: StageRunner,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, generator: Arc<dyn Generator>) -> Self {
        Self {
            structurer: StageRunner::new(config.structurer, generator.clone()),
            writer: StageRunner::new(config.writer, generator.clone()),
            reviewer: StageRunner::new(config.reviewer, generator),
        }
    }

    /// Run all three stages and return their outputs
    pub async fn run(&self, request: &UserRequest) -> Result<PipelineResult, PipelineError> {
        self.run_traced(request).await.map(|run| run.result)
    }

    /// Run all three stages inside one trace span and return the trace with
    /// the result
    pub async fn run_traced(&self, request: &UserRequest) -> Result<PipelineRun, PipelineError> {
        let trace_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let span = info_span!(
            "pipeline",
            workflow = WORKFLOW_NAME,
            %trace_id,
            user_request = %request,
        );

        let outcome = async {
            info!("Stage 1: Structuring request...");
            let structure = execute_stage1(&self.structurer, request).await?;

            info!("Stage 2: Writing prompt...");
            let draft = execute_stage2(&self.writer, request, &structure).await?;

            info!("Stage 3: Reviewing prompt...");
            let review = execute_stage3(&self.reviewer, request, &draft).await?;

            Ok::<_, PipelineError>(PipelineResult::assemble(structure, draft, review))
        }
        .instrument(span.clone())
        .await;

        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                span.in_scope(|| info!(elapsed_ms, "Pipeline complete"));
                Ok(PipelineRun {
                    trace: TraceInfo {
                        trace_id,
                        workflow_name: WORKFLOW_NAME,
                        started_at,
                        elapsed_ms,
                    },
                    result,
                })
            }
            Err(e) => {
                span.in_scope(|| {
                    error!(elapsed_ms, stage = %e.stage(), "Pipeline aborted: {}", e)
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerationError;
    use crate::llm::fake::ScriptedGenerator;
    use crate::models::{ReviewVerdict, StageKind};

    const STRUCTURE: &str = "prompt_structure_agent";
    const WRITER: &str = "prompt_writer_agent";
    const REVIEWER: &str = "prompt_reviewer_agent";

    fn pipeline(generator: &Arc<ScriptedGenerator>) -> Pipeline {
        Pipeline::new(PipelineConfig::default(), generator.clone())
    }

    fn request() -> UserRequest {
        UserRequest::new("create a prompt for summarizing legal contracts").unwrap()
    }

    #[tokio::test]
    async fn test_successful_run_returns_all_three_fields() {
        let generator = Arc::new(ScriptedGenerator::new());
        let result = pipeline(&generator).run(&request()).await.unwrap();

        assert!(!result.structure().as_str().is_empty());
        assert!(!result.draft_prompt().as_str().is_empty());
        assert!(!result.review().as_str().is_empty());

        let agents: Vec<String> = generator.calls().into_iter().map(|c| c.agent).collect();
        assert_eq!(agents, vec![STRUCTURE, WRITER, REVIEWER]);
    }

    #[tokio::test]
    async fn test_structure_output_reaches_writer() {
        let generator = Arc::new(ScriptedGenerator::new().reply(STRUCTURE, "SENTINEL-structure-4b1e"));
        pipeline(&generator).run(&request()).await.unwrap();

        let writer_input = generator.call_for(WRITER).unwrap().input;
        assert!(writer_input.contains("SENTINEL-structure-4b1e"));
        assert!(writer_input.contains(request().as_str()));
    }

    #[tokio::test]
    async fn test_draft_reaches_reviewer() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .reply(STRUCTURE, "SENTINEL-structure-4b1e")
                .reply(WRITER, "SENTINEL-draft-c09d"),
        );
        pipeline(&generator).run(&request()).await.unwrap();

        let reviewer_input = generator.call_for(REVIEWER).unwrap().input;
        assert!(reviewer_input.contains("SENTINEL-draft-c09d"));
        assert!(reviewer_input.contains(request().as_str()));
        assert!(!reviewer_input.contains("SENTINEL-structure-4b1e"));
    }

    #[tokio::test]
    async fn test_structure_failure_skips_later_stages() {
        let generator = Arc::new(ScriptedGenerator::new().fail(STRUCTURE));
        let err = pipeline(&generator).run(&request()).await.unwrap_err();

        assert_eq!(err.stage(), StageKind::Structure);
        assert_eq!(generator.calls().len(), 1);
        assert!(generator.call_for(WRITER).is_none());
        assert!(generator.call_for(REVIEWER).is_none());
    }

    #[tokio::test]
    async fn test_review_failure_fails_whole_run() {
        let generator = Arc::new(ScriptedGenerator::new().fail(REVIEWER));
        let err = pipeline(&generator).run(&request()).await.unwrap_err();

        assert_eq!(err.stage(), StageKind::Review);
        assert_eq!(generator.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_writer_output_aborts_run() {
        let generator = Arc::new(ScriptedGenerator::new().reply(WRITER, ""));
        let err = pipeline(&generator).run(&request()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Stage {
                stage: StageKind::Write,
                source: GenerationError::EmptyOutput,
            }
        ));
        assert!(generator.call_for(REVIEWER).is_none());
    }

    #[tokio::test]
    async fn test_each_stage_gets_its_own_instructions() {
        let generator = Arc::new(ScriptedGenerator::new());
        pipeline(&generator).run(&request()).await.unwrap();

        let calls = generator.calls();
        assert!(calls[0].instructions.starts_with("You are the prompt structure agent."));
        assert!(calls[1].instructions.starts_with("You are the prompt writer agent."));
        assert!(calls[2].instructions.starts_with("You are the prompt reviewer agent."));
        assert!(calls.iter().all(|c| c.model == "gpt-4.1-mini"));
    }

    #[tokio::test]
    async fn test_legal_contract_scenario() {
        let structure = "# 1. Purpose of the prompt\nSummarize contracts\n# 2. Intended users / audience\nLawyers\n\
                         # 3. Input information\nContract text\n# 4. Expected output\nSummary\n\
                         # 5. Constraints and rules\nNo advice\n# 6. Reasoning process\nClause by clause\n\
                         # 7. Output format\nBullets";
        let draft = "# Role\nYou are a contract analyst.\n# Goal\nSummarize.\n# Input instructions\nPaste the contract.\n\
                     # Instructions for the model\nGo clause by clause.\n# Output format\nBullets.\n# Rules\nNo legal advice.";
        let review = format!(
            "# 1. Verdict (OK / Needs revision)\nOK\n\n# 2. Issues and improvements\n- none\n\n# 3. Final revised prompt\n```markdown\n{draft}\n```"
        );
        let generator = Arc::new(
            ScriptedGenerator::new()
                .reply(STRUCTURE, structure)
                .reply(WRITER, draft)
                .reply(REVIEWER, &review),
        );

        let run = pipeline(&generator).run_traced(&request()).await.unwrap();

        assert_eq!(run.trace.workflow_name, "PromptDesigner");
        assert_eq!(run.result.structure().as_str(), structure);
        assert_eq!(run.result.draft_prompt().as_str(), draft);
        assert_eq!(run.result.review().verdict(), ReviewVerdict::Ok);
        assert_eq!(run.result.review().final_prompt(), draft);
    }

    #[tokio::test]
    async fn test_each_run_gets_a_fresh_trace_id() {
        let generator = Arc::new(ScriptedGenerator::new());
        let pipeline = pipeline(&generator);

        let first = pipeline.run_traced(&request()).await.unwrap();
        let second = pipeline.run_traced(&request()).await.unwrap();

        assert_ne!(first.trace.trace_id, second.trace.trace_id);
    }
}

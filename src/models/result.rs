use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{DraftPrompt, Review, Structure};

/// Workflow name attached to every pipeline trace
pub const WORKFLOW_NAME: &str = "PromptDesigner";

/// The three artifacts of a completed run, as returned to callers.
///
/// Fields are private and only filled by [`PipelineResult::assemble`], which
/// takes all three stage outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    structure: Structure,
    draft_prompt: DraftPrompt,
    review: Review,
}

impl PipelineResult {
    pub fn assemble(structure: Structure, draft_prompt: DraftPrompt, review: Review) -> Self {
        Self {
            structure,
            draft_prompt,
            review,
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn draft_prompt(&self) -> &DraftPrompt {
        &self.draft_prompt
    }

    pub fn review(&self) -> &Review {
        &self.review
    }
}

/// Correlation data for one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct TraceInfo {
    pub trace_id: Uuid,
    pub workflow_name: &'static str,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// A pipeline result together with its trace
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub trace: TraceInfo,
    pub result: PipelineResult,
}

use crate::llm::build_writer_input;
use crate::models::{DraftPrompt, Structure, UserRequest};

use super::{PipelineError, StageRunner};

/// Execute Stage 2: write the prompt body from the request and its structure
pub async fn execute_stage2(
    runner: &StageRunner,
    request: &UserRequest,
    structure: &Structure,
) -> Result<DraftPrompt, PipelineError> {
    let input = build_writer_input(request, structure);
    runner.run(&input).await.map(DraftPrompt::new)
}

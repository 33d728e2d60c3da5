use crate::llm::build_structure_input;
use crate::models::{Structure, UserRequest};

use super::{PipelineError, StageRunner};

/// Execute Stage 1: lay out the building blocks of the requested prompt
pub async fn execute_stage1(
    runner: &StageRunner,
    request: &UserRequest,
) -> Result<Structure, PipelineError> {
    let input = build_structure_input(request);
    runner.run(&input).await.map(Structure::new)
}

use tracing::info;

use crate::llm::build_review_input;
use crate::models::{DraftPrompt, Review, UserRequest};

use super::{PipelineError, StageRunner};

/// Execute Stage 3: review the draft and produce the corrected final prompt
///
/// The verdict is logged for observability only; it never triggers another
/// writer pass.
pub async fn execute_stage3(
    runner: &StageRunner,
    request: &UserRequest,
    draft: &DraftPrompt,
) -> Result<Review, PipelineError> {
    let input = build_review_input(request, draft);
    let review = runner.run(&input).await.map(Review::new)?;
    info!("Stage review: verdict {:?}", review.verdict());
    Ok(review)
}

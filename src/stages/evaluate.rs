use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::llm::{functions, ChatCapability, ModelProfile, RATINGS_SYSTEM_PROMPT};
use crate::models::{RatingsRecord, Usage};

/// Execute the rating evaluation stage over the final transcript text.
///
/// Rejects completions with missing fields or metrics outside the 1-4 scale.
pub async fn execute_ratings<C: ChatCapability>(
    chat: &C,
    transcript_text: &str,
    profile: ModelProfile,
) -> PipelineResult<(RatingsRecord, Usage)> {
    let call = chat
        .call_function(
            RATINGS_SYSTEM_PROMPT,
            transcript_text,
            &functions::evaluate_parameters(),
            profile,
        )
        .await?;

    let ratings: RatingsRecord =
        serde_json::from_value(call.arguments).map_err(|e| PipelineError::Extraction {
            stage: "ratings",
            detail: e.to_string(),
        })?;

    ratings
        .validate_scale()
        .map_err(|detail| PipelineError::Extraction {
            stage: "ratings",
            detail,
        })?;

    info!(
        sentiment = ratings.customer_sentiment_by_the_end_of_call,
        eagerness = ratings.customer_eagerness_to_buy,
        "ratings extracted"
    );
    Ok((ratings, call.usage))
}

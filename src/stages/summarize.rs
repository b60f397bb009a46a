use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::llm::{functions, ChatCapability, ModelProfile, SUMMARY_SYSTEM_PROMPT};
use crate::models::{SummaryRecord, Usage};

/// Execute the summarization stage over the final transcript text.
///
/// The completion must populate every summary field; a partial object is
/// rejected as an extraction failure.
pub async fn execute_summary<C: ChatCapability>(
    chat: &C,
    transcript_text: &str,
    profile: ModelProfile,
) -> PipelineResult<(SummaryRecord, Usage)> {
    let call = chat
        .call_function(
            SUMMARY_SYSTEM_PROMPT,
            transcript_text,
            &functions::summarize_call(),
            profile,
        )
        .await?;

    let summary: SummaryRecord =
        serde_json::from_value(call.arguments).map_err(|e| PipelineError::Extraction {
            stage: "summary",
            detail: e.to_string(),
        })?;

    info!(title = %summary.title, "summary extracted");
    Ok((summary, call.usage))
}

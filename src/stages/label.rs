use tracing::{info, warn};

use crate::diarization::validate_speaker_count;
use crate::error::{PipelineError, PipelineResult};
use crate::llm::{functions, ChatCapability, ModelProfile, CLASSIFIER_SYSTEM_PROMPT};
use crate::models::{strip_speaker_tags, SpeakerLabelMap, Transcript, Usage};

/// Result of the labeling stage, covering both the labeled and fallback paths.
#[derive(Debug, Clone)]
pub struct LabelingOutcome {
    pub transcript: Transcript,
    /// Zero when the fallback path skipped the classifier call.
    pub usage: Usage,
    /// Present only on the labeled path.
    pub label_map: Option<SpeakerLabelMap>,
}

/// Execute the speaker labeling stage.
///
/// With exactly two distinct speaker tags, asks the classifier to resolve
/// each tag to a role and substitutes the role prefixes into the transcript.
/// Any other cardinality routes to the fallback: all known tags are stripped
/// so ambiguous diarization cannot plant misleading role hints, and the
/// stage contributes zero usage.
pub async fn execute_labeling<C: ChatCapability>(
    chat: &C,
    raw_transcript: &str,
    profile: ModelProfile,
    require_distinct_roles: bool,
) -> PipelineResult<LabelingOutcome> {
    match validate_speaker_count(raw_transcript) {
        Ok(()) => {
            let call = chat
                .call_function(
                    CLASSIFIER_SYSTEM_PROMPT,
                    raw_transcript,
                    &functions::label_speakers(),
                    profile,
                )
                .await
                .map_err(|e| match e {
                    // A malformed classifier payload is a classification
                    // failure, not an extraction one.
                    PipelineError::Extraction { detail, .. } => {
                        PipelineError::Classification(detail)
                    }
                    other => other,
                })?;

            let label_map: SpeakerLabelMap = serde_json::from_value(call.arguments)
                .map_err(|e| PipelineError::Classification(e.to_string()))?;

            if require_distinct_roles && !label_map.is_distinct() {
                return Err(PipelineError::Classification(
                    "both speakers resolved to the same role".to_string(),
                ));
            }

            let labeled = label_map.apply(raw_transcript);
            info!(
                speaker_0 = label_map.speaker_0.prefix(),
                speaker_1 = label_map.speaker_1.prefix(),
                "speaker labels applied"
            );

            Ok(LabelingOutcome {
                transcript: Transcript::diarized(labeled),
                usage: call.usage,
                label_map: Some(label_map),
            })
        }
        Err(PipelineError::InvalidSpeakerCount { found }) => {
            warn!(found, "invalid speaker count, stripping tags instead of labeling");

            Ok(LabelingOutcome {
                transcript: Transcript::raw(strip_speaker_tags(raw_transcript)),
                usage: Usage::zero(),
                label_map: None,
            })
        }
        Err(other) => Err(other),
    }
}

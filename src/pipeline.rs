use tracing::{info, warn};

use crate::diarization::DiarizationService;
use crate::error::PipelineResult;
use crate::llm::{select_model_profile, ChatCapability};
use crate::media::MediaResolver;
use crate::models::{CallAnalysis, RecordPatch, StatusLog, Usage};
use crate::stages::{execute_labeling, execute_ratings, execute_summary};
use crate::store::{AnalysisStore, BeginOutcome};

/// Orchestrator policy knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Estimated-token threshold above which the long-context deployment is used
    pub long_context_threshold_tokens: usize,
    /// Reject label maps where both speakers resolve to the same role
    pub require_distinct_roles: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            long_context_threshold_tokens: 3000,
            require_distinct_roles: false,
        }
    }
}

/// Run the full call analysis for one audio URL.
///
/// Consults the store first: if this URL was already submitted, the caller
/// becomes a reader and gets whatever the owning run has persisted so far.
/// Otherwise this caller owns the run, executes the five stages in order with
/// a checkpoint after each, and finalizes the record exactly once: SUCCESS
/// with the complete field set, or FAILED carrying the failing stage's error
/// class and description. No stage is ever retried here.
pub async fn run_analysis<R, D, C, S>(
    resolver: &R,
    diarizer: &D,
    chat: &C,
    store: &S,
    config: &PipelineConfig,
    audio_url: &str,
) -> PipelineResult<CallAnalysis>
where
    R: MediaResolver,
    D: DiarizationService,
    C: ChatCapability,
    S: AnalysisStore,
{
    match store.begin_or_attach(audio_url).await? {
        BeginOutcome::Reader { record } => {
            info!(%audio_url, status = ?record.logs.status, "returning stored analysis");
            Ok(record.into())
        }
        BeginOutcome::Owner { record_id } => {
            info!(%audio_url, %record_id, "starting analysis run");

            match execute_run(resolver, diarizer, chat, store, config, audio_url, &record_id).await
            {
                Ok((analysis, complete)) => {
                    store
                        .finalize(&record_id, StatusLog::success(), complete)
                        .await?;
                    info!(%audio_url, "analysis persisted");
                    Ok(analysis)
                }
                Err(error) => {
                    warn!(%audio_url, error_class = error.error_class(), %error, "analysis run failed");
                    if let Err(store_error) = store
                        .finalize(&record_id, StatusLog::failed(&error), RecordPatch::default())
                        .await
                    {
                        warn!(%store_error, "could not record the failure");
                    }
                    Err(error)
                }
            }
        }
    }
}

/// The owner's path through the state machine, checkpointing after each
/// stage. Returns the caller-facing result together with the complete patch
/// for the final atomic write.
async fn execute_run<R, D, C, S>(
    resolver: &R,
    diarizer: &D,
    chat: &C,
    store: &S,
    config: &PipelineConfig,
    audio_url: &str,
    record_id: &str,
) -> PipelineResult<(CallAnalysis, RecordPatch)>
where
    R: MediaResolver,
    D: DiarizationService,
    C: ChatCapability,
    S: AnalysisStore,
{
    // START -> DIARIZED
    let audio = resolver.fetch(audio_url).await?;
    let raw_transcript = diarizer.diarize(&audio).await?;
    info!(chars = raw_transcript.len(), "diarization complete");

    let profile = select_model_profile(&raw_transcript, config.long_context_threshold_tokens);
    store
        .checkpoint(
            record_id,
            RecordPatch {
                model_config: Some(profile.as_str().to_string()),
                ..Default::default()
            },
        )
        .await?;

    // DIARIZED -> LABELED | FALLBACK_RAW
    let labeling =
        execute_labeling(chat, &raw_transcript, profile, config.require_distinct_roles).await?;
    store
        .checkpoint(
            record_id,
            RecordPatch {
                transcript: Some(labeling.transcript.clone()),
                ..Default::default()
            },
        )
        .await?;

    // -> SUMMARIZED
    let (summary, summary_usage) = execute_summary(chat, labeling.transcript.text(), profile).await?;
    store
        .checkpoint(
            record_id,
            RecordPatch {
                summary: Some(summary.clone()),
                ..Default::default()
            },
        )
        .await?;

    // -> RATED
    let (ratings, rating_usage) = execute_ratings(chat, labeling.transcript.text(), profile).await?;
    store
        .checkpoint(
            record_id,
            RecordPatch {
                ratings: Some(ratings.clone()),
                ..Default::default()
            },
        )
        .await?;

    // -> AGGREGATED
    let usage = Usage::aggregate(&[labeling.usage, summary_usage, rating_usage]);
    store
        .checkpoint(
            record_id,
            RecordPatch {
                usage: Some(usage),
                ..Default::default()
            },
        )
        .await?;

    let analysis = CallAnalysis {
        audio_url: audio_url.to_string(),
        transcript: Some(labeling.transcript.clone()),
        summary: Some(summary.clone()),
        ratings: Some(ratings.clone()),
        usage: Some(usage),
    };

    let complete = RecordPatch {
        model_config: Some(profile.as_str().to_string()),
        transcript: Some(labeling.transcript),
        summary: Some(summary),
        ratings: Some(ratings),
        usage: Some(usage),
    };

    Ok((analysis, complete))
}

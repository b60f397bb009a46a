pub mod config;
pub mod diarization;
pub mod error;
pub mod llm;
pub mod media;
pub mod models;
pub mod pipeline;
pub mod stages;
pub mod store;

pub use config::AppConfig;
pub use diarization::{
    canonicalize_speaker_tags, distinct_speaker_tags, validate_speaker_count, DeepgramClient,
    DeepgramConfig, DiarizationService,
};
pub use error::{PipelineError, PipelineResult};
pub use llm::{
    estimate_tokens, select_model_profile, AzureOpenAiClient, AzureOpenAiConfig, ChatCapability,
    FunctionCall, FunctionSpec, ModelProfile,
};
pub use media::{HttpMediaResolver, MediaResolver};
pub use models::{
    strip_speaker_tags, AnalysisRecord, CallAnalysis, RatingsRecord, RecordPatch, RunStatus,
    SpeakerLabelMap, SpeakerRole, StatusLog, SummaryRecord, Transcript, Usage,
};
pub use pipeline::{run_analysis, PipelineConfig};
pub use store::{AnalysisStore, BeginOutcome, FileStore, MemoryStore};

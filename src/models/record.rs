use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::models::{RatingsRecord, SummaryRecord, Transcript, Usage};

/// Terminal and in-flight run states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Success,
    Failed,
}

/// Status block persisted inside each analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLog {
    pub status: RunStatus,
    pub error_class: String,
    pub error_description: String,
}

impl StatusLog {
    pub fn pending() -> Self {
        Self {
            status: RunStatus::Pending,
            error_class: String::new(),
            error_description: String::new(),
        }
    }

    pub fn success() -> Self {
        Self {
            status: RunStatus::Success,
            error_class: String::new(),
            error_description: String::new(),
        }
    }

    pub fn failed(error: &PipelineError) -> Self {
        Self {
            status: RunStatus::Failed,
            error_class: error.error_class().to_string(),
            error_description: error.to_string(),
        }
    }
}

/// Persistence unit for one audio reference.
///
/// Created PENDING before any external call, then progressed field by field
/// through checkpoints by the orchestrator that created it. Concurrent
/// submitters of the same URL only ever read this record; an unset field
/// means "not yet available", never confirmed absence. Field names mirror the
/// stored document (`mp3`, `analysis`, `gpt35_usage`, `logs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub record_id: String,
    #[serde(rename = "mp3")]
    pub audio_url: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Transcript>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRecord>,
    #[serde(default, rename = "analysis", skip_serializing_if = "Option::is_none")]
    pub ratings: Option<RatingsRecord>,
    #[serde(default, rename = "gpt35_usage", skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub logs: StatusLog,
}

impl AnalysisRecord {
    /// Fresh PENDING marker inserted at submission, before any external call.
    pub fn pending(audio_url: impl Into<String>) -> Self {
        Self {
            record_id: uuid::Uuid::new_v4().to_string(),
            audio_url: audio_url.into(),
            timestamp: Utc::now(),
            model_config: None,
            transcript: None,
            summary: None,
            ratings: None,
            usage: None,
            logs: StatusLog::pending(),
        }
    }
}

/// Partial update applied at a checkpoint. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub model_config: Option<String>,
    pub transcript: Option<Transcript>,
    pub summary: Option<SummaryRecord>,
    pub ratings: Option<RatingsRecord>,
    pub usage: Option<Usage>,
}

impl RecordPatch {
    pub fn apply_to(self, record: &mut AnalysisRecord) {
        if let Some(model_config) = self.model_config {
            record.model_config = Some(model_config);
        }
        if let Some(transcript) = self.transcript {
            record.transcript = Some(transcript);
        }
        if let Some(summary) = self.summary {
            record.summary = Some(summary);
        }
        if let Some(ratings) = self.ratings {
            record.ratings = Some(ratings);
        }
        if let Some(usage) = self.usage {
            record.usage = Some(usage);
        }
    }
}

/// Caller-facing result, identical whether freshly computed or replayed from
/// the store. Replayed in-progress records surface as unset fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAnalysis {
    pub audio_url: String,
    pub transcript: Option<Transcript>,
    pub summary: Option<SummaryRecord>,
    pub ratings: Option<RatingsRecord>,
    pub usage: Option<Usage>,
}

impl From<AnalysisRecord> for CallAnalysis {
    fn from(record: AnalysisRecord) -> Self {
        Self {
            audio_url: record.audio_url,
            transcript: record.transcript,
            summary: record.summary,
            ratings: record.ratings,
            usage: record.usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_record_has_no_analysis_fields() {
        let record = AnalysisRecord::pending("https://example.com/call.mp3");

        assert_eq!(record.logs.status, RunStatus::Pending);
        assert!(record.transcript.is_none());
        assert!(record.summary.is_none());
        assert!(record.ratings.is_none());
        assert!(record.usage.is_none());
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut record = AnalysisRecord::pending("https://example.com/call.mp3");
        let patch = RecordPatch {
            transcript: Some(Transcript::raw("hello")),
            ..Default::default()
        };
        patch.apply_to(&mut record);

        assert!(record.transcript.is_some());
        assert!(record.summary.is_none());

        let patch = RecordPatch {
            usage: Some(Usage::new(10, 2)),
            ..Default::default()
        };
        patch.apply_to(&mut record);

        // Earlier checkpoint survives later ones
        assert!(record.transcript.is_some());
        assert_eq!(record.usage, Some(Usage::new(10, 2)));
    }

    #[test]
    fn test_record_document_keys() {
        let mut record = AnalysisRecord::pending("https://example.com/call.mp3");
        record.usage = Some(Usage::new(5, 5));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mp3"], "https://example.com/call.mp3");
        assert_eq!(json["logs"]["status"], "PENDING");
        assert!(json.get("gpt35_usage").is_some());
        // Unset checkpoints are absent from the document, not null
        assert!(json.get("summary").is_none());
    }
}

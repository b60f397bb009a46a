use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure taxonomy for the analysis pipeline.
///
/// `InvalidSpeakerCount` is absorbed by the labeling fallback and never
/// reaches a caller; every other variant aborts the run and is written into
/// the persisted record's status log before being surfaced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid audio url: {0}")]
    BadRequest(String),

    #[error("audio resource not found: {0}")]
    NotFound(String),

    #[error("{service} request failed with status {status}: {detail}")]
    ExternalService {
        service: &'static str,
        status: u16,
        detail: String,
    },

    #[error("transport failure talking to {service}: {detail}")]
    Transport {
        service: &'static str,
        detail: String,
    },

    #[error("expected exactly 2 speakers, found {found}")]
    InvalidSpeakerCount { found: usize },

    #[error("speaker classification produced an unusable response: {0}")]
    Classification(String),

    #[error("{stage} extraction failed: {detail}")]
    Extraction {
        stage: &'static str,
        detail: String,
    },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl PipelineError {
    pub fn transport(service: &'static str, error: reqwest::Error) -> Self {
        Self::Transport {
            service,
            detail: error.to_string(),
        }
    }

    /// Stable class name recorded in the persisted status log.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BadRequestError",
            Self::NotFound(_) => "NotFoundError",
            Self::ExternalService { .. } => "ExternalServiceError",
            Self::Transport { .. } => "TransportError",
            Self::InvalidSpeakerCount { .. } => "InvalidSpeakerCountError",
            Self::Classification(_) => "ClassificationError",
            Self::Extraction { .. } => "ExtractionError",
            Self::Storage(_) => "StorageError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_class_names() {
        let err = PipelineError::Extraction {
            stage: "ratings",
            detail: "missing field `customer_budget`".to_string(),
        };
        assert_eq!(err.error_class(), "ExtractionError");

        let err = PipelineError::InvalidSpeakerCount { found: 3 };
        assert_eq!(err.error_class(), "InvalidSpeakerCountError");
        assert!(err.to_string().contains("found 3"));
    }
}

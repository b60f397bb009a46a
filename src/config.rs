use std::time::Duration;

use anyhow::{Context, Result};

use crate::diarization::DeepgramConfig;
use crate::llm::AzureOpenAiConfig;
use crate::pipeline::PipelineConfig;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Whole-process configuration, built once at startup and passed by
/// reference into each adapter. There is no other source of credentials or
/// endpoints in the crate.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub deepgram: DeepgramConfig,
    pub openai: AzureOpenAiConfig,
    /// Bound on every external call; expiry surfaces as a transport error
    pub request_timeout: Duration,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let deepgram = DeepgramConfig::from_env()?;
        let openai = AzureOpenAiConfig::from_env()?;

        let request_timeout = match std::env::var("ECHOSENSAI_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .context("ECHOSENSAI_REQUEST_TIMEOUT_SECS is not a number")?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let mut pipeline = PipelineConfig::default();
        if let Ok(raw) = std::env::var("ECHOSENSAI_LONG_CONTEXT_THRESHOLD") {
            pipeline.long_context_threshold_tokens = raw
                .parse()
                .context("ECHOSENSAI_LONG_CONTEXT_THRESHOLD is not a number")?;
        }
        if let Ok(raw) = std::env::var("ECHOSENSAI_REQUIRE_DISTINCT_ROLES") {
            pipeline.require_distinct_roles = matches!(raw.as_str(), "1" | "true" | "yes");
        }

        Ok(Self {
            deepgram,
            openai,
            request_timeout,
            pipeline,
        })
    }
}

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::models::DeepgramResponse;

/// Capability that turns audio bytes into a speaker-tagged transcript,
/// one `[Speaker:<n>] <text>` line per utterance, tags in canonical form.
#[allow(async_fn_in_trait)]
pub trait DiarizationService {
    async fn diarize(&self, audio: &[u8]) -> PipelineResult<String>;
}

/// Configuration for the Deepgram diarization client
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    /// API key (from DEEPGRAM_API_KEY env var)
    pub api_key: String,
    /// Base URL, e.g. "https://api.deepgram.com"
    pub api_base: String,
}

impl DeepgramConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPGRAM_API_KEY")
            .context("DEEPGRAM_API_KEY environment variable not set")?;
        let api_base = std::env::var("DEEPGRAM_API_BASE")
            .unwrap_or_else(|_| "https://api.deepgram.com".to_string());

        Ok(Self { api_key, api_base })
    }
}

/// Deepgram diarization client
pub struct DeepgramClient {
    client: Client,
    config: DeepgramConfig,
}

impl DeepgramClient {
    pub fn new(config: DeepgramConfig, timeout: Duration) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::transport("deepgram", e))?;
        Ok(Self { client, config })
    }
}

impl DiarizationService for DeepgramClient {
    async fn diarize(&self, audio: &[u8]) -> PipelineResult<String> {
        let url = format!(
            "{}/v1/listen?punctuate=true&diarize=true&utterances=true",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.config.api_key))
            .header("content-type", "audio/mpeg")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| PipelineError::transport("deepgram", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::ExternalService {
                service: "deepgram",
                status: status.as_u16(),
                detail: body,
            });
        }

        let parsed: DeepgramResponse =
            response
                .json()
                .await
                .map_err(|e| PipelineError::ExternalService {
                    service: "deepgram",
                    status: status.as_u16(),
                    detail: format!("unparsable response body: {e}"),
                })?;

        let transcript = canonicalize_speaker_tags(&parsed.render_transcript());
        debug!(
            utterances = parsed.results.utterances.len(),
            chars = transcript.len(),
            "diarization parsed"
        );
        Ok(transcript)
    }
}

/// Rewrite every bracketed speaker tag into canonical `[Speaker:<n>]` form,
/// collapsing interior whitespace and case variance (`[ speaker : 0 ]` →
/// `[Speaker:0]`) so later substitution can match tags literally.
pub fn canonicalize_speaker_tags(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '[' {
            if let Some((next, tag)) = match_speaker_tag(&chars, i) {
                out.push_str(&format!("[Speaker:{tag}]"));
                i = next;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Distinct speaker tags present in a transcript, matched case-insensitively
/// and whitespace-tolerantly.
pub fn distinct_speaker_tags(text: &str) -> BTreeSet<u32> {
    let chars: Vec<char> = text.chars().collect();
    let mut tags = BTreeSet::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '[' {
            if let Some((next, tag)) = match_speaker_tag(&chars, i) {
                tags.insert(tag);
                i = next;
                continue;
            }
        }
        i += 1;
    }

    tags
}

/// Precondition for the speaker labeler: exactly two distinct tags.
/// Anything else is rejected here; recovery is the orchestrator's job.
pub fn validate_speaker_count(transcript: &str) -> PipelineResult<()> {
    let tags = distinct_speaker_tags(transcript);
    if tags.len() == 2 {
        Ok(())
    } else {
        Err(PipelineError::InvalidSpeakerCount { found: tags.len() })
    }
}

/// Try to match a speaker tag starting at `chars[start] == '['`. Returns the
/// index past the closing bracket and the parsed tag number.
fn match_speaker_tag(chars: &[char], start: usize) -> Option<(usize, u32)> {
    let mut i = start + 1;

    let skip_ws = |chars: &[char], mut i: usize| {
        while chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        i
    };

    i = skip_ws(chars, i);
    for expected in "speaker".chars() {
        if !chars.get(i).is_some_and(|c| c.eq_ignore_ascii_case(&expected)) {
            return None;
        }
        i += 1;
    }

    i = skip_ws(chars, i);
    if chars.get(i) != Some(&':') {
        return None;
    }
    i += 1;

    i = skip_ws(chars, i);
    let digit_start = i;
    while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
    }
    if i == digit_start {
        return None;
    }
    let tag: u32 = chars[digit_start..i].iter().collect::<String>().parse().ok()?;

    i = skip_ws(chars, i);
    if chars.get(i) != Some(&']') {
        return None;
    }

    Some((i + 1, tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_collapses_whitespace() {
        assert_eq!(
            canonicalize_speaker_tags("[ Speaker : 0 ] Hello"),
            "[Speaker:0] Hello"
        );
        assert_eq!(
            canonicalize_speaker_tags("[speaker:1] Hi"),
            "[Speaker:1] Hi"
        );
    }

    #[test]
    fn test_canonicalize_leaves_other_brackets_alone() {
        let text = "[inaudible] and [Speaker:0] said [sic] hello";
        assert_eq!(
            canonicalize_speaker_tags(text),
            "[inaudible] and [Speaker:0] said [sic] hello"
        );
    }

    #[test]
    fn test_distinct_tags_case_insensitive() {
        let tags = distinct_speaker_tags("[SPEAKER:0] a\n[speaker:1] b\n[Speaker:0] c");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_validate_accepts_exactly_two() {
        assert!(validate_speaker_count("[Speaker:0] a\n[Speaker:1] b").is_ok());
    }

    #[test]
    fn test_validate_rejects_other_cardinalities() {
        for transcript in [
            "no tags at all",
            "[Speaker:0] monologue",
            "[Speaker:0] a\n[Speaker:1] b\n[Speaker:2] c",
        ] {
            let err = validate_speaker_count(transcript).unwrap_err();
            assert!(matches!(err, PipelineError::InvalidSpeakerCount { .. }));
        }
    }

    #[test]
    fn test_validate_reports_found_count() {
        let err =
            validate_speaker_count("[Speaker:0] a\n[Speaker:1] b\n[Speaker:2] c").unwrap_err();
        match err {
            PipelineError::InvalidSpeakerCount { found } => assert_eq!(found, 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Root response from the Deepgram listen API with `utterances=true`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResponse {
    pub results: DeepgramResults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResults {
    #[serde(default)]
    pub utterances: Vec<DeepgramUtterance>,
}

/// A single speaker-attributed utterance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramUtterance {
    /// Numeric speaker identifier assigned by diarization
    pub speaker: u32,
    /// The utterance text
    pub transcript: String,
}

impl DeepgramResponse {
    /// Render the utterances as tagged transcript lines,
    /// `[Speaker:<n>] <text>` one per utterance.
    pub fn render_transcript(&self) -> String {
        self.results
            .utterances
            .iter()
            .map(|u| format!("[Speaker:{}] {}", u.speaker, u.transcript))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render_utterances() {
        let json = r#"{
            "results": {
                "utterances": [
                    {"speaker": 0, "transcript": "Hello, am I speaking with Mr. Sharma?"},
                    {"speaker": 1, "transcript": "Yes, speaking."}
                ]
            }
        }"#;

        let response: DeepgramResponse = serde_json::from_str(json).unwrap();
        let transcript = response.render_transcript();

        assert_eq!(
            transcript,
            "[Speaker:0] Hello, am I speaking with Mr. Sharma?\n[Speaker:1] Yes, speaking."
        );
    }

    #[test]
    fn test_missing_utterances_renders_empty() {
        let json = r#"{"results": {}}"#;
        let response: DeepgramResponse = serde_json::from_str(json).unwrap();
        assert!(response.render_transcript().is_empty());
    }
}

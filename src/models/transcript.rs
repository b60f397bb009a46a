use serde::{Deserialize, Serialize};

/// Semantic role resolved for an anonymous speaker tag.
///
/// The serialized form doubles as the substitution prefix, which is why it
/// carries the trailing colon and space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakerRole {
    #[serde(rename = "salesperson: ")]
    Salesperson,
    #[serde(rename = "customer: ")]
    Customer,
}

impl SpeakerRole {
    /// The line prefix substituted in place of the bracketed tag.
    pub fn prefix(&self) -> &'static str {
        match self {
            SpeakerRole::Salesperson => "salesperson: ",
            SpeakerRole::Customer => "customer: ",
        }
    }
}

/// Mapping from the two anonymous diarization tags to semantic roles.
/// Immutable once produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerLabelMap {
    pub speaker_0: SpeakerRole,
    pub speaker_1: SpeakerRole,
}

impl SpeakerLabelMap {
    /// Whether the two resolved roles differ. The classifier contract does
    /// not guarantee this; enforcement is opt-in via configuration.
    pub fn is_distinct(&self) -> bool {
        self.speaker_0 != self.speaker_1
    }

    /// Substitute `[Speaker:0]` / `[Speaker:1]` with the resolved role
    /// prefixes. Tags are expected in canonical form.
    pub fn apply(&self, raw_transcript: &str) -> String {
        raw_transcript
            .replace("[Speaker:0] ", self.speaker_0.prefix())
            .replace("[Speaker:0]", self.speaker_0.prefix())
            .replace("[Speaker:1] ", self.speaker_1.prefix())
            .replace("[Speaker:1]", self.speaker_1.prefix())
    }
}

/// Remove every known bracketed tag (speakers 0 through 3) without
/// substituting roles. Used when diarization reported an ambiguous speaker
/// count and role hints would mislead downstream models.
pub fn strip_speaker_tags(raw_transcript: &str) -> String {
    let mut text = raw_transcript.to_string();
    for tag in 0..=3u32 {
        text = text
            .replace(&format!("[Speaker:{tag}] "), "")
            .replace(&format!("[Speaker:{tag}]"), "");
    }
    text
}

/// Final transcript attached to an analysis.
///
/// Exactly one variant is ever populated: `Diarized` when two speakers were
/// confirmed and role-labeled, `Raw` on the stripped fallback path. The
/// untagged representation keeps the stored document shape, an object with
/// either a `diarized_transcript` or a `raw_transcript` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transcript {
    Diarized { diarized_transcript: String },
    Raw { raw_transcript: String },
}

impl Transcript {
    pub fn diarized(text: impl Into<String>) -> Self {
        Transcript::Diarized {
            diarized_transcript: text.into(),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Transcript::Raw {
            raw_transcript: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Transcript::Diarized {
                diarized_transcript,
            } => diarized_transcript,
            Transcript::Raw { raw_transcript } => raw_transcript,
        }
    }

    pub fn is_diarized(&self) -> bool {
        matches!(self, Transcript::Diarized { .. })
    }
}

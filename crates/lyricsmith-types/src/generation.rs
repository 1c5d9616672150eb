//! Form-driven lyric generation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::language::Language;

/// Upper bound on the memory text accepted from the form.
pub const MAX_MEMORY_CHARS: usize = 5_000;

/// Structured user input collected by the lyrics form.
///
/// Consumed read-only by the prompt builder. The categorical fields are
/// short strings chosen from select boxes in the UI; they are not
/// validated against a fixed vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub memory: String,
    pub emotion: String,
    pub genre: String,
    pub tempo: String,
    pub perspective: String,
    pub mood: String,
    pub structure: String,
    pub length: String,
    pub tone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_phrases: Option<String>,
    pub song_for: String,
    #[serde(default)]
    pub avoid_cliches: Vec<String>,
    #[serde(default)]
    pub language: Language,
}

impl GenerationRequest {
    /// Build a request from raw form key/value pairs.
    ///
    /// Keys may repeat: every non-blank `avoid_cliches` value is collected
    /// in order. For any other key the last occurrence wins. Unknown keys
    /// are ignored.
    pub fn from_fields<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut req = GenerationRequest::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "memory" => req.memory = value.to_string(),
                "emotion" => req.emotion = value.to_string(),
                "genre" => req.genre = value.to_string(),
                "tempo" => req.tempo = value.to_string(),
                "perspective" => req.perspective = value.to_string(),
                "mood" => req.mood = value.to_string(),
                "structure" => req.structure = value.to_string(),
                "length" => req.length = value.to_string(),
                "tone" => req.tone = value.to_string(),
                "song_for" => req.song_for = value.to_string(),
                "special_phrases" => {
                    req.special_phrases = (!value.is_empty()).then(|| value.to_string());
                }
                "avoid_cliches" => {
                    if !value.is_empty() {
                        req.avoid_cliches.push(value.to_string());
                    }
                }
                "language" => req.language = Language::parse_or_default(value),
                _ => {}
            }
        }

        req
    }

    /// Check the request before it reaches the prompt builder.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.memory.trim().is_empty() {
            return Err(ValidationError::EmptyMemory);
        }
        let chars = self.memory.chars().count();
        if chars > MAX_MEMORY_CHARS {
            return Err(ValidationError::TooLong {
                field: "memory",
                max: MAX_MEMORY_CHARS,
                actual: chars,
            });
        }
        Ok(())
    }
}

/// Lyrics produced for a form submission, kept for the result page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub lyrics: String,
    pub request: GenerationRequest,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(lyrics: String, request: GenerationRequest) -> Self {
        Self {
            lyrics,
            request,
            created_at: Utc::now(),
        }
    }
}

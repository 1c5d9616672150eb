//! Target language for generated lyrics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language the lyrics (or chat replies) are written in.
///
/// `English` is the default; every other variant carries its own fixed
/// directive block in the prompt builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
}

impl Language {
    /// Every supported language, default first.
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Telugu];

    /// Parse a user-supplied language name, falling back to English for
    /// blank or unrecognized input.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Whether this is the base-language template (no directive block).
    pub fn is_default(&self) -> bool {
        *self == Language::English
    }

    /// Lowercase identifier used in forms and JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Telugu => "telugu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Hindi => write!(f, "Hindi"),
            Language::Telugu => write!(f, "Telugu"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "hindi" => Ok(Language::Hindi),
            "telugu" => Ok(Language::Telugu),
            other => Err(format!("unsupported language: '{other}'")),
        }
    }
}

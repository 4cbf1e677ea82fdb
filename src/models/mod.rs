// Caplang Data Models
// Types shared between the detection services and the batch driver

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A supported output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ar,
    Fr,
    En,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::Ar => "ar",
            Lang::Fr => "fr",
            Lang::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Lang> {
        match code {
            "ar" => Some(Lang::Ar),
            "fr" => Some(Lang::Fr),
            "en" => Some(Lang::En),
            _ => None,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classification outcome: a supported language or one of the sentinels.
/// The sentinels are defined non-answers, not languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedLanguage {
    Ar,
    Fr,
    En,
    /// No meaningful content, either in the raw input or after cleaning.
    Empty,
    /// Content exists but no language cleared the minimum confidence threshold.
    Unknown,
    /// The statistical backend failed or returned nothing usable.
    Error,
}

impl DetectedLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            DetectedLanguage::Ar => "ar",
            DetectedLanguage::Fr => "fr",
            DetectedLanguage::En => "en",
            DetectedLanguage::Empty => "empty",
            DetectedLanguage::Unknown => "unknown",
            DetectedLanguage::Error => "error",
        }
    }

    pub fn as_lang(&self) -> Option<Lang> {
        match self {
            DetectedLanguage::Ar => Some(Lang::Ar),
            DetectedLanguage::Fr => Some(Lang::Fr),
            DetectedLanguage::En => Some(Lang::En),
            _ => None,
        }
    }
}

impl From<Lang> for DetectedLanguage {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Ar => DetectedLanguage::Ar,
            Lang::Fr => DetectedLanguage::Fr,
            Lang::En => DetectedLanguage::En,
        }
    }
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The atomic unit passed between the strategy and the frequency analyzer.
/// Confidence is a heuristic score in [0,1], meaningful only relative to the
/// configured thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LanguageAnalysis {
    pub lang: DetectedLanguage,
    pub confidence: f64,
}

/// The externally visible classification record. The original text is kept
/// verbatim for downstream joins; the cleaned form is kept for auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub text: String,
    pub cleaned: String,
    pub detected_language: DetectedLanguage,
    pub confidence: f64,
}

/// A detection result joined back to its row identifier, as dumped to the
/// unknown-posts side file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedPost {
    pub id: String,
    pub text: String,
    pub cleaned: String,
    pub detected_language: DetectedLanguage,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    /// Record counts keyed by detected-language code (sentinels included).
    pub counts: HashMap<String, usize>,
}

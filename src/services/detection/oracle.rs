// Statistical Language Oracle
// The n-gram detector behind a swappable trait, so the strategy can be
// exercised with deterministic stubs

use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("language backend failure: {0}")]
    Backend(String),
}

/// One candidate from the statistical detector.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageCandidate {
    /// Lowercase ISO 639-1 code as reported by the backend.
    pub lang: String,
    pub prob: f64,
}

/// Contract: for a non-empty string, candidates sorted by descending
/// probability; an empty list means the backend could not determine any
/// language. A fault surfaces as `Err` and is absorbed by the strategy.
pub trait LanguageOracle {
    fn candidates(&self, text: &str) -> Result<Vec<LanguageCandidate>, OracleError>;
}

/// Production oracle over the lingua n-gram models.
pub struct LinguaOracle {
    detector: LanguageDetector,
}

impl LinguaOracle {
    /// The three supported languages plus the five the strategy can remap.
    /// Anything else the models could report would be ignored downstream.
    const LANGUAGES: [Language; 8] = [
        Language::Arabic,
        Language::French,
        Language::English,
        Language::Spanish,
        Language::Italian,
        Language::Portuguese,
        Language::German,
        Language::Dutch,
    ];

    pub fn new() -> Self {
        info!("Initializing lingua language detector");
        let detector = LanguageDetectorBuilder::from_languages(&Self::LANGUAGES).build();
        Self { detector }
    }
}

impl Default for LinguaOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageOracle for LinguaOracle {
    fn candidates(&self, text: &str) -> Result<Vec<LanguageCandidate>, OracleError> {
        let values = self.detector.compute_language_confidence_values(text);
        Ok(values
            .into_iter()
            .filter(|(_, confidence)| *confidence > 0.0)
            .map(|(lang, confidence)| LanguageCandidate {
                lang: lang.iso_code_639_1().to_string().to_lowercase(),
                prob: confidence,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_sorted_descending() {
        let oracle = LinguaOracle::new();
        let candidates = oracle.candidates("bonjour le monde").unwrap();
        assert!(!candidates.is_empty());
        for pair in candidates.windows(2) {
            assert!(pair[0].prob >= pair[1].prob);
        }
        assert_eq!(candidates[0].lang, "fr");
    }

    #[test]
    fn test_arabic_script_detected() {
        let oracle = LinguaOracle::new();
        let candidates = oracle.candidates("هذا نص عربي قصير").unwrap();
        assert_eq!(candidates[0].lang, "ar");
    }

    #[test]
    fn test_codes_are_lowercase_iso() {
        let oracle = LinguaOracle::new();
        let candidates = oracle.candidates("the quick brown fox").unwrap();
        for candidate in &candidates {
            assert_eq!(candidate.lang, candidate.lang.to_lowercase());
            assert_eq!(candidate.lang.len(), 2);
        }
    }
}

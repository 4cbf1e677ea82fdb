// Character-Frequency Fallback Analyzer
// Classifies a fragment from character-class ratios when the statistical
// backend yields nothing useful

use regex::Regex;

use crate::models::{DetectedLanguage, LanguageAnalysis};
use crate::services::config_store::DetectionConfig;
use crate::services::text_processor::{is_arabic_char, is_french_accented};

pub struct FrequencyAnalyzer {
    number_inside_text_threshold: f64,
}

impl FrequencyAnalyzer {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            number_inside_text_threshold: config.number_inside_text_threshold,
        }
    }

    /// Classify a fragment from character-class ratios alone. Total; never fails.
    pub fn analyze(&self, text: &str) -> LanguageAnalysis {
        // Digits glued to letters are dominated by Arabizi transliteration in
        // caption corpora; treat the pattern as a strong Arabic signal
        // regardless of script.
        let arabizi_re = Regex::new(r"(?i)[0-9][a-z]|[a-z][0-9]").unwrap();
        if arabizi_re.is_match(text) {
            return LanguageAnalysis {
                lang: DetectedLanguage::Ar,
                confidence: self.number_inside_text_threshold,
            };
        }

        if text.is_empty() {
            return LanguageAnalysis { lang: DetectedLanguage::Unknown, confidence: 0.0 };
        }

        let total = text.chars().count() as f64;
        let arabic_count = text.chars().filter(|&c| is_arabic_char(c)).count() as f64;
        let latin_count = text.chars().filter(|c| c.is_ascii_alphabetic()).count() as f64;
        let french_count = text.chars().filter(|&c| is_french_accented(c)).count() as f64;

        let arabic_ratio = arabic_count / total;
        let latin_ratio = latin_count / total;
        let french_ratio = french_count / latin_count.max(1.0);

        if arabic_ratio > 0.5 {
            return LanguageAnalysis { lang: DetectedLanguage::Ar, confidence: arabic_ratio };
        }

        if latin_ratio > 0.5 {
            // Any accented density above 10% of the Latin letters reads as French
            if french_ratio > 0.1 {
                return LanguageAnalysis {
                    lang: DetectedLanguage::Fr,
                    confidence: latin_ratio * (0.5 + french_ratio),
                };
            }
            return LanguageAnalysis { lang: DetectedLanguage::En, confidence: latin_ratio };
        }

        LanguageAnalysis { lang: DetectedLanguage::Unknown, confidence: 0.0 }
    }
}

// Language Detection Service
// Input-liveliness gating, normalization, and assembly of the public result

use crate::models::{DetectedLanguage, DetectionResult};
use crate::services::config_store::DetectionConfig;
use crate::services::text_processor::{has_valid_content, preprocess};

use super::oracle::LanguageOracle;
use super::strategy::DetectStrategy;

pub struct DetectionService {
    strategy: DetectStrategy,
}

impl DetectionService {
    pub fn new(config: DetectionConfig, oracle: Box<dyn LanguageOracle>) -> Self {
        Self { strategy: DetectStrategy::new(config, oracle) }
    }

    /// Classify one record's text. Total: every input maps to a supported
    /// language or one of the sentinels; nothing escapes this boundary.
    pub fn classify(&self, text: &str) -> DetectionResult {
        if text.trim().is_empty() {
            // Trivially empty is a certain outcome
            return DetectionResult {
                text: text.to_string(),
                cleaned: String::new(),
                detected_language: DetectedLanguage::Empty,
                confidence: 1.0,
            };
        }

        let cleaned = preprocess(text);
        if !has_valid_content(&cleaned) {
            // Emptied by cleaning, distinct from trivially empty
            return DetectionResult {
                text: text.to_string(),
                cleaned,
                detected_language: DetectedLanguage::Empty,
                confidence: 0.0,
            };
        }

        let analysis = self.strategy.detect(&cleaned);
        DetectionResult {
            text: text.to_string(),
            cleaned,
            detected_language: analysis.lang,
            confidence: analysis.confidence,
        }
    }
}

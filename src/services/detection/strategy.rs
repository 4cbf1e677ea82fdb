// Detection Strategy
// Direct detection with a high-confidence shortcut, falling back to
// segment-weighted voting that combines oracle candidates, Romance-language
// remapping, and the character-frequency analyzer

use tracing::{debug, warn};

use crate::models::{DetectedLanguage, Lang, LanguageAnalysis};
use crate::services::config_store::DetectionConfig;
use crate::services::text_processor::segment_text;

use super::frequency::FrequencyAnalyzer;
use super::oracle::{LanguageCandidate, LanguageOracle, OracleError};

pub struct DetectStrategy {
    config: DetectionConfig,
    oracle: Box<dyn LanguageOracle>,
    frequency: FrequencyAnalyzer,
}

/// Per-language running vote. Entries are insertion-ordered so a tied
/// maximum resolves to the first-seen language.
struct VoteEntry {
    lang: Lang,
    score: f64,
    weight: f64,
}

impl DetectStrategy {
    pub fn new(config: DetectionConfig, oracle: Box<dyn LanguageOracle>) -> Self {
        let frequency = FrequencyAnalyzer::new(&config);
        Self { config, oracle, frequency }
    }

    /// Detect the language of an already-normalized text. Any backend fault
    /// is absorbed into the `error` sentinel here; nothing propagates.
    pub fn detect(&self, text: &str) -> LanguageAnalysis {
        match self.try_detect(text) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "language backend failed");
                LanguageAnalysis { lang: DetectedLanguage::Error, confidence: 0.0 }
            }
        }
    }

    fn try_detect(&self, text: &str) -> Result<LanguageAnalysis, OracleError> {
        let candidates = self.oracle.candidates(text)?;
        if candidates.is_empty() {
            warn!(text = %text, "no candidates from language backend");
            return Ok(LanguageAnalysis { lang: DetectedLanguage::Error, confidence: 0.0 });
        }

        if let Some(direct) = self.direct_detection(&candidates) {
            return Ok(direct);
        }

        self.segmented_analysis(text)
    }

    /// Fast path: accept the top candidate outright when it is confidently one
    /// of the supported languages. Strictly above the threshold; an exact hit
    /// falls through to segmented voting.
    fn direct_detection(&self, candidates: &[LanguageCandidate]) -> Option<LanguageAnalysis> {
        let primary = candidates.first()?;
        if primary.prob > self.config.high_confidence_threshold {
            if let Some(lang) = Lang::from_code(&primary.lang) {
                return Some(LanguageAnalysis { lang: lang.into(), confidence: primary.prob });
            }
        }
        None
    }

    /// Vote over whitespace segments, weighting each by log10(len + 1) so
    /// longer, more distinctive tokens outvote short ambiguous ones without
    /// any single token swamping the result.
    fn segmented_analysis(&self, text: &str) -> Result<LanguageAnalysis, OracleError> {
        let segments = segment_text(text);
        let mut votes: Vec<VoteEntry> = Vec::new();
        let mut total_length = 0usize;

        for segment in &segments {
            let segment_length = segment.chars().count();
            if segment_length == 0 {
                continue;
            }
            total_length += segment_length;

            let length_weight = ((segment_length + 1) as f64).log10();

            let candidates = self.oracle.candidates(segment)?;
            if candidates.is_empty() {
                let fallback = self.frequency.analyze(segment);
                if let Some(lang) = fallback.lang.as_lang() {
                    add_vote(&mut votes, lang, fallback.confidence * length_weight, length_weight);
                }
                continue;
            }

            for candidate in &candidates {
                if let Some(lang) = Lang::from_code(&candidate.lang) {
                    add_vote(&mut votes, lang, candidate.prob * length_weight, length_weight);
                } else if let Some(mapping) = self.config.romance_mapping(&candidate.lang) {
                    // Redirect the vote to the mapped language, discounted by
                    // the mapping's fixed confidence
                    add_vote(
                        &mut votes,
                        mapping.target_lang,
                        candidate.prob * length_weight * mapping.confidence,
                        length_weight,
                    );
                }
            }
        }

        debug!(segments = segments.len(), total_length, "segmented analysis complete");

        Ok(resolve_votes(&votes, self.config.minimum_confidence_threshold))
    }
}

fn add_vote(votes: &mut Vec<VoteEntry>, lang: Lang, score: f64, weight: f64) {
    if let Some(entry) = votes.iter_mut().find(|e| e.lang == lang) {
        entry.score += score;
        entry.weight += weight;
    } else {
        votes.push(VoteEntry { lang, score, weight });
    }
}

fn resolve_votes(votes: &[VoteEntry], minimum_confidence: f64) -> LanguageAnalysis {
    let mut best: Option<(Lang, f64)> = None;
    for entry in votes {
        if entry.weight <= 0.0 {
            continue;
        }
        let normalized = entry.score / entry.weight;
        // Strictly greater keeps the first-seen language on ties
        if best.map_or(true, |(_, score)| normalized > score) {
            best = Some((entry.lang, normalized));
        }
    }

    match best {
        None => LanguageAnalysis { lang: DetectedLanguage::Unknown, confidence: 0.0 },
        Some((_, score)) if score < minimum_confidence => {
            LanguageAnalysis { lang: DetectedLanguage::Unknown, confidence: score }
        }
        Some((lang, score)) => LanguageAnalysis { lang: lang.into(), confidence: score },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Returns the same candidate list for every input.
    struct FixedOracle(Vec<LanguageCandidate>);

    impl LanguageOracle for FixedOracle {
        fn candidates(&self, _text: &str) -> Result<Vec<LanguageCandidate>, OracleError> {
            Ok(self.0.clone())
        }
    }

    /// Per-text answers; unlisted inputs get an empty candidate list.
    struct MapOracle(HashMap<String, Vec<LanguageCandidate>>);

    impl LanguageOracle for MapOracle {
        fn candidates(&self, text: &str) -> Result<Vec<LanguageCandidate>, OracleError> {
            Ok(self.0.get(text).cloned().unwrap_or_default())
        }
    }

    struct FailingOracle;

    impl LanguageOracle for FailingOracle {
        fn candidates(&self, _text: &str) -> Result<Vec<LanguageCandidate>, OracleError> {
            Err(OracleError::Backend("model unavailable".to_string()))
        }
    }

    fn candidate(lang: &str, prob: f64) -> LanguageCandidate {
        LanguageCandidate { lang: lang.to_string(), prob }
    }

    fn strategy(oracle: Box<dyn LanguageOracle>) -> DetectStrategy {
        DetectStrategy::new(DetectionConfig::default(), oracle)
    }

    #[test]
    fn test_fast_path_accepts_confident_supported_candidate() {
        let strategy = strategy(Box::new(FixedOracle(vec![candidate("en", 0.95)])));
        let analysis = strategy.detect("hello world");
        assert_eq!(analysis.lang, DetectedLanguage::En);
        assert_eq!(analysis.confidence, 0.95);
    }

    #[test]
    fn test_exact_threshold_does_not_take_fast_path() {
        // Top candidate at exactly 0.8: the strict comparison must push the
        // call into segmented voting, where the per-segment answers differ.
        let mut answers = HashMap::new();
        answers.insert("hello world".to_string(), vec![candidate("en", 0.8)]);
        answers.insert("hello".to_string(), vec![candidate("fr", 0.6)]);
        answers.insert("world".to_string(), vec![candidate("fr", 0.6)]);
        let strategy = strategy(Box::new(MapOracle(answers)));

        let analysis = strategy.detect("hello world");
        assert_eq!(analysis.lang, DetectedLanguage::Fr);
        assert!((analysis.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_confident_unsupported_candidate_falls_through() {
        // 0.9 > threshold but "ru" is neither supported nor remappable
        let strategy = strategy(Box::new(FixedOracle(vec![candidate("ru", 0.9)])));
        let analysis = strategy.detect("privet mir zdes");
        assert_eq!(analysis.lang, DetectedLanguage::Unknown);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_no_candidates_is_error() {
        let strategy = strategy(Box::new(MapOracle(HashMap::new())));
        let analysis = strategy.detect("hello world");
        assert_eq!(analysis.lang, DetectedLanguage::Error);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_backend_fault_is_error() {
        let strategy = strategy(Box::new(FailingOracle));
        let analysis = strategy.detect("hello world");
        assert_eq!(analysis.lang, DetectedLanguage::Error);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_romance_remap_single_segment() {
        // Sole candidate {es, 0.9} on a single-segment text: unsupported, so
        // no short-circuit; the vote is remapped to fr and discounted by
        // 0.85, and the length weight cancels in normalization:
        // 0.9 * 0.85 = 0.765
        let mut answers = HashMap::new();
        answers.insert("bonjour".to_string(), vec![candidate("es", 0.9)]);
        let strategy = strategy(Box::new(MapOracle(answers)));

        let analysis = strategy.detect("bonjour");
        assert_eq!(analysis.lang, DetectedLanguage::Fr);
        assert!((analysis.confidence - 0.765).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_fallback_votes_for_silent_segments() {
        // Full text gets a weak candidate (no fast path); the Arabic segment
        // gets nothing from the oracle and falls to the frequency analyzer.
        let mut answers = HashMap::new();
        answers.insert("مرحبا بالعالم".to_string(), vec![candidate("en", 0.5)]);
        let strategy = strategy(Box::new(MapOracle(answers)));

        let analysis = strategy.detect("مرحبا بالعالم");
        assert_eq!(analysis.lang, DetectedLanguage::Ar);
        assert!((analysis.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_confidence_resolves_unknown_with_score() {
        let mut answers = HashMap::new();
        answers.insert("bonjour man meknes".to_string(), vec![candidate("fr", 0.5)]);
        answers.insert("bonjour".to_string(), vec![candidate("fr", 0.3)]);
        answers.insert("man".to_string(), vec![candidate("en", 0.2)]);
        answers.insert("meknes".to_string(), vec![candidate("en", 0.3)]);
        let strategy = strategy(Box::new(MapOracle(answers)));

        let analysis = strategy.detect("bonjour man meknes");
        assert_eq!(analysis.lang, DetectedLanguage::Unknown);
        // Best (fr) normalized score is reported even for the unknown outcome
        assert!((analysis.confidence - 0.3).abs() < 1e-9);
        assert!(analysis.confidence > 0.0);
    }

    #[test]
    fn test_tie_keeps_first_seen_language() {
        let mut answers = HashMap::new();
        answers.insert("aaa bbb".to_string(), vec![candidate("en", 0.5)]);
        answers.insert("aaa".to_string(), vec![candidate("en", 0.5)]);
        answers.insert("bbb".to_string(), vec![candidate("fr", 0.5)]);
        let strategy = strategy(Box::new(MapOracle(answers)));

        let analysis = strategy.detect("aaa bbb");
        assert_eq!(analysis.lang, DetectedLanguage::En);
        assert!((analysis.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_votes_average_across_segments() {
        // Same language on both segments of equal length: the weighted
        // average equals the plain average of the probabilities
        let mut answers = HashMap::new();
        answers.insert("aaa bbb".to_string(), vec![candidate("en", 0.5)]);
        answers.insert("aaa".to_string(), vec![candidate("en", 0.6)]);
        answers.insert("bbb".to_string(), vec![candidate("en", 0.8)]);
        let strategy = strategy(Box::new(MapOracle(answers)));

        let analysis = strategy.detect("aaa bbb");
        assert_eq!(analysis.lang, DetectedLanguage::En);
        assert!((analysis.confidence - 0.7).abs() < 1e-9);
    }
}

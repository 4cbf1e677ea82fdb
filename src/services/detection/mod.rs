// Detection Module
// Language classification core organized into specialized submodules:
// - oracle: the statistical detector behind a swappable trait
// - frequency: character-frequency fallback analyzer
// - strategy: direct detection plus segment-weighted voting
// - service: input gating and result assembly

pub mod frequency;
pub mod oracle;
pub mod service;
pub mod strategy;

pub use frequency::FrequencyAnalyzer;
pub use oracle::{LanguageCandidate, LanguageOracle, LinguaOracle, OracleError};
pub use service::DetectionService;
pub use strategy::DetectStrategy;

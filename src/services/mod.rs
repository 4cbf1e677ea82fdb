// Caplang Core Services

pub mod batch;
pub mod config_store;
pub mod detection;
pub mod text_processor;

pub use batch::*;
pub use config_store::*;
pub use text_processor::*;

// Re-export the detection entry points
pub use detection::{
    DetectStrategy,
    DetectionService,
    FrequencyAnalyzer,
    LanguageCandidate,
    LanguageOracle,
    LinguaOracle,
    OracleError,
};

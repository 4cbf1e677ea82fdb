// Configuration Storage Service
// Detection thresholds and the Romance-language map, with JSON file read/write

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Lang;

/// Redirects a detection of an unsupported but related language to the
/// closest supported one, at a fixed hand-tuned confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RomanceMapping {
    pub target_lang: Lang,
    pub confidence: f64,
}

/// Static classifier configuration. Loaded once at startup and injected into
/// the strategy and analyzer; immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    #[serde(default = "default_high_confidence")]
    pub high_confidence_threshold: f64,
    #[serde(default = "default_minimum_confidence")]
    pub minimum_confidence_threshold: f64,
    #[serde(default = "default_number_inside_text")]
    pub number_inside_text_threshold: f64,
    #[serde(default = "default_romance_map")]
    pub romance_lang_map: HashMap<String, RomanceMapping>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: default_high_confidence(),
            minimum_confidence_threshold: default_minimum_confidence(),
            number_inside_text_threshold: default_number_inside_text(),
            romance_lang_map: default_romance_map(),
        }
    }
}

impl DetectionConfig {
    pub fn romance_mapping(&self, code: &str) -> Option<&RomanceMapping> {
        self.romance_lang_map.get(code)
    }
}

fn default_high_confidence() -> f64 { 0.8 }
fn default_minimum_confidence() -> f64 { 0.4 }
fn default_number_inside_text() -> f64 { 0.7 }

fn default_romance_map() -> HashMap<String, RomanceMapping> {
    let mut map = HashMap::new();
    map.insert("es".to_string(), RomanceMapping { target_lang: Lang::Fr, confidence: 0.85 });
    for code in ["it", "pt", "de", "nl"] {
        map.insert(code.to_string(), RomanceMapping { target_lang: Lang::Fr, confidence: 0.82 });
    }
    map
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("caplang"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file, falling back to defaults when absent
    pub fn load(&self) -> Result<DetectionConfig, String> {
        if !self.config_file.exists() {
            return Ok(DetectionConfig::default());
        }
        Self::load_file(&self.config_file)
    }

    /// Load configuration from an explicit file path
    pub fn load_file(path: &Path) -> Result<DetectionConfig, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &DetectionConfig) -> Result<(), String> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }
}

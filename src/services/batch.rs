// Batch Driver
// Streams a CSV of posts through the detection service and writes the
// annotated outputs

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AnnotatedPost, BatchSummary, DetectedLanguage};
use crate::services::detection::DetectionService;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("column '{0}' not found in input header")]
    MissingColumn(String),
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Header name of the text column.
    pub column: String,
    /// Output CSV path; derived from the input path when absent.
    pub output_path: Option<PathBuf>,
    /// Side file collecting records that resolved to `unknown`.
    pub unknown_path: Option<PathBuf>,
    /// Optional cap on the number of rows processed.
    pub limit: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            column: "caption".to_string(),
            output_path: None,
            unknown_path: None,
            limit: None,
        }
    }
}

/// Presentation mapping for the output CSV: `empty` serializes as "0",
/// `unknown` and `error` as an absent value, languages as their codes.
pub fn output_lang_value(lang: DetectedLanguage) -> &'static str {
    match lang {
        DetectedLanguage::Empty => "0",
        DetectedLanguage::Unknown | DetectedLanguage::Error => "",
        other => other.code(),
    }
}

pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "input".to_string());
    input.with_file_name(format!("{}_output.csv", stem))
}

/// Classify every row of the input CSV independently; one record never
/// aborts the rest. Returns per-language counts.
pub fn process_file(
    service: &DetectionService,
    input: &Path,
    options: &BatchOptions,
) -> Result<BatchSummary, BatchError> {
    let mut reader = csv::Reader::from_path(input)?;
    let headers = reader.headers()?.clone();
    let id_idx = headers
        .iter()
        .position(|h| h == "id")
        .ok_or_else(|| BatchError::MissingColumn("id".to_string()))?;
    let text_idx = headers
        .iter()
        .position(|h| h == options.column)
        .ok_or_else(|| BatchError::MissingColumn(options.column.clone()))?;

    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(input));
    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record(["id", "lang"])?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut unknown_posts: Vec<AnnotatedPost> = Vec::new();
    let mut total = 0usize;

    for record in reader.records() {
        if let Some(limit) = options.limit {
            if total >= limit {
                break;
            }
        }

        let record = record?;
        let id = record.get(id_idx).unwrap_or("").to_string();
        let text = record.get(text_idx).unwrap_or("");

        let result = service.classify(text);
        debug!(
            id = %id,
            lang = %result.detected_language,
            confidence = result.confidence,
            "classified"
        );

        writer.write_record([id.as_str(), output_lang_value(result.detected_language)])?;
        *counts
            .entry(result.detected_language.code().to_string())
            .or_insert(0) += 1;

        if result.detected_language == DetectedLanguage::Unknown {
            unknown_posts.push(AnnotatedPost {
                id,
                text: result.text,
                cleaned: result.cleaned,
                detected_language: result.detected_language,
                confidence: result.confidence,
            });
        }

        total += 1;
    }
    writer.flush()?;

    // Sub-threshold records go to a side file for later inspection
    let unknown_path = options
        .unknown_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("unknown_posts.json"));
    let json = serde_json::to_string_pretty(&unknown_posts)?;
    fs::write(&unknown_path, json)?;

    info!(
        total,
        unknown = unknown_posts.len(),
        output = %output_path.display(),
        "batch complete"
    );

    Ok(BatchSummary { total, counts })
}

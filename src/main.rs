use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::warn;

use caplang::init_logging;
use caplang::services::batch::{process_file, BatchOptions};
use caplang::services::config_store::{ConfigStore, DetectionConfig};
use caplang::services::detection::{DetectionService, LinguaOracle};

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn load_config(args: &[String]) -> Result<DetectionConfig> {
    if let Some(path) = parse_arg_value(args, "--config") {
        return ConfigStore::load_file(Path::new(&path)).map_err(anyhow::Error::msg);
    }

    match ConfigStore::default_config_dir() {
        Some(dir) => Ok(ConfigStore::new(dir).load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default detection config");
            DetectionConfig::default()
        })),
        None => Ok(DetectionConfig::default()),
    }
}

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  caplang <input.csv> [--column <name>] [--config <path.json>] [--out <path.csv>] [--unknown-out <path.json>] [--limit <n>]\n\nNotes:\n  - The input must have an `id` column and a text column (default name: caption).\n  - Output defaults to `<input>_output.csv`; records that resolve to `unknown` are dumped to `unknown_posts.json`."
        );
        bail!("missing input file argument");
    }

    let input = PathBuf::from(&args[1]);
    let config = load_config(&args)?;

    let options = BatchOptions {
        column: parse_arg_value(&args, "--column").unwrap_or_else(|| "caption".to_string()),
        output_path: parse_arg_value(&args, "--out").map(PathBuf::from),
        unknown_path: parse_arg_value(&args, "--unknown-out").map(PathBuf::from),
        limit: parse_arg_value(&args, "--limit").and_then(|s| s.parse().ok()),
    };

    let service = DetectionService::new(config, Box::new(LinguaOracle::new()));
    let summary = process_file(&service, &input, &options)?;

    println!("Processed {} posts", summary.total);
    let mut counts: Vec<(&String, &usize)> = summary.counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (lang, count) in counts {
        let share = if summary.total > 0 {
            *count as f64 / summary.total as f64 * 100.0
        } else {
            0.0
        };
        println!("{}: {} posts ({:.2}%)", lang, count, share);
    }

    Ok(())
}

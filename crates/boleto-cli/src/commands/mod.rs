//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod sanitize;
pub mod search;

use std::path::{Path, PathBuf};

use boleto_core::models::{BoletoConfig, FieldKey, KeywordMap, keyword_map_from_json};
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boleto")
        .join("config.json")
}

/// Configuration from `--config`, else the default file when present,
/// else defaults; the environment is applied last.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BoletoConfig> {
    let config = match config_path {
        Some(path) => BoletoConfig::from_file(Path::new(path))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Loading config from {}", default_path.display());
                BoletoConfig::from_file(&default_path)?
            } else {
                BoletoConfig::default()
            }
        }
    };
    Ok(config.with_env_overrides())
}

/// Keyword definitions from a JSON file, or none.
pub fn load_keywords(path: Option<&Path>) -> anyhow::Result<KeywordMap> {
    let Some(path) = path else {
        return Ok(KeywordMap::new());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read keywords from {}: {}", path.display(), e))?;
    Ok(keyword_map_from_json(&json)?)
}

/// The requested fields, or every builtin field plus every keyword when
/// none were given.
pub fn selected_fields(fields: &[String], keywords: &KeywordMap) -> Vec<String> {
    if !fields.is_empty() {
        return fields.to_vec();
    }
    let mut tokens: Vec<&String> = keywords.keys().collect();
    tokens.sort();
    FieldKey::ALL
        .iter()
        .map(|key| key.as_str().to_string())
        .chain(tokens.into_iter().cloned())
        .collect()
}

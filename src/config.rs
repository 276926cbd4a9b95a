use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Where the pipeline reads its extracts and writes its reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub collateral_path: PathBuf,
    pub model_config_path: PathBuf,
    pub auth_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            collateral_path: PathBuf::from("data/model_collateral.csv"),
            model_config_path: PathBuf::from("data/model_config.csv"),
            auth_dir: PathBuf::from("data/model_auth_rep"),
            out_dir: PathBuf::from("reports"),
        }
    }
}

impl PipelineConfig {
    /// Load a YAML config file, falling back to the defaults when the file
    /// does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
        let path = path.as_ref();
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(PipelineConfig::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

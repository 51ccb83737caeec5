//! TOML configuration deserialisation for lens jobs.

use lensblank_core::types::LensParams;
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub output: OutputConfig,
    /// Lenses to compute, in file order.
    #[serde(rename = "lens", default)]
    pub lenses: Vec<LensEntry>,
}

/// A single named lens in the job.
#[derive(Debug, Deserialize)]
pub struct LensEntry {
    pub name: String,
    #[serde(flatten)]
    pub params: LensParams,
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Report format (default: text).
    #[serde(default)]
    pub format: OutputFormat,
    /// Decimal places in the text report (default: 2).
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            precision: default_precision(),
        }
    }
}

fn default_precision() -> usize {
    2
}

/// Parse a job configuration from TOML text.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    if config.lenses.is_empty() {
        anyhow::bail!("No lenses defined: add at least one [[lens]] table");
    }
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

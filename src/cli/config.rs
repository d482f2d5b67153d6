use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for scoring runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Title used in rendered reports
    #[serde(default = "default_name")]
    pub name: String,

    /// Output directory for reports
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Pretty-print report JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            output_dir: default_output_dir(),
            pretty: default_pretty(),
        }
    }
}

fn default_name() -> String {
    "LLM Benchmark".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./eval-logs")
}

fn default_pretty() -> bool {
    true
}

impl ScoreConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context(format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ScoreConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load the config at `path`, or the defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .context(format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Generate a sample configuration
    pub fn sample() -> Self {
        Self {
            name: "Nightly LLM Benchmark".to_string(),
            ..Default::default()
        }
    }
}

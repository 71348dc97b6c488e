use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Viewer configuration, all fields optional in the TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to the results document
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Datasets graded by an external evaluator instead of exact match
    #[serde(default = "default_evaluator_scored_datasets")]
    pub evaluator_scored_datasets: Vec<String>,
    /// Text shown for absent optional fields
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Output format: plain or json
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("final_results.json")
}

fn default_evaluator_scored_datasets() -> Vec<String> {
    vec!["elyza".to_string()]
}

fn default_placeholder() -> String {
    "N/A".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            evaluator_scored_datasets: default_evaluator_scored_datasets(),
            placeholder: default_placeholder(),
            output: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_parsing() {
        let toml_content = r#"
data_path = "/data/run_42/final_results.json"
evaluator_scored_datasets = ["elyza", "mt_bench"]
placeholder = "-"
output = "json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/data/run_42/final_results.json"));
        assert_eq!(config.evaluator_scored_datasets, vec!["elyza", "mt_bench"]);
        assert_eq!(config.placeholder, "-");
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_config_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "# empty").unwrap();

        let config = Config::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("final_results.json"));
        assert_eq!(config.evaluator_scored_datasets, vec!["elyza"]);
        assert_eq!(config.placeholder, "N/A");
        assert_eq!(config.output, OutputFormat::Plain);
    }

    #[test]
    fn test_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "output = [").unwrap();

        let err = Config::from_file(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/arena.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

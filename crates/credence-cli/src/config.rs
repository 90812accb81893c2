//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use credence_belief::BeliefConfig;
use credence_extractor::ExtractorConfig;
use credence_llm::chat::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use credence_orchestrator::OrchestratorConfig;
use credence_synthesizer::SynthesizerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Plain values must stay ahead of the nested tables so the file serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Location of the SQLite claim store
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// External index service; absent means an in-process index built from the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_endpoint: Option<String>,

    /// Per-request timeout for the index service (seconds)
    #[serde(default = "default_index_timeout_secs")]
    pub index_timeout_secs: u64,

    /// Chat-completion endpoint used for extraction, titles and answers
    #[serde(default = "default_generation_endpoint")]
    pub generation_endpoint: String,

    /// Model requested from the generation endpoint
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,

    /// Upper bound on one answer synthesis call (seconds)
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// Promoting a claim demotes the rest of its line
    #[serde(default = "default_true")]
    pub exclusive_line_mode: bool,

    /// Where ingestion writes chunk and metadata files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Chunking and extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Query pipeline settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".credence").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. A missing file at the default path yields
    /// the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_toml(&fs::read_to_string(path)?)?
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_toml(&fs::read_to_string(&path)?)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Parse configuration from a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize configuration to a TOML document.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every nested section.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        self.orchestrator
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        self.synthesizer().validate().map_err(CliError::Config)?;
        if self.index_timeout_secs == 0 {
            return Err(CliError::Config(
                "index_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.index_endpoint.as_deref().is_some_and(|e| e.trim().is_empty()) {
            return Err(CliError::Config("index_endpoint cannot be blank".to_string()));
        }
        Ok(())
    }

    /// Review policy for this deployment.
    pub fn belief(&self) -> BeliefConfig {
        BeliefConfig {
            exclusive_line_mode: self.exclusive_line_mode,
        }
    }

    /// Synthesis settings.
    pub fn synthesizer(&self) -> SynthesizerConfig {
        SynthesizerConfig {
            generation_timeout_secs: self.generation_timeout_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            index_endpoint: None,
            index_timeout_secs: default_index_timeout_secs(),
            generation_endpoint: default_generation_endpoint(),
            generation_model: default_generation_model(),
            api_token_env: default_api_token_env(),
            generation_timeout_secs: default_generation_timeout_secs(),
            exclusive_line_mode: true,
            data_dir: default_data_dir(),
            extractor: ExtractorConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("knowledge.db")
}

fn default_index_timeout_secs() -> u64 {
    30
}

fn default_generation_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_generation_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_token_env() -> String {
    "HUGGINGFACEHUB_API_TOKEN".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    60
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage_path, PathBuf::from("knowledge.db"));
        assert!(config.index_endpoint.is_none());
        assert!(config.exclusive_line_mode);
        assert!(config.settings.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml(
            "storage_path = \"/tmp/claims.db\"\nexclusive_line_mode = false\n\n[settings]\nformat = \"json\"\n",
        )
        .unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/claims.db"));
        assert!(!config.exclusive_line_mode);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.api_token_env, "HUGGINGFACEHUB_API_TOKEN");
        assert_eq!(config.orchestrator.default_top_k, 5);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            index_endpoint: Some("http://localhost:6333".to_string()),
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/no/such/config.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_section_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[orchestrator]\ndefault_top_k = 0\nretrieval_timeout_secs = 5\n").unwrap();

        assert!(matches!(Config::load(Some(&path)), Err(CliError::Config(_))));
    }

    #[test]
    fn test_belief_and_synthesizer_views() {
        let config = Config {
            exclusive_line_mode: false,
            generation_timeout_secs: 15,
            ..Config::default()
        };
        assert!(!config.belief().exclusive_line_mode);
        assert_eq!(config.synthesizer().generation_timeout_secs, 15);
    }
}

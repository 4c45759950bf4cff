//! Run configuration for the jury.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Command-line flags (`--api-key`, `--base-url`, `--presentation`, `--data`)
//! 2. Environment variables (`OPENAI_API_KEY`, `OPENAI_BASE_URL`, `TRIBUNAL_*`)
//! 3. The TOML config file (`tribunal.toml` unless `--config` names another)
//! 4. Built-in defaults
//!
//! ## Models
//!
//! | Role     | Development    | Presentation |
//! |----------|----------------|--------------|
//! | tribunal | gpt-4.1-mini   | gpt-4.1      |
//! | panel    | gpt-4o-mini    | gpt-4o       |
//! | baseline | same as tribunal              |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::AgentError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CONFIG_FILE: &str = "tribunal.toml";
pub const DEFAULT_DATA_PATH: &str = "Kepler.csv";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_TRIBUNAL_MODEL: &str = "TRIBUNAL_MODEL";
const ENV_PANEL_MODEL: &str = "TRIBUNAL_PANEL_MODEL";
const ENV_BASELINE_MODEL: &str = "TRIBUNAL_BASELINE_MODEL";
const ENV_DATA_PATH: &str = "TRIBUNAL_DATA";

/// Which model tier to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProfile {
    /// Cheaper models for iteration.
    #[default]
    Development,
    /// Larger models for the final demo.
    Presentation,
}

impl ModelProfile {
    pub fn tribunal_model(self) -> &'static str {
        match self {
            Self::Development => "gpt-4.1-mini",
            Self::Presentation => "gpt-4.1",
        }
    }

    pub fn panel_model(self) -> &'static str {
        match self {
            Self::Development => "gpt-4o-mini",
            Self::Presentation => "gpt-4o",
        }
    }
}

/// Contents of `tribunal.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub presentation: Option<bool>,
    pub tribunal_model: Option<String>,
    pub panel_model: Option<String>,
    pub baseline_model: Option<String>,
    pub temperature: Option<f64>,
    pub timeout_secs: Option<u64>,
    pub data: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, AgentError> {
        toml::from_str(content).map_err(|source| AgentError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `explicit` if given (it must exist), else `tribunal.toml` in the
    /// working directory if present, else an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, AgentError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| AgentError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&path, &content)
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub presentation: bool,
    pub data: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct JuryConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub profile: ModelProfile,
    pub tribunal_model: String,
    pub panel_model: String,
    pub baseline_model: String,
    pub temperature: f64,
    pub timeout: Duration,
    pub data_path: PathBuf,
}

impl JuryConfig {
    /// Load from the process environment and the config file.
    pub fn load(config_path: Option<&Path>, cli: &CliOverrides) -> Result<Self, AgentError> {
        let file = FileConfig::discover(config_path)?;
        Self::resolve(file, |key| std::env::var(key).ok(), cli)
    }

    /// Merge the layers. `env` looks up an environment variable.
    pub fn resolve<F>(file: FileConfig, env: F, cli: &CliOverrides) -> Result<Self, AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let profile = if cli.presentation || file.presentation.unwrap_or(false) {
            ModelProfile::Presentation
        } else {
            ModelProfile::Development
        };

        let temperature = file.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AgentError::Configuration(format!(
                "temperature must be within 0.0..=2.0, got {temperature}"
            )));
        }
        let timeout_secs = file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AgentError::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        let tribunal_model = env(ENV_TRIBUNAL_MODEL)
            .or(file.tribunal_model)
            .unwrap_or_else(|| profile.tribunal_model().to_string());
        let panel_model = env(ENV_PANEL_MODEL)
            .or(file.panel_model)
            .unwrap_or_else(|| profile.panel_model().to_string());
        let baseline_model = env(ENV_BASELINE_MODEL)
            .or(file.baseline_model)
            .unwrap_or_else(|| tribunal_model.clone());

        Ok(Self {
            api_key: cli.api_key.clone().or_else(|| env(ENV_API_KEY)).or(file.api_key),
            base_url: cli
                .base_url
                .clone()
                .or_else(|| env(ENV_BASE_URL))
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            profile,
            tribunal_model,
            panel_model,
            baseline_model,
            temperature,
            timeout: Duration::from_secs(timeout_secs),
            data_path: cli
                .data
                .clone()
                .or_else(|| env(ENV_DATA_PATH).map(PathBuf::from))
                .or(file.data)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
        })
    }

    /// The API key, or a configuration error when none was provided.
    pub fn require_api_key(&self) -> Result<&str, AgentError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AgentError::MissingApiKey)
    }
}

mod api;
pub mod defaults;
mod secrets;
mod validation;

use crate::cli::Args;
use crate::error::{GemchatError, Result};
use crate::models::GenerationConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{normalize_endpoint, ApiConfig};
pub use secrets::{
    EnvSecretStore, FileSecretStore, LayeredSecretStore, SecretStore, API_KEY_VAR,
};
pub use validation::{expand_env_var_in_string, parse_flag};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub file: Option<String>,
}

/// Resolved settings for one process. Built once at startup and passed down
/// explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub generation: GenerationConfig,
    pub request_timeout: u64,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        let secrets_file = env::var("GEMCHAT_SECRETS_FILE")
            .ok()
            .or(file_config.secrets.file.clone())
            .map(|path| PathBuf::from(expand_env_var_in_string(&path)));
        let secrets = LayeredSecretStore::env_then_file(secrets_file);

        Self::resolve(args, &file_config, &secrets)
    }

    /// Merge CLI args > env vars > config file > defaults.
    pub fn resolve(args: &Args, file_config: &FileConfig, secrets: &dyn SecretStore) -> Result<Self> {
        let api_key = secrets.api_key();

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env::var("GEMCHAT_API_ENDPOINT").ok())
            .or(file_config.api.endpoint.clone())
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| defaults::DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env::var("GEMCHAT_MODEL").ok())
            .or(file_config.model.default_model.clone())
            .unwrap_or_else(|| defaults::DEFAULT_MODEL.to_string());

        let temperature = args
            .temperature
            .or_else(|| {
                env::var("GEMCHAT_TEMPERATURE")
                    .ok()
                    .and_then(|s| s.parse::<f32>().ok())
            })
            .or(file_config.model.temperature)
            .unwrap_or(defaults::DEFAULT_TEMPERATURE);

        let max_output_tokens = args
            .max_output_tokens
            .or_else(|| {
                env::var("GEMCHAT_MAX_OUTPUT_TOKENS")
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok())
            })
            .or(file_config.model.max_output_tokens)
            .unwrap_or(defaults::DEFAULT_MAX_OUTPUT_TOKENS);

        let generation = GenerationConfig::new(model, temperature, max_output_tokens)?;

        let request_timeout = env::var("GEMCHAT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(file_config.api.request_timeout);
        if request_timeout == 0 {
            return Err(GemchatError::InvalidParameter(
                "request timeout must be at least 1 second".to_string(),
            ));
        }

        let verbose = args.verbose
            || env::var("GEMCHAT_VERBOSE")
                .ok()
                .map(|v| parse_flag(&v))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_key,
            api_endpoint,
            generation,
            request_timeout,
            verbose,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config: FileConfig = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".gemchat.yaml"),
            PathBuf::from(".gemchat.yml"),
            PathBuf::from(".gemchat.json"),
        ];

        if let Some(config_dir) = Self::global_config_dir() {
            paths.push(config_dir.join("gemchat.yaml"));
            paths.push(config_dir.join("gemchat.yml"));
            paths.push(config_dir.join("gemchat.json"));
        }

        paths
    }

    pub fn global_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("gemchat"))
    }

    pub fn example() -> Self {
        FileConfig {
            api: ApiConfig {
                endpoint: Some(defaults::DEFAULT_API_ENDPOINT.to_string()),
                request_timeout: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            model: ModelConfig {
                default_model: Some(defaults::DEFAULT_MODEL.to_string()),
                temperature: Some(defaults::DEFAULT_TEMPERATURE),
                max_output_tokens: Some(defaults::DEFAULT_MAX_OUTPUT_TOKENS),
            },
            session: SessionConfig {
                verbose: Some(false),
            },
            secrets: SecretsConfig {
                file: FileSecretStore::default_path().map(|p| p.display().to_string()),
            },
        }
    }

    /// Write the example config to `path`, refusing to overwrite an existing file.
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(GemchatError::ConfigError(format!(
                "{} already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_yaml::to_string(&Self::example())?;
        fs::write(path, contents)?;
        Ok(())
    }
}

use super::validation::expand_env_var_in_string;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Source of the Gemini API key.
pub trait SecretStore: Send + Sync {
    /// Return the API key, or `None` when this store has no usable value.
    fn api_key(&self) -> Option<String>;
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub struct EnvSecretStore {
    var: String,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::with_var(API_KEY_VAR)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for EnvSecretStore {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok().and_then(non_empty)
    }
}

/// YAML secrets file holding a `GEMINI_API_KEY` entry. Values may reference
/// environment variables with `${VAR}`.
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("gemchat").join("secrets.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read secrets file: {}", self.path.display()))?;
        let secrets: HashMap<String, String> = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse secrets file: {}", self.path.display()))?;
        Ok(secrets)
    }
}

impl SecretStore for FileSecretStore {
    fn api_key(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }

        match self.load() {
            Ok(mut secrets) => secrets
                .remove(API_KEY_VAR)
                .map(|value| expand_env_var_in_string(&value))
                .and_then(non_empty),
            Err(e) => {
                log::warn!("{:#}", e);
                None
            }
        }
    }
}

/// Consults each store in order and returns the first key found.
pub struct LayeredSecretStore {
    stores: Vec<Box<dyn SecretStore>>,
}

impl LayeredSecretStore {
    pub fn new(stores: Vec<Box<dyn SecretStore>>) -> Self {
        Self { stores }
    }

    /// Environment first, then the secrets file.
    pub fn env_then_file(secrets_file: Option<PathBuf>) -> Self {
        let mut stores: Vec<Box<dyn SecretStore>> = vec![Box::new(EnvSecretStore::new())];
        if let Some(path) = secrets_file.or_else(FileSecretStore::default_path) {
            stores.push(Box::new(FileSecretStore::new(path)));
        }
        Self::new(stores)
    }
}

impl SecretStore for LayeredSecretStore {
    fn api_key(&self) -> Option<String> {
        self.stores.iter().find_map(|store| store.api_key())
    }
}

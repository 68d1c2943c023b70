//! Layered application configuration.
//!
//! Values start from [`AppConfig::default`], are overridden by an optional
//! TOML file, then by the `OLLAMA_HOST` environment variable. The CLI applies
//! its own flags on top before calling [`AppConfig::validate`].

use crate::error::ConfigError;
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub ollama: OllamaConfig,
    pub generation: GenerationConfig,
    pub embedding: EmbeddingConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OllamaConfig {
    pub host: String,
    pub request_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OLLAMA_HOST.to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let host = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };

        let mut url = Url::parse(&host).map_err(|_| ConfigError::InvalidValue {
            field: "ollama.host".to_string(),
            value: self.host.clone(),
        })?;

        // Endpoint paths are joined relative to the base, so keep any prefix.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub model: String,
    pub num_synonyms: usize,
    pub system_instruction: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "aya".to_string(),
            num_synonyms: 10,
            system_instruction: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    pub model: String,
    pub similarity_threshold: f32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            similarity_threshold: 0.8,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Defaults, then the file at `path` if any, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(OLLAMA_HOST_ENV).filter(|h| !h.trim().is_empty()) {
            debug!("Using {} from {}", host, OLLAMA_HOST_ENV);
            self.ollama.host = host;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ollama.base_url()?;

        if self.ollama.request_timeout_secs == 0 {
            return Err(invalid("ollama.request_timeout_secs", "0"));
        }
        if self.generation.model.trim().is_empty() {
            return Err(invalid("generation.model", &self.generation.model));
        }
        if self.generation.num_synonyms == 0 {
            return Err(invalid("generation.num_synonyms", "0"));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(invalid("embedding.model", &self.embedding.model));
        }
        if !self.embedding.similarity_threshold.is_finite() {
            return Err(invalid(
                "embedding.similarity_threshold",
                &self.embedding.similarity_threshold.to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

//! Configuration module for the document search system.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - `OLLAMA_URL` as the embedding endpoint override
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DS_` and use double underscores
//! to separate nested levels:
//! - `DS_EMBEDDING__MODEL=all-minilm` sets `embedding.model`
//! - `DS_STORAGE__DIMENSION=384` sets `storage.dimension`
//! - `DS_STORAGE__METRIC=l2` sets `storage.metric`
//!
//! The container marker (`DOCKER_CONTAINER`) is not a setting; it is read
//! once when the embedding endpoint is resolved.

use crate::embedding::{DEFAULT_EMBEDDING_MODEL, EndpointSources, OLLAMA_URL_ENV};
use crate::storage::StoreConfig;
use crate::vector::{DecodePolicy, DistanceMetric, VectorDimension};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory holding the settings file and, by default, the database.
pub const CONFIG_DIR: &str = ".docsearch";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .docsearch is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Document database settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    /// Explicit base URL of the embedding service.
    /// When unset, the container gateway or localhost is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Model to request embeddings from
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Path to the SQLite database (relative paths resolve against the workspace root)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Embedding dimension every stored vector must have
    #[serde(default)]
    pub dimension: VectorDimension,

    /// Distance metric used for ranking
    #[serde(default)]
    pub metric: DistanceMetric,

    /// How stored vectors with unreadable components are handled
    #[serde(default)]
    pub decode_policy: DecodePolicy,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of results returned when no limit is given
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default tracing filter; RUST_LOG takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_database_path() -> PathBuf {
    PathBuf::from(".docsearch/documents.db")
}
fn default_limit() -> usize {
    5
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            embedding: EmbeddingConfig::default(),
            storage: StorageConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: None,
            model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            dimension: VectorDimension::default(),
            metric: DistanceMetric::default(),
            decode_policy: DecodePolicy::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl EmbeddingConfig {
    /// Resolves the embedding service base URL.
    ///
    /// Reads the container marker from the environment, so call this once
    /// at startup and hand the result to the client.
    pub fn resolve_endpoint(&self) -> String {
        EndpointSources::detect(self.url.clone()).resolve()
    }

    /// Request timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl StorageConfig {
    /// Vector parameters for the document store.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            dimension: self.dimension,
            metric: self.metric,
            decode_policy: self.decode_policy,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .docsearch directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::figment(&config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                // If workspace_root is not set in config, detect it
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref()).extract().map_err(Box::new)
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // OLLAMA_URL is the conventional endpoint override
            .merge(
                Env::raw()
                    .only(&[OLLAMA_URL_ENV])
                    .map(|_| "embedding.url".into()),
            )
            // Layer in environment variables with DS_ prefix
            // Use double underscore (__) to separate nested levels
            // Single underscore (_) remains as is within field names
            .merge(Env::prefixed("DS_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".") // Double underscore becomes dot
                    .into()
            }))
    }

    /// Find the workspace root by looking for .docsearch directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .docsearch is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        // Try to parse the config file to check if it's valid
        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!(
                        "Configuration file is corrupted: {e}\nRun 'docsearch init --force' to regenerate."
                    ));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Absolute location of the database file.
    ///
    /// Relative paths are resolved against the workspace root, falling back
    /// to the current directory outside a workspace.
    pub fn database_path(&self) -> PathBuf {
        let path = &self.storage.database_path;
        if path.is_absolute() {
            return path.clone();
        }
        match &self.workspace_root {
            Some(root) => root.join(path),
            None => path.clone(),
        }
    }

    /// Save current configuration to file
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# docsearch Configuration File

# Version of the configuration schema
version = 1

[embedding]
# Base URL of the embedding service. When unset, OLLAMA_URL is used;
# otherwise http://host.docker.internal:11434 inside containers
# (DOCKER_CONTAINER set) and http://localhost:11434 everywhere else.
# url = "http://localhost:11434"

# Model to request embeddings from
model = "{model}"

# Request timeout in seconds (0 disables the timeout)
timeout_secs = {timeout}

[storage]
# SQLite database file (relative to the workspace root)
database_path = ".docsearch/documents.db"

# Must match the output size of embedding.model
# nomic-embed-text: 768, all-minilm: 384, mxbai-embed-large: 1024
dimension = {dimension}

# Ranking metric: "cosine", "l2" or "inner_product"
# Similarity is reported as 1 - distance
metric = "cosine"

# "strict" skips stored vectors with unreadable components,
# "lenient" reads those components as 0.0
decode_policy = "strict"

[search]
# Results returned when --limit is not given
default_limit = {limit}

[logging]
# Default log filter (RUST_LOG overrides it)
level = "{level}"
"#,
            model = default_embedding_model(),
            timeout = default_timeout_secs(),
            dimension = VectorDimension::default(),
            limit = default_limit(),
            level = default_log_level(),
        );

        std::fs::write(&config_path, template)?;

        Ok(config_path)
    }
}

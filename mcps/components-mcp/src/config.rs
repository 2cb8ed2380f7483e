//! Configuration loading for components-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variables (`COMPONENTS_CORPUS_DIR`, `COMPONENTS_PAGE_SIZE`,
//!    `COMPONENTS_SEARCH_TIMEOUT_MS`, `COMPONENTS_WATCH`)
//! 2. The TOML file at `COMPONENTS_MCP_CONFIG`
//! 3. `~/.binks/components.toml`
//! 4. Default values

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::DEFAULT_PAGE_SIZE;
use crate::loader::{CorpusLoader, DEFAULT_EXTENSIONS};
use crate::scheme::{FrameworkRule, SchemeRules};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No corpus directory configured. Set COMPONENTS_CORPUS_DIR or corpus_root in the config file.")]
    MissingCorpusRoot,
    #[error("page_size must be greater than zero")]
    InvalidPageSize,
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuration for the component index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentsConfig {
    /// Root of the component corpus
    #[serde(default)]
    pub corpus_root: Option<PathBuf>,
    /// Maximum number of search results
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Per-search time budget in milliseconds
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,
    /// Reload automatically when corpus files change
    #[serde(default)]
    pub watch: bool,
    /// Quiet period before a watched change triggers a reload
    #[serde(default = "default_watch_debounce_ms")]
    pub watch_debounce_ms: u64,
    /// File extensions treated as component files
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Per-framework path scheme overrides
    #[serde(default)]
    pub schemes: BTreeMap<String, FrameworkRule>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_search_timeout_ms() -> u64 {
    2_000
}

fn default_watch_debounce_ms() -> u64 {
    500
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            corpus_root: None,
            page_size: default_page_size(),
            search_timeout_ms: default_search_timeout_ms(),
            watch: false,
            watch_debounce_ms: default_watch_debounce_ms(),
            extensions: default_extensions(),
            schemes: BTreeMap::new(),
        }
    }
}

impl ComponentsConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                Self::from_file(&path)?
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Config for a known corpus root with default settings
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            corpus_root: Some(root.into()),
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("COMPONENTS_MCP_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".binks").join("components.toml"))
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(dir) = lookup("COMPONENTS_CORPUS_DIR") {
            self.corpus_root = Some(PathBuf::from(dir));
        }
        if let Some(size) = lookup("COMPONENTS_PAGE_SIZE") {
            self.page_size = parse_env("COMPONENTS_PAGE_SIZE", size)?;
        }
        if let Some(ms) = lookup("COMPONENTS_SEARCH_TIMEOUT_MS") {
            self.search_timeout_ms = parse_env("COMPONENTS_SEARCH_TIMEOUT_MS", ms)?;
        }
        if let Some(watch) = lookup("COMPONENTS_WATCH") {
            self.watch = match watch.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "COMPONENTS_WATCH",
                        value: watch,
                    })
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        Ok(())
    }

    pub fn corpus_root(&self) -> Result<&Path, ConfigError> {
        self.corpus_root
            .as_deref()
            .ok_or(ConfigError::MissingCorpusRoot)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn watch_debounce(&self) -> Duration {
        Duration::from_millis(self.watch_debounce_ms)
    }

    pub fn scheme_rules(&self) -> SchemeRules {
        SchemeRules::builtin().with_overrides(&self.schemes)
    }

    /// Loader for the configured corpus
    pub fn loader(&self) -> Result<CorpusLoader, ConfigError> {
        Ok(CorpusLoader::new(self.corpus_root()?)
            .with_rules(self.scheme_rules())
            .with_extensions(&self.extensions))
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

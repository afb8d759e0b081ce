use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Origins allowed by CORS. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Maximum embedding calls in flight while indexing the catalog.
    pub concurrency: usize,
    /// Vector length for the `hash` provider.
    pub dimensions: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub default_k: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON file holding the catalog. `None` uses the built-in events.
    pub path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4000,
            log_level: "info".into(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".into(),
            model: "models/embedding-001".into(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".into(),
            timeout_secs: 30,
            concurrency: 4,
            dimensions: 256,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_k: 2 }
    }
}

/// Returns `~/.event-search/`
pub fn default_app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".event-search")
}

/// Returns the default config file path: `~/.event-search/config.toml`
pub fn default_config_path() -> PathBuf {
    default_app_dir().join("config.toml")
}

impl AppConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    ///
    /// A missing file yields defaults. Runs before logging is initialized, so
    /// problems are returned as errors rather than logged.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (GENAI_API_KEY, EVENT_SEARCH_PROVIDER,
    /// EVENT_SEARCH_PORT, EVENT_SEARCH_LOG_LEVEL, EVENT_SEARCH_CATALOG).
    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(val) = var("GENAI_API_KEY") {
            self.embedding.api_key = Some(val);
        }
        if let Some(val) = var("EVENT_SEARCH_PROVIDER") {
            self.embedding.provider = val;
        }
        if let Some(val) = var("EVENT_SEARCH_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("invalid EVENT_SEARCH_PORT {val:?}"))?;
        }
        if let Some(val) = var("EVENT_SEARCH_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Some(val) = var("EVENT_SEARCH_CATALOG") {
            self.catalog.path = Some(val);
        }
        Ok(())
    }

    /// Resolve the catalog path, expanding `~` if needed.
    pub fn resolved_catalog_path(&self) -> Option<PathBuf> {
        self.catalog.path.as_deref().map(expand_tilde)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

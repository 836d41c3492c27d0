//! Configuration system (layered: code > env > config file).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::RouterError;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.1;
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;

/// Which backend embeds example inputs and conversation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmbeddingBackend {
    /// Remote OpenAI embeddings endpoint.
    OpenAi,
    /// Local hashed bag-of-tokens vectors. Offline use and tests.
    Lexical,
}

/// Router configuration.
///
/// Resolution order, highest first:
/// 1. Values set in code (builder or field assignment)
/// 2. Environment variables (`OPENAI_API_KEY`, `FEWSHOT_*`, `.env`)
/// 3. The TOML config file (`~/.fewshot/config.toml` unless a path is given)
#[derive(Clone, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[builder(into, default = DEFAULT_CHAT_MODEL.to_string())]
    pub chat_model: String,
    #[builder(default = 0.0)]
    pub temperature: f64,
    /// Unset means `openai` when an API key is configured, else `lexical`.
    pub embedding_backend: Option<EmbeddingBackend>,
    #[builder(into, default = DEFAULT_EMBEDDING_MODEL.to_string())]
    pub embedding_model: String,
    #[builder(default = DEFAULT_SIMILARITY_THRESHOLD)]
    pub similarity_threshold: f32,
    #[builder(default = DEFAULT_TOOL_TIMEOUT_SECS)]
    pub tool_timeout_secs: u64,
    pub session_idle_ttl_secs: Option<u64>,
    pub max_sessions: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("temperature", &self.temperature)
            .field("embedding_backend", &self.embedding_backend)
            .field("embedding_model", &self.embedding_model)
            .field("similarity_threshold", &self.similarity_threshold)
            .field("tool_timeout_secs", &self.tool_timeout_secs)
            .field("session_idle_ttl_secs", &self.session_idle_ttl_secs)
            .field("max_sessions", &self.max_sessions)
            .finish()
    }
}

impl RouterConfig {
    /// Load from environment variables on top of the defaults.
    pub fn from_env() -> Result<Self, RouterError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Read a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, RouterError> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            RouterError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// Full layered load: config file (if present), then env overrides, then validation.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, RouterError> {
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    ///
    /// Blank values are ignored; unparseable values are configuration errors.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), RouterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(model) = get("FEWSHOT_CHAT_MODEL") {
            self.chat_model = model;
        }
        if let Some(backend) = parse_var(&get, "FEWSHOT_EMBEDDING_BACKEND")? {
            self.embedding_backend = Some(backend);
        }
        if let Some(model) = get("FEWSHOT_EMBEDDING_MODEL") {
            self.embedding_model = model;
        }
        if let Some(threshold) = parse_var(&get, "FEWSHOT_SIMILARITY_THRESHOLD")? {
            self.similarity_threshold = threshold;
        }
        if let Some(secs) = parse_var(&get, "FEWSHOT_TOOL_TIMEOUT_SECS")? {
            self.tool_timeout_secs = secs;
        }
        if let Some(secs) = parse_var(&get, "FEWSHOT_SESSION_IDLE_TTL_SECS")? {
            self.session_idle_ttl_secs = Some(secs);
        }
        if let Some(max) = parse_var(&get, "FEWSHOT_MAX_SESSIONS")? {
            self.max_sessions = Some(max);
        }
        Ok(())
    }

    /// Reject values the router cannot run with.
    pub fn validate(&self) -> Result<(), RouterError> {
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(RouterError::Configuration(format!(
                "similarity_threshold must be within [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.tool_timeout_secs == 0 {
            return Err(RouterError::Configuration(
                "tool_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.max_sessions == Some(0) {
            return Err(RouterError::Configuration(
                "max_sessions must be greater than zero".into(),
            ));
        }
        if self.embedding_backend == Some(EmbeddingBackend::OpenAi) && self.api_key.is_none() {
            return Err(RouterError::Configuration(
                "the openai embedding backend requires OPENAI_API_KEY".into(),
            ));
        }
        Ok(())
    }

    /// The embedding backend in effect.
    pub fn resolved_embedding_backend(&self) -> EmbeddingBackend {
        match (self.embedding_backend, &self.api_key) {
            (Some(backend), _) => backend,
            (None, Some(_)) => EmbeddingBackend::OpenAi,
            (None, None) => EmbeddingBackend::Lexical,
        }
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn session_idle_ttl(&self) -> Option<Duration> {
        self.session_idle_ttl_secs.map(Duration::from_secs)
    }
}

fn parse_var<T, G>(get: &G, name: &str) -> Result<Option<T>, RouterError>
where
    T: FromStr,
    T::Err: fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| RouterError::Configuration(format!("invalid {name}='{raw}': {e}")))
        })
        .transpose()
}

/// Default config file location: `~/.fewshot/config.toml`.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".fewshot"))
        .unwrap_or_else(|| PathBuf::from(".fewshot"))
        .join("config.toml")
}

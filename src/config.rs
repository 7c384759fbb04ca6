use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RepotidyError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub token_env_var: String,
    pub page_size: u32,
    pub visibility_delay_ms: u64,
    pub delete_delay_ms: u64,
    pub request_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_path")]
    pub logs_dir: PathBuf,
}

fn deserialize_path<'de, D>(deserializer: D) -> std::result::Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(expand_tilde(&s))
}

fn expand_tilde(path: &str) -> PathBuf {
    match dirs::home_dir() {
        Some(home) if path == "~" => home,
        Some(home) => match path.strip_prefix("~/") {
            Some(stripped) => home.join(stripped),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

impl Default for Config {
    fn default() -> Self {
        let base = dirs::home_dir().unwrap_or_else(std::env::temp_dir);

        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_env_var: DEFAULT_TOKEN_ENV_VAR.to_string(),
            page_size: MAX_PAGE_SIZE,
            visibility_delay_ms: 100,
            delete_delay_ms: 200,
            request_timeout_secs: 30,
            logs_dir: base.join(".repotidy").join("logs"),
        }
    }
}

impl Config {
    /// Load `<config_dir>/repotidy/config.yaml`, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match dirs::config_dir().map(|p| p.join("repotidy").join("config.yaml")) {
            Some(path) if path.exists() => Self::load_from(&path),
            other => {
                debug!("config: using defaults (no config file found at {:?})", other);
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RepotidyError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_yml::from_str(&contents)
            .map_err(|e| RepotidyError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("config: loaded from {}", path.display());
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            visibility: Duration::from_millis(self.visibility_delay_ms),
            delete: Duration::from_millis(self.delete_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Delays inserted between consecutive items of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub visibility: Duration,
    pub delete: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            visibility: Duration::from_millis(100),
            delete: Duration::from_millis(200),
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            visibility: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }
}

/// The API token, read once at startup and handed to the client
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn from_env(config: &Config) -> Result<Self> {
        match std::env::var(&config.token_env_var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self(token.trim().to_string())),
            _ => Err(RepotidyError::MissingCredential(config.token_env_var.clone())),
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

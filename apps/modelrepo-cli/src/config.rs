//! Uploader configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/modelrepo/uploader.toml`
//! - Windows: `%APPDATA%/modelrepo/uploader.toml`
//!
//! `RUNPOD_API_URL` and `RUNPOD_API_KEY` override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use modelrepo_transfer::RetryPolicy;
use modelrepo_uploader::UploadOptions;
use serde::{Deserialize, Serialize};

pub const ENV_API_URL: &str = "RUNPOD_API_URL";
pub const ENV_API_KEY: &str = "RUNPOD_API_KEY";

/// Uploader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repository Service GraphQL endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout for Repository Service calls. Session creation
    /// presigns every part URL and can take a while.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Parts of one file uploaded at once.
    #[serde(default = "default_part_concurrency")]
    pub part_concurrency: usize,

    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_retry_max_delay")]
    pub retry_max_delay_ms: u64,
}

fn default_api_url() -> String {
    modelrepo_client::DEFAULT_API_URL.into()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_part_concurrency() -> usize {
    4
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay() -> u64 {
    500
}

fn default_retry_max_delay() -> u64 {
    8000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            request_timeout_secs: default_request_timeout(),
            part_concurrency: default_part_concurrency(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay(),
            retry_max_delay_ms: default_retry_max_delay(),
        }
    }
}

impl Config {
    /// Loads the configuration from `path` (or the platform default),
    /// creating a default file if none exists, then applies environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads `path`, or writes and returns defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // The file may hold an API key.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Overrides fields from non-empty environment variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_url = url.trim().to_string();
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = key.trim().to_string();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Transfer tuning derived from this configuration.
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions {
            part_concurrency: self.part_concurrency.max(1),
            retry: RetryPolicy {
                max_attempts: self.retry_max_attempts.max(1),
                base_delay: Duration::from_millis(self.retry_base_delay_ms),
                max_delay: Duration::from_millis(self.retry_max_delay_ms),
            },
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("modelrepo").join("uploader.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("modelrepo")
            .join("uploader.toml"))
    }
}

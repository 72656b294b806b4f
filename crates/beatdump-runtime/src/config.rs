use crate::sink::OutputFormat;
use crate::{ChunkFailurePolicy, Error, Result};
use beatdump_fetch::{ConnectionConfig, FetchSettings, WindowPolicy};
use beatdump_types::{duration_from_millis, duration_from_secs};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "beatdump.toml";
pub const CONFIG_ENV: &str = "BEATDUMP_CONFIG";
pub const API_KEY_ENV: &str = "BEATDUMP_API_KEY";

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. BEATDUMP_CONFIG environment variable (with tilde expansion)
/// 3. beatdump.toml in the current directory
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return Ok(expand_tilde(&env_path));
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200/metricbeat-*/_search".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: true,
            filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default = "default_cut_off_secs")]
    pub cut_off_secs: u64,
    #[serde(default)]
    pub window: WindowPolicy,
    #[serde(default)]
    pub on_chunk_error: ChunkFailurePolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            step_ms: default_step_ms(),
            limit: default_limit(),
            cut_off_secs: default_cut_off_secs(),
            window: WindowPolicy::default(),
            on_chunk_error: ChunkFailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_step_ms() -> u64 {
    500
}

fn default_limit() -> u64 {
    5000
}

fn default_cut_off_secs() -> u64 {
    1800
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./logs")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Take the API key from BEATDUMP_API_KEY when it is set
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.is_empty()
        {
            self.backend.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.url.trim().is_empty() {
            return Err(Error::Config("backend.url must not be empty".to_string()));
        }
        if self.extract.step_ms == 0 {
            return Err(Error::Config("extract.step_ms must be positive".to_string()));
        }
        if self.extract.limit == 0 {
            return Err(Error::Config("extract.limit must be positive".to_string()));
        }
        if self.extract.cut_off_secs == 0 {
            return Err(Error::Config(
                "extract.cut_off_secs must be positive".to_string(),
            ));
        }
        if self.backend.timeout_secs == 0 {
            return Err(Error::Config(
                "backend.timeout_secs must be positive".to_string(),
            ));
        }
        self.step()?;
        self.cut_off()?;
        Ok(())
    }

    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.backend.url.clone(),
            api_key: self.backend.api_key.clone(),
            timeout: std::time::Duration::from_secs(self.backend.timeout_secs),
            accept_invalid_certs: self.backend.accept_invalid_certs,
        }
    }

    pub fn step(&self) -> Result<Duration> {
        duration_from_millis(self.extract.step_ms)
            .map_err(|err| Error::Config(format!("extract.step_ms: {}", err)))
    }

    pub fn cut_off(&self) -> Result<Duration> {
        duration_from_secs(self.extract.cut_off_secs)
            .map_err(|err| Error::Config(format!("extract.cut_off_secs: {}", err)))
    }

    pub fn fetch_settings(&self) -> Result<FetchSettings> {
        Ok(FetchSettings {
            step: self.step()?,
            limit: self.extract.limit,
            policy: self.extract.window,
            filter: self.backend.filter.clone(),
        })
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.backend.api_key.is_some() {
            copy.backend.api_key = Some("********".to_string());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

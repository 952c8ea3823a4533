use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::FetchOptions;
use crate::selector::SelectionRequest;
use crate::source;

/// Global settings loaded from `~/.config/gribrange/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Limit on each range request, from connect to last byte.
    pub request_timeout_secs: u64,
    /// Limit on establishing a connection.
    pub connect_timeout_secs: u64,
    /// Limit on the index download.
    pub index_timeout_secs: u64,
    /// Optional `User-Agent` sent with every request.
    pub user_agent: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            connect_timeout_secs: 30,
            index_timeout_secs: 60,
            user_agent: None,
        }
    }
}

impl Settings {
    /// Options for the concurrent range requests.
    pub fn range_fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }

    /// Options for the index GET.
    pub fn index_fetch_options(&self) -> FetchOptions {
        FetchOptions {
            request_timeout: Duration::from_secs(self.index_timeout_secs),
            ..self.range_fetch_options()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gribrange")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load settings from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Settings> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = Settings::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<Settings> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))
}

/// One download: which index to read and which records to keep.
///
/// JSON job file shape:
/// `{"idx_url": "...", "parameters": {"TMP": ["2 m above ground"], "PRMSL": []}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// URL of the `.idx` file; the archive is the same URL without `.idx`.
    pub idx_url: String,
    /// Parameter → levels to fetch (empty list = every level).
    pub parameters: SelectionRequest,
    /// Output path; defaults to the archive's file name in the output dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl JobSpec {
    /// Load a job file: `.json` is parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read job file {}", path.display()))?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let job = if is_json {
            Self::from_json_str(&data)
        } else {
            Self::from_toml_str(&data)
        };
        job.with_context(|| format!("invalid job file {}", path.display()))
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let job: JobSpec = serde_json::from_str(data)?;
        job.validate()?;
        Ok(job)
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let job: JobSpec = toml::from_str(data)?;
        job.validate()?;
        Ok(job)
    }

    fn validate(&self) -> Result<()> {
        source::data_url(&self.idx_url)?;
        Ok(())
    }
}

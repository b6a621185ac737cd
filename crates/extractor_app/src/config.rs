//! Client configuration.
//!
//! Resolution order: built-in defaults, then an optional RON file, then
//! `EXTRACTOR_*` environment variables, then command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use extractor_engine::UploadSettings;
use log::LevelFilter;
use serde::Deserialize;

pub const ENV_BASE_URL: &str = "EXTRACTOR_BASE_URL";
pub const ENV_LOG: &str = "EXTRACTOR_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let upload = UploadSettings::default();
        Self {
            base_url: upload.base_url,
            connect_timeout_secs: upload.connect_timeout.as_secs(),
            request_timeout_secs: upload.request_timeout.as_secs(),
            max_response_bytes: upload.max_response_bytes,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, overlaid with the RON file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    pub fn level(&self) -> LevelFilter {
        extractor_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

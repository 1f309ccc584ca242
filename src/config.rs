//! Editor configuration.
//!
//! Values come from, in increasing priority:
//! - built-in defaults,
//! - an optional JSON file (`--config <path>`),
//! - environment variables (`WORKFLOW_EDITOR_*`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::graph::CanvasBounds;
use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

pub const URL_ENV: &str = "WORKFLOW_EDITOR_URL";
pub const TIMEOUT_ENV: &str = "WORKFLOW_EDITOR_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    /// Area in which new nodes are dropped
    #[serde(default)]
    pub canvas: CanvasBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Root of the workflow REST API, e.g. `http://localhost:5000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout unless configured
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: None }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

impl EditorConfig {
    /// Reads the file (if any), applies environment overrides and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => parse_json_file::<EditorConfig>(path)?,
            None => EditorConfig::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        log::debug!("Using configuration {:?}", config);
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(URL_ENV) {
            self.service.base_url = url;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| Error::ConfigError(format!("{} must be a number of seconds, got '{}': {}", TIMEOUT_ENV, raw, e)))?;
            self.service.timeout_secs = Some(secs);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = &self.service.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::ConfigError(format!("service.base_url must be an http(s) URL, got '{}'", url)));
        }

        let CanvasBounds { width, height } = self.canvas;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::ConfigError(format!("canvas bounds must be positive, got {} x {}", width, height)));
        }

        Ok(())
    }
}

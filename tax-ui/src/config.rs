//! Front-end settings.
//!
//! Resolution order, lowest to highest precedence:
//! 1. built-in defaults ([`ServiceConfig::default`]),
//! 2. an optional TOML settings file,
//! 3. the `TAX_SERVICE_ENDPOINT` environment variable,
//! 4. command-line flags.
//!
//! ```toml
//! backend = "http"
//! endpoint = "http://127.0.0.1:8000/calculate-tax"
//! timeout_secs = 10
//! log_level = "debug"
//! log_file = "tax-calculator.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tax_core::ServiceConfig;

/// Overrides the calculator endpoint when set.
pub const ENDPOINT_ENV: &str = "TAX_SERVICE_ENDPOINT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub backend: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid settings file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read settings file '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("cannot parse settings file '{}'", path.display()))
    }

    /// Layer `overrides` on top of `self`; any field set in `overrides` wins.
    pub fn merge(
        self,
        overrides: Settings,
    ) -> Settings {
        Settings {
            backend: overrides.backend.or(self.backend),
            endpoint: overrides.endpoint.or(self.endpoint),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
            log_level: overrides.log_level.or(self.log_level),
            log_file: overrides.log_file.or(self.log_file),
        }
    }

    /// Apply the value of [`ENDPOINT_ENV`], if present and non-blank.
    pub fn with_endpoint_env(
        self,
        value: Option<String>,
    ) -> Settings {
        let endpoint = value.filter(|v| !v.trim().is_empty());
        self.merge(Settings {
            endpoint,
            ..Settings::default()
        })
    }

    pub fn service_config(&self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            backend: self.backend.clone().unwrap_or(defaults.backend),
            endpoint: self.endpoint.clone().unwrap_or(defaults.endpoint),
            timeout: self.timeout_secs.map(Duration::from_secs).or(defaults.timeout),
        }
    }
}

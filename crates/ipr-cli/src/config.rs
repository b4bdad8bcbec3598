//! Configuration management for the IPR CLI
//!
//! Endpoint URLs, default output directory and request timeout. Values come
//! from built-in defaults, then environment variables (the binary loads a
//! `.env` file first when present); command-line flags override both.

use crate::error::{CliError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// InterPro REST API base
pub const DEFAULT_API_URL: &str = "https://www.ebi.ac.uk:443/interpro/api";

/// UniProt REST API base
pub const DEFAULT_UNIPROT_URL: &str = "https://rest.uniprot.org";

/// Directory that receives FASTA downloads
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Per-request timeout. InterPro pages with full sequences can be slow.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 300;

pub const ENV_API_URL: &str = "IPR_API_URL";
pub const ENV_UNIPROT_URL: &str = "IPR_UNIPROT_URL";
pub const ENV_OUTPUT_DIR: &str = "IPR_OUTPUT_DIR";
pub const ENV_API_TIMEOUT_SECS: &str = "IPR_API_TIMEOUT_SECS";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// InterPro API base URL
    pub api_url: String,

    /// UniProt REST base URL
    pub uniprot_url: String,

    /// Default folder for `ipr fetch`
    pub output_dir: PathBuf,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            uniprot_url: DEFAULT_UNIPROT_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from environment variables
    ///
    /// `.env` is loaded once by the binary at startup. The result is not
    /// validated here so that flag overrides can replace bad values first.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of the current values
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            self.api_url = url;
        }

        if let Ok(url) = std::env::var(ENV_UNIPROT_URL) {
            self.uniprot_url = url;
        }

        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }

        if let Ok(secs) = std::env::var(ENV_API_TIMEOUT_SECS) {
            self.timeout_secs = secs.parse().map_err(|_| {
                CliError::config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_API_TIMEOUT_SECS, secs
                ))
            })?;
        }

        Ok(self)
    }

    /// Override the InterPro API base URL
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the UniProt base URL
    pub fn with_uniprot_url(mut self, url: impl Into<String>) -> Self {
        self.uniprot_url = url.into();
        self
    }

    /// Check that both base URLs parse and use http(s)
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("API URL", &self.api_url), ("UniProt URL", &self.uniprot_url)] {
            let url = Url::parse(value)
                .map_err(|e| CliError::config(format!("invalid {} '{}': {}", name, value, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(CliError::config(format!(
                    "{} '{}' must use http or https",
                    name, value
                )));
            }
        }

        if self.timeout_secs == 0 {
            return Err(CliError::config("request timeout must be at least 1 second"));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

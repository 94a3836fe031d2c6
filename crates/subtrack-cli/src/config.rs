//! CLI configuration
//!
//! Loaded from `~/.config/subtrack/config.toml`, with environment
//! variables (`SUBTRACK_API_URL`, `SUBTRACK_API_TOKEN`) taking precedence
//! over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use subtrack_core::{Currency, UserSettings};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliConfig {
    /// Backend API base URL
    pub api_url: Option<String>,
    /// Bearer token for the backend
    pub token: Option<String>,
    /// Display currency for reports (NGN or USD)
    pub currency: Option<String>,
    /// Default reminder lead time in days
    pub reminder_days: Option<u32>,
}

impl CliConfig {
    /// Load config from the given path, or the default location
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// API base URL, env var first, then config file
    pub fn api_url(&self) -> Result<String> {
        std::env::var("SUBTRACK_API_URL")
            .ok()
            .or_else(|| self.api_url.clone())
            .context("No API URL configured (set SUBTRACK_API_URL or api_url in config.toml)")
    }

    /// Bearer token, env var first, then config file
    pub fn token(&self) -> Option<String> {
        std::env::var("SUBTRACK_API_TOKEN").ok().or_else(|| self.token.clone())
    }

    /// Engine settings derived from the config
    pub fn user_settings(&self) -> Result<UserSettings> {
        let defaults = UserSettings::default();
        let display_currency = match &self.currency {
            Some(s) => s
                .parse::<Currency>()
                .map_err(|e| anyhow::anyhow!("Invalid currency in config: {}", e))?,
            None => defaults.display_currency,
        };
        Ok(UserSettings {
            display_currency,
            default_reminder_days: self.reminder_days.unwrap_or(defaults.default_reminder_days),
        })
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("subtrack").join("config.toml"))
}

//! Configuration Management
//!
//! Handles persistent configuration storage for tclub.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// API base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Environment variable overriding the configured API URL
pub const API_URL_ENV: &str = "TCLUB_API_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Club API base URL
    #[serde(default)]
    pub api_url: Option<String>,
    /// Theme name (builtin or skin file)
    #[serde(default)]
    pub theme: Option<String>,
    /// Rows per table page, overriding the resource default
    #[serde(default)]
    pub items_per_page: Option<usize>,
    /// Last viewed screen
    #[serde(default)]
    pub last_view: Option<String>,
}

impl Config {
    /// Directory holding config, log and skins
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tclub"))
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                Self::default()
            },
        }
    }

    /// Parse config JSON, falling back to defaults on malformed input
    pub fn parse(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config: {}", e);
            Self::default()
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective API URL (CLI > environment > config > default)
    pub fn effective_api_url(&self, cli: Option<&str>) -> String {
        Self::resolve_api_url(
            cli,
            std::env::var(API_URL_ENV).ok().as_deref(),
            self.api_url.as_deref(),
        )
    }

    fn resolve_api_url(cli: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
        [cli, env, config]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    /// Get effective theme name (CLI > config > default)
    pub fn effective_theme(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.theme.clone())
            .unwrap_or_else(|| crate::theme::DEFAULT_THEME.to_string())
    }

    /// Set last view and save
    pub fn set_last_view(&mut self, view: &str) -> Result<()> {
        self.last_view = Some(view.to_string());
        self.save()
    }
}

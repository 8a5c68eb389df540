//! Application configuration management.
//!
//! This module handles loading the application configuration,
//! which holds optional overrides for the feed endpoint and cache location.
//!
//! Configuration is stored at `~/.config/quakewatch/config.json`.
//! `QUAKEWATCH_FEED_URL` and `QUAKEWATCH_CACHE_DIR` take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::USGS_QUERY_URL;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "quakewatch";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const FEED_URL_ENV: &str = "QUAKEWATCH_FEED_URL";
const CACHE_DIR_ENV: &str = "QUAKEWATCH_CACHE_DIR";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load the config file (defaults if absent), then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(
            std::env::var(FEED_URL_ENV).ok(),
            std::env::var(CACHE_DIR_ENV).ok(),
        );
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    fn apply_overrides(&mut self, feed_url: Option<String>, cache_dir: Option<String>) {
        if let Some(url) = feed_url.filter(|u| !u.trim().is_empty()) {
            self.feed_url = Some(url);
        }
        if let Some(dir) = cache_dir.filter(|d| !d.trim().is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn feed_url(&self) -> &str {
        self.feed_url.as_deref().unwrap_or(USGS_QUERY_URL)
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Presentation settings stored at `~/.config/holofolio/site.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub window_title: String,
    pub headline: String,
    pub tagline: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            window_title: "Holofolio".to_string(),
            headline: "Hello, I build things".to_string(),
            tagline: "Software engineer · systems · interfaces".to_string(),
        }
    }
}

/// Returns the directory where Holofolio keeps its files (`~/.config/holofolio/`).
pub fn config_dir() -> Result<PathBuf, FolioError> {
    let base = dirs_next::config_dir().ok_or(FolioError::NoConfigDir)?;
    Ok(base.join("holofolio"))
}

/// Path of the key-value preference table.
pub fn preferences_path() -> Result<PathBuf, FolioError> {
    Ok(config_dir()?.join("preferences.toml"))
}

/// Loads the site config, returning defaults if the file doesn't exist.
pub fn load_site_config() -> Result<SiteConfig, FolioError> {
    load_site_config_from(&config_dir()?.join("site.toml"))
}

/// Loads a site config from an explicit path.
pub fn load_site_config_from(path: &Path) -> Result<SiteConfig, FolioError> {
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

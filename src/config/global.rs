//! Global configuration.
//!
//! Loaded from ~/.config/toolcat/toolcat.yml or .toolcat.yml

use eyre::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration for toolcat.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Catalog sources.
    pub catalogs: CatalogsConfig,

    /// Lint behaviour.
    pub lint: LintConfig,

    /// Base URL per tool type.
    pub endpoints: EndpointsConfig,
}

impl GlobalConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .toolcat.yml in current directory
    /// 3. ~/.config/toolcat/toolcat.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".toolcat.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .toolcat.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .toolcat.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("toolcat").join("toolcat.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.catalogs.paths.iter().any(|p| p.trim().is_empty()) {
            eyre::bail!("catalogs.paths must not contain empty entries");
        }
        for (tool_type, base) in &self.endpoints.urls {
            reqwest::Url::parse(base).with_context(|| format!("endpoints.{} is not a valid URL: {}", tool_type, base))?;
        }
        Ok(())
    }
}

/// Catalog source paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogsConfig {
    /// Files, directories or glob patterns; "builtin" selects the shipped catalogs.
    pub paths: Vec<String>,
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                crate::config::BUILTIN_SOURCE.to_string(),
                "~/.config/toolcat/catalogs".to_string(),
                ".toolcat/catalogs".to_string(),
            ],
        }
    }
}

/// Lint settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LintConfig {
    /// Treat warnings as failures.
    pub strict: bool,
}

/// Base URLs keyed by tool `type`.
///
/// Entries from a config file are layered over the defaults.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct EndpointsConfig {
    pub urls: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for EndpointsConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let overrides = HashMap::<String, String>::deserialize(deserializer)?;
        let mut endpoints = Self::default();
        endpoints.urls.extend(overrides);
        Ok(endpoints)
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        let mut urls = HashMap::new();
        urls.insert("Monarch".to_string(), crate::config::DEFAULT_MONARCH_URL.to_string());
        urls.insert("KEGG".to_string(), crate::config::DEFAULT_KEGG_URL.to_string());
        urls.insert("TCGA".to_string(), crate::config::DEFAULT_TCGA_URL.to_string());
        Self { urls }
    }
}

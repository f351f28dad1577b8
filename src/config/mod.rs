//! Configuration system for toolcat.
//!
//! Global config (~/.config/toolcat/toolcat.yml or .toolcat.yml) names the
//! catalog sources, lint strictness and endpoint base URLs.

use eyre::{Context, Result};
use std::path::{Path, PathBuf};

use toolcat::tools::ToolCatalog;

pub use self::global::{CatalogsConfig, EndpointsConfig, GlobalConfig, LintConfig};

mod global;

/// Short name used by the binary.
pub type Config = GlobalConfig;

/// Catalog path entry that selects the shipped catalogs.
pub const BUILTIN_SOURCE: &str = "builtin";

/// Default Monarch Initiative API base.
pub const DEFAULT_MONARCH_URL: &str = "https://api.monarchinitiative.org/v3/api";

/// Default KEGG REST base.
pub const DEFAULT_KEGG_URL: &str = "https://rest.kegg.jp";

/// Default Firebrowse (TCGA) API base.
pub const DEFAULT_TCGA_URL: &str = "http://firebrowse.org/api/v1";

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Load the catalog named by the config, then the extra paths.
///
/// Source order (later overrides earlier):
/// 1. Config `catalogs.paths` in order; missing plain paths are skipped
/// 2. Extra paths from the command line; these must exist
pub fn load_catalog(config: &Config, extra: &[PathBuf]) -> Result<ToolCatalog> {
    let mut catalog = ToolCatalog::new();

    for source in &config.catalogs.paths {
        if source == BUILTIN_SOURCE {
            catalog.merge(ToolCatalog::builtin().context("Failed to load built-in catalogs")?);
            continue;
        }

        let path = expand_home(source);
        let path_str = path.to_string_lossy().to_string();
        if !is_pattern(&path_str) && !path.exists() {
            log::debug!("Skipping missing catalog source {}", path.display());
            continue;
        }
        catalog.merge(load_source(&path_str)?);
    }

    for path in extra {
        if !path.exists() && !is_pattern(&path.to_string_lossy()) {
            eyre::bail!("Catalog source not found: {}", path.display());
        }
        catalog.merge(load_source(&path.to_string_lossy())?);
    }

    log::info!("Catalog ready with {} tools", catalog.len());
    Ok(catalog)
}

fn load_source(source: &str) -> Result<ToolCatalog> {
    ToolCatalog::from_paths(&[source]).with_context(|| format!("Failed to load catalog from {}", source))
}

/// Read the raw records of one catalog file, for linting and normalizing.
pub fn read_records(path: &Path) -> Result<Vec<toolcat::tools::ToolDescriptor>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    ToolCatalog::parse_records(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

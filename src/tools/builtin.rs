//! Catalogs shipped with the crate

use crate::error::Result;

use super::catalog::ToolCatalog;

/// Monarch Initiative phenotype/disease tools
pub const MONARCH_TOOLS: &str = include_str!("../../catalogs/monarch_tools.json");

/// Agent control signals
pub const META_TOOLS: &str = include_str!("../../catalogs/meta_tools.json");

/// KEGG REST tools
pub const KEGG_TOOLS: &str = include_str!("../../catalogs/kegg_tools.json");

/// TCGA expression tools (Firebrowse)
pub const TCGA_TOOLS: &str = include_str!("../../catalogs/tcga_tools.json");

/// Named built-in catalog documents, in merge order
pub fn builtin_sources() -> [(&'static str, &'static str); 4] {
    [
        ("monarch", MONARCH_TOOLS),
        ("meta", META_TOOLS),
        ("kegg", KEGG_TOOLS),
        ("tcga", TCGA_TOOLS),
    ]
}

/// Look up one built-in document by name
pub fn builtin_source(name: &str) -> Option<&'static str> {
    builtin_sources()
        .into_iter()
        .find(|(source, _)| *source == name)
        .map(|(_, json)| json)
}

impl ToolCatalog {
    /// All built-in catalogs merged
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for (source, json) in builtin_sources() {
            let part = Self::from_json(json)?;
            log::debug!("Loaded {} built-in tools from '{}'", part.len(), source);
            catalog.merge(part);
        }
        Ok(catalog)
    }
}

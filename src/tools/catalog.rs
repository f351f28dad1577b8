//! Tool catalog loading from JSON
//!
//! Loads tool descriptors from JSON arrays and provides lookup methods.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{CatalogError, Result};

use super::definition::{ToolDescriptor, ToolKind};

/// Catalog of tool descriptors, kept in load order
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: HashMap<String, ToolDescriptor>,
    order: Vec<String>,
}

impl ToolCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog document into records without indexing them.
    ///
    /// Duplicates survive here so the linter can see them.
    pub fn parse_records(content: &str) -> Result<Vec<ToolDescriptor>> {
        let document: Value = serde_json::from_str(content)?;
        let items = document
            .as_array()
            .ok_or_else(|| CatalogError::Parse("catalog must be a JSON array of tool objects".to_string()))?;

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            Self::check_shape(index, item)?;
            let tool: ToolDescriptor = serde_json::from_value(item.clone())
                .map_err(|e| CatalogError::Parse(format!("record {}: {}", index, e)))?;
            records.push(tool);
        }
        Ok(records)
    }

    /// Required keys and their JSON types, checked before typed decoding
    fn check_shape(index: usize, item: &Value) -> Result<()> {
        let object = item
            .as_object()
            .ok_or_else(|| CatalogError::Parse(format!("record {} is not an object", index)))?;

        for key in ["name", "description"] {
            match object.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(CatalogError::Parse(format!("record {}: '{}' must be a string", index, key)));
                }
                None => {
                    return Err(CatalogError::Parse(format!("record {}: missing '{}'", index, key)));
                }
            }
        }
        match object.get("parameter") {
            Some(Value::Object(_)) => Ok(()),
            Some(_) => Err(CatalogError::Parse(format!("record {}: 'parameter' must be an object", index))),
            None => Err(CatalogError::Parse(format!("record {}: missing 'parameter'", index))),
        }
    }

    /// Build a catalog from records, rejecting duplicate names
    pub fn from_records(records: Vec<ToolDescriptor>) -> Result<Self> {
        let mut catalog = Self::new();
        for tool in records {
            if catalog.contains(&tool.name) {
                return Err(CatalogError::DuplicateTool(tool.name));
            }
            catalog.add(tool);
        }
        Ok(catalog)
    }

    /// Load catalog from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Self::from_records(Self::parse_records(content)?)
    }

    /// Load catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content).map_err(|e| match e {
            CatalogError::Parse(msg) => CatalogError::Parse(format!("{}: {}", path.display(), msg)),
            CatalogError::Json(err) => CatalogError::Parse(format!("{}: {}", path.display(), err)),
            other => other,
        })?;
        log::debug!("Loaded {} tools from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load and merge catalogs from files, directories or glob patterns.
    ///
    /// Later sources override earlier ones by name.
    pub fn from_paths<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let mut catalog = Self::new();
        for source in sources {
            for path in resolve_source(source.as_ref())? {
                catalog.merge(Self::from_file(&path)?);
            }
        }
        Ok(catalog)
    }

    /// Merge another catalog into this one; its records win on name clashes
    pub fn merge(&mut self, other: ToolCatalog) {
        let ToolCatalog { mut tools, order } = other;
        for name in order {
            if let Some(tool) = tools.remove(&name) {
                if self.contains(&name) {
                    log::warn!("Tool '{}' overridden by a later catalog source", name);
                }
                self.add(tool);
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// List all tool names in load order
    pub fn list(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Get all tools in load order
    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    /// Get number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Add a tool, replacing any record with the same name in place
    pub fn add(&mut self, tool: ToolDescriptor) {
        if !self.tools.contains_key(&tool.name) {
            self.order.push(tool.name.clone());
        }
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Remove a tool from the catalog
    pub fn remove(&mut self, name: &str) -> Option<ToolDescriptor> {
        let removed = self.tools.remove(name)?;
        self.order.retain(|n| n != name);
        Some(removed)
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tools of the given kind
    pub fn by_kind(&self, kind: ToolKind) -> Vec<&ToolDescriptor> {
        self.all().filter(|t| t.kind() == kind).collect()
    }

    pub fn api_tools(&self) -> Vec<&ToolDescriptor> {
        self.by_kind(ToolKind::Api)
    }

    pub fn meta_tools(&self) -> Vec<&ToolDescriptor> {
        self.by_kind(ToolKind::Meta)
    }

    /// Tools with the given type tag (case-insensitive)
    pub fn by_type(&self, tool_type: &str) -> Vec<&ToolDescriptor> {
        self.all()
            .filter(|t| t.tool_type.as_deref().is_some_and(|ty| ty.eq_ignore_ascii_case(tool_type)))
            .collect()
    }

    /// Tools carrying the given label (case-insensitive)
    pub fn by_label(&self, label: &str) -> Vec<&ToolDescriptor> {
        self.all().filter(|t| t.has_label(label)).collect()
    }

    /// Tools whose name, description or labels contain the keyword
    pub fn find(&self, keyword: &str) -> Vec<&ToolDescriptor> {
        self.all().filter(|t| t.matches_keyword(keyword)).collect()
    }

    /// Distinct type tags in load order
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for ty in self.all().filter_map(|t| t.tool_type.as_deref()) {
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        types
    }

    /// Serialize all records back to a pretty JSON array
    pub fn to_json_pretty(&self) -> Result<String> {
        let records: Vec<&ToolDescriptor> = self.all().collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

/// Expand one catalog source into the JSON files it names
fn resolve_source(source: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(source);

    if path.is_dir() {
        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_file() && entry_path.extension().is_some_and(|ext| ext == "json") {
                files.push(entry_path);
            }
        }
        files.sort();
        log::debug!("Catalog directory {} has {} files", path.display(), files.len());
        return Ok(files);
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries =
        glob::glob(source).map_err(|e| CatalogError::Parse(format!("Invalid catalog pattern '{}': {}", source, e)))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry_path = entry.map_err(|e| CatalogError::Io(e.into()))?;
        if entry_path.is_file() {
            files.push(entry_path);
        }
    }
    if files.is_empty() {
        log::warn!("Catalog source '{}' matched no files", source);
    }
    Ok(files)
}

//! Turning a tool call into a request URL
//!
//! Defines the RequestBuilder trait, the generic template builder, and
//! RequestPlanner which picks a builder and base URL by tool type.

use std::collections::HashMap;

use reqwest::Url;
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};
use crate::tools::{ToolCatalog, ToolDescriptor};

use super::kegg::{KEGG_TYPE, KeggRequestBuilder};
use super::prepared::PreparedRequest;
use super::template;

/// Trait for building a request from a tool call
pub trait RequestBuilder: Send + Sync {
    /// Resolve path and query for one call; nothing is sent
    fn prepare(&self, tool: &ToolDescriptor, args: &Value) -> Result<PreparedRequest>;
}

/// Generic builder: query template merge plus `{placeholder}` substitution
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRequestBuilder;

impl TemplateRequestBuilder {
    fn placeholder_value(
        tool: &ToolDescriptor,
        merged: &mut Map<String, Value>,
        placeholder: &str,
    ) -> Result<String> {
        if let Some(value) = merged.shift_remove(placeholder) {
            return Ok(template::path_text(&value, ","));
        }

        // Single required argument stands in for an undeclared placeholder
        if let [only] = tool.parameter.required_names().as_slice() {
            if let Some(value) = merged.shift_remove(only) {
                log::warn!(
                    "Tool '{}': filling placeholder '{{{}}}' from required argument '{}'",
                    tool.name,
                    placeholder,
                    only
                );
                return Ok(template::path_text(&value, ","));
            }
        }

        Err(CatalogError::UnresolvedPlaceholder {
            tool: tool.name.clone(),
            placeholder: placeholder.to_string(),
        })
    }
}

impl RequestBuilder for TemplateRequestBuilder {
    fn prepare(&self, tool: &ToolDescriptor, args: &Value) -> Result<PreparedRequest> {
        let mut merged = template::merge_arguments(tool, args)?;
        let url_template = tool.tool_url.as_deref().unwrap_or("/");
        let path = template::render_path(url_template, |placeholder| {
            Self::placeholder_value(tool, &mut merged, placeholder)
        })?;

        let mut request = PreparedRequest::new(tool.name.clone(), path);
        for (key, value) in &merged {
            request.query.extend(template::query_pairs(key, value));
        }
        Ok(request)
    }
}

/// Picks a builder and base URL for each tool by its `type` tag
pub struct RequestPlanner {
    endpoints: HashMap<String, String>,
    builders: HashMap<String, Box<dyn RequestBuilder>>,
    fallback: Box<dyn RequestBuilder>,
}

impl RequestPlanner {
    /// Planner with the given base URLs per type; KEGG rules registered
    pub fn new(endpoints: HashMap<String, String>) -> Self {
        Self {
            endpoints,
            builders: HashMap::new(),
            fallback: Box::new(TemplateRequestBuilder),
        }
        .with_builder(KEGG_TYPE, KeggRequestBuilder)
    }

    /// Register a builder for one tool type
    pub fn with_builder(mut self, tool_type: impl Into<String>, builder: impl RequestBuilder + 'static) -> Self {
        self.builders.insert(tool_type.into(), Box::new(builder));
        self
    }

    /// Set or replace the base URL for a tool type
    pub fn with_endpoint(mut self, tool_type: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.endpoints.insert(tool_type.into(), base_url.into());
        self
    }

    pub fn endpoint(&self, tool_type: &str) -> Option<&str> {
        self.endpoints.get(tool_type).map(|s| s.as_str())
    }

    /// Path and query for a call, without a base URL
    pub fn prepare(&self, tool: &ToolDescriptor, args: &Value) -> Result<PreparedRequest> {
        if tool.is_meta() {
            return Err(CatalogError::NotDispatchable(tool.name.clone()));
        }
        let builder = tool
            .tool_type
            .as_deref()
            .and_then(|ty| self.builders.get(ty))
            .unwrap_or(&self.fallback);
        builder.prepare(tool, args)
    }

    /// Full URL for calling `name` with `args`
    pub fn plan(&self, catalog: &ToolCatalog, name: &str, args: &Value) -> Result<Url> {
        let tool = catalog
            .get(name)
            .ok_or_else(|| CatalogError::ToolNotFound(name.to_string()))?;
        let request = self.prepare(tool, args)?;

        let tool_type = tool.tool_type.as_deref().unwrap_or_default();
        let base = self
            .endpoint(tool_type)
            .ok_or_else(|| CatalogError::NoEndpoint(tool_type.to_string()))?;
        let url = request.url(base)?;
        log::info!("Planned {} -> {}", name, url);
        Ok(url)
    }
}

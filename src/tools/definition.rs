//! Tool descriptor data model
//!
//! Mirrors the on-disk JSON shape of a catalog record. Unknown keys are kept
//! so a record survives parse -> serialize -> parse unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::request::template;

use super::meta::MetaTool;

/// Key used for required-argument lists, at either placement
pub const REQUIRED_KEY: &str = "required";

/// Whether a record describes an external endpoint or an agent control signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// Backed by an HTTP API; carries query_schema/label/type/tool_url
    Api,
    /// Finish, Tool_RAG, CallAgent
    Meta,
}

impl ToolKind {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "api" => Some(Self::Api),
            "meta" => Some(Self::Meta),
            _ => None,
        }
    }
}

/// JSON-schema-like parameter block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Schema type, normally "object"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Declared arguments. `Some(None)` is an explicit JSON null.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_present")]
    pub properties: Option<Option<Map<String, Value>>>,

    /// Required argument names at the top-level placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Distinguishes `"properties": null` from an absent key.
fn deserialize_present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ParameterSchema {
    /// Object schema with the given properties and top-level required list
    pub fn object(properties: Map<String, Value>, required: Vec<String>) -> Self {
        Self {
            schema_type: Some("object".to_string()),
            properties: Some(Some(properties)),
            required: if required.is_empty() { None } else { Some(required) },
            extra: Map::new(),
        }
    }

    /// The properties map, if present and not null
    pub fn properties_map(&self) -> Option<&Map<String, Value>> {
        self.properties.as_ref().and_then(|p| p.as_ref())
    }

    /// Declared argument names, excluding a misplaced `required` list
    pub fn property_names(&self) -> Vec<&str> {
        self.properties_map()
            .map(|props| {
                props
                    .iter()
                    .filter(|(key, value)| !(key.as_str() == REQUIRED_KEY && value.is_array()))
                    .map(|(key, _)| key.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check whether an argument is declared
    pub fn declares(&self, name: &str) -> bool {
        self.property_names().contains(&name)
    }

    /// The schema of one declared argument
    pub fn property(&self, name: &str) -> Option<&Value> {
        if !self.declares(name) {
            return None;
        }
        self.properties_map().and_then(|props| props.get(name))
    }

    /// Required names found inside `properties`, if any
    pub fn nested_required(&self) -> Option<Vec<String>> {
        let value = self.properties_map()?.get(REQUIRED_KEY)?;
        let items = value.as_array()?;
        Some(items.iter().filter_map(|v| v.as_str().map(String::from)).collect())
    }

    /// Union of both `required` placements, first-seen order, no duplicates
    pub fn required_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let top = self.required.iter().flatten().cloned();
        let nested = self.nested_required().into_iter().flatten();
        for name in top.chain(nested) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Whether `required` sits inside `properties`
    pub fn has_nested_required(&self) -> bool {
        self.nested_required().is_some()
    }

    /// Move a nested `required` list to the top level
    pub fn normalize(&mut self) {
        if !self.has_nested_required() {
            return;
        }
        let merged = self.required_names();
        if let Some(Some(props)) = self.properties.as_mut() {
            props.shift_remove(REQUIRED_KEY);
        }
        self.required = Some(merged);
    }

    /// Normalized form as a plain JSON schema, for argument validation
    pub fn to_json_schema(&self) -> Value {
        let mut normalized = self.clone();
        normalized.normalize();

        let mut schema = normalized.extra.clone();
        schema.insert(
            "type".to_string(),
            Value::String(normalized.schema_type.as_deref().unwrap_or("object").to_string()),
        );
        if let Some(props) = normalized.properties_map() {
            schema.insert("properties".to_string(), Value::Object(props.clone()));
        }
        if let Some(required) = normalized.required {
            schema.insert(
                REQUIRED_KEY.to_string(),
                Value::Array(required.into_iter().map(Value::String).collect()),
            );
        }
        Value::Object(schema)
    }
}

/// A single catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name within the catalog
    pub name: String,
    /// Free text for humans and LLMs
    pub description: String,
    /// Accepted arguments
    pub parameter: ParameterSchema,
    /// Defaults, fixed filters and pagination merged with caller arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_schema: Option<Map<String, Value>>,
    /// Ordered classification tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Vec<String>>,
    /// Integration family, e.g. "Monarch"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
    /// Relative path template, e.g. "/entity/{url_key}"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolDescriptor {
    /// Create a bare descriptor with an empty object schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter: ParameterSchema::object(Map::new(), Vec::new()),
            query_schema: None,
            label: None,
            tool_type: None,
            tool_url: None,
            extra: Map::new(),
        }
    }

    /// Set the parameter schema
    pub fn with_parameter(mut self, parameter: ParameterSchema) -> Self {
        self.parameter = parameter;
        self
    }

    /// Set the query template
    pub fn with_query_schema(mut self, query_schema: Map<String, Value>) -> Self {
        self.query_schema = Some(query_schema);
        self
    }

    /// Set the labels
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the type tag
    pub fn with_type(mut self, tool_type: impl Into<String>) -> Self {
        self.tool_type = Some(tool_type.into());
        self
    }

    /// Set the URL template
    pub fn with_url(mut self, tool_url: impl Into<String>) -> Self {
        self.tool_url = Some(tool_url.into());
        self
    }

    pub fn kind(&self) -> ToolKind {
        if self.tool_url.is_some() || self.tool_type.is_some() {
            return ToolKind::Api;
        }
        if MetaTool::from_name(&self.name).is_some() {
            ToolKind::Meta
        } else {
            ToolKind::Api
        }
    }

    pub fn is_api(&self) -> bool {
        self.kind() == ToolKind::Api
    }

    pub fn is_meta(&self) -> bool {
        self.kind() == ToolKind::Meta
    }

    /// The meta tool this record represents, if any
    pub fn meta_tool(&self) -> Option<MetaTool> {
        if self.is_meta() { MetaTool::from_name(&self.name) } else { None }
    }

    /// Placeholder names in `tool_url`, in order of appearance
    pub fn placeholders(&self) -> Result<Vec<String>> {
        match &self.tool_url {
            Some(url) => template::placeholders(url),
            None => Ok(Vec::new()),
        }
    }

    /// Copy with the parameter schema normalized
    pub fn normalized(&self) -> Self {
        let mut tool = self.clone();
        tool.parameter.normalize();
        tool
    }

    /// Labels, empty when absent
    pub fn labels(&self) -> &[String] {
        self.label.as_deref().unwrap_or_default()
    }

    /// Case-insensitive label check
    pub fn has_label(&self, label: &str) -> bool {
        self.labels().iter().any(|l| l.eq_ignore_ascii_case(label))
    }

    /// Case-insensitive substring match over name, description and labels
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.labels().iter().any(|l| l.to_lowercase().contains(&needle))
    }
}

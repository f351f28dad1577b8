//! URL templates and query-template merging

use lazy_regex::{Lazy, Regex, lazy_regex};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};
use crate::tools::ToolDescriptor;

static PLACEHOLDER: Lazy<Regex> = lazy_regex!(r"\{([^{}]*)\}");

/// Bytes escaped inside one substituted path segment. `:` and `@` stay
/// literal; `+` and `,` are escaped so they only ever act as joiners.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode caller text for use inside a single path segment
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// `.` and `..` would be collapsed by URL normalization
pub fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Placeholder names in a path template, in order, without repeats
pub fn placeholders(template: &str) -> Result<Vec<String>> {
    check_braces(template)?;

    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = caps[1].trim();
        if name.is_empty() {
            return Err(CatalogError::MalformedTemplate(format!("empty placeholder in '{}'", template)));
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

fn check_braces(template: &str) -> Result<()> {
    let mut open = false;
    for ch in template.chars() {
        match ch {
            '{' if open => {
                return Err(CatalogError::MalformedTemplate(format!("nested '{{' in '{}'", template)));
            }
            '{' => open = true,
            '}' if !open => {
                return Err(CatalogError::MalformedTemplate(format!("unmatched '}}' in '{}'", template)));
            }
            '}' => open = false,
            _ => {}
        }
    }
    if open {
        return Err(CatalogError::MalformedTemplate(format!("unclosed '{{' in '{}'", template)));
    }
    Ok(())
}

/// Fill every placeholder from `values`. A missing value is reported by name.
///
/// `values` returns text that is already encoded for a path segment. Empty
/// substitutions and `.`/`..` segments are rejected.
pub fn render_path<F>(template: &str, mut values: F) -> Result<String>
where
    F: FnMut(&str) -> Result<String>,
{
    placeholders(template)?;

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let name = caps[1].trim();
        let value = values(name)?;
        if value.is_empty() {
            return Err(CatalogError::InvalidUrl(format!("empty value for '{{{}}}' in '{}'", name, template)));
        }
        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(&value);
        last = whole.end();
    }
    rendered.push_str(&template[last..]);

    if let Some(segment) = rendered.split('/').find(|s| is_dot_segment(s)) {
        return Err(CatalogError::InvalidUrl(format!("'{}' is not allowed as a path segment in '{}'", segment, rendered)));
    }
    Ok(rendered)
}

/// Encoded text of a value inside a path segment; arrays join with `sep`
pub fn path_text(value: &Value, sep: &str) -> String {
    match value {
        Value::String(s) => encode_segment(s),
        Value::Array(items) => items.iter().map(|v| path_text(v, sep)).collect::<Vec<_>>().join(sep),
        Value::Null => String::new(),
        other => encode_segment(&other.to_string()),
    }
}

/// Query pairs for one value; arrays repeat the key
pub fn query_pairs(key: &str, value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().flat_map(|v| query_pairs(key, v)).collect(),
        Value::String(s) => vec![(key.to_string(), s.clone())],
        other => vec![(key.to_string(), other.to_string())],
    }
}

/// Validate caller arguments and merge them over the tool's query template.
///
/// Caller values replace same-named template keys, extra declared arguments
/// are appended, and keys still null afterwards are dropped.
pub fn merge_arguments(tool: &ToolDescriptor, args: &Value) -> Result<Map<String, Value>> {
    let empty = Map::new();
    let args = match args {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(CatalogError::InvalidArguments {
                tool: tool.name.clone(),
                errors: vec![format!("arguments must be a JSON object, got {}", other)],
            });
        }
    };

    let template = tool.query_schema.clone().unwrap_or_default();

    for key in args.keys() {
        if !tool.parameter.declares(key) && !template.contains_key(key) {
            return Err(CatalogError::UnknownArgument {
                tool: tool.name.clone(),
                argument: key.clone(),
            });
        }
    }

    for name in tool.parameter.required_names() {
        if args.get(&name).is_none_or(Value::is_null) {
            return Err(CatalogError::MissingArgument {
                tool: tool.name.clone(),
                argument: name,
            });
        }
    }

    validate_against_schema(tool, args)?;

    let mut merged = template;
    for (key, value) in args {
        merged.insert(key.clone(), value.clone());
    }
    merged.retain(|_, value| !value.is_null());
    Ok(merged)
}

fn validate_against_schema(tool: &ToolDescriptor, args: &Map<String, Value>) -> Result<()> {
    // Only declared arguments are typed; template-only keys pass through.
    let declared: Map<String, Value> = args
        .iter()
        .filter(|(key, _)| tool.parameter.declares(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let schema = tool.parameter.to_json_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| CatalogError::InvalidArguments {
        tool: tool.name.clone(),
        errors: vec![format!("parameter schema does not compile: {}", e)],
    })?;

    let instance = Value::Object(declared);
    let errors: Vec<String> = validator.iter_errors(&instance).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::InvalidArguments {
            tool: tool.name.clone(),
            errors,
        })
    }
}

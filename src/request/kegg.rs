//! KEGG REST request rules
//!
//! KEGG paths have the form `/<op>/<arg>[/<arg>][/<option>]`. Which options
//! and argument combinations are legal depends on the operation, so these
//! tools are not rendered from their URL template alone.

use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};
use crate::tools::ToolDescriptor;

use super::planner::RequestBuilder;
use super::prepared::PreparedRequest;
use super::template;

/// Type tag of KEGG tools
pub const KEGG_TYPE: &str = "KEGG";

/// Database list limit for `list`
pub const MAX_LIST_DATABASES: usize = 100;

/// Entry limit for `get`
pub const MAX_GET_ENTRIES: usize = 10;

const FIND_DATABASES: [&str; 2] = ["compound", "drug"];
const FIND_OPTIONS: [&str; 3] = ["formula", "exact_mass", "mol_weight"];
const GET_OPTIONS: [&str; 7] = ["aaseq", "ntseq", "mol", "kcf", "image", "kgml", "json"];
const RDF_OPTIONS: [&str; 2] = ["turtle", "n-triple"];
const GENE_OUTSIDE_DBS: [&str; 3] = ["ncbi-gi", "ncbi-geneid", "uniprot"];
const CHEMICAL_KEGG_DBS: [&str; 3] = ["drug", "compound", "glycan"];
const CHEMICAL_OUTSIDE_DBS: [&str; 2] = ["pubchem", "chebi"];

/// KEGG REST operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeggOperation {
    Info,
    List,
    Find,
    Get,
    Conv,
    Link,
}

impl KeggOperation {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "list" => Some(Self::List),
            "find" => Some(Self::Find),
            "get" => Some(Self::Get),
            "conv" => Some(Self::Conv),
            "link" => Some(Self::Link),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::List => "list",
            Self::Find => "find",
            Self::Get => "get",
            Self::Conv => "conv",
            Self::Link => "link",
        }
    }

    /// Operation named by the first segment of `tool_url`, else by a `kegg_` name prefix
    pub fn for_tool(tool: &ToolDescriptor) -> Option<Self> {
        let from_url = tool
            .tool_url
            .as_deref()
            .and_then(|url| url.trim_start_matches('/').split('/').next())
            .and_then(Self::from_str);
        from_url.or_else(|| tool.name.strip_prefix("kegg_").and_then(Self::from_str))
    }
}

/// One fully checked KEGG call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeggRequest {
    pub operation: KeggOperation,
    pub args: Vec<String>,
}

impl KeggRequest {
    fn new(operation: KeggOperation, args: Vec<String>) -> Self {
        Self { operation, args }
    }

    /// `/op/arg1[/arg2][/arg3]`
    pub fn path(&self) -> String {
        let mut path = format!("/{}", self.operation.as_str());
        for arg in &self.args {
            path.push('/');
            path.push_str(arg);
        }
        path
    }

    pub fn info(database: &str) -> Result<Self> {
        Ok(Self::new(KeggOperation::Info, vec![segment("database", database)?]))
    }

    /// `databases` holds one database name or a list of entries
    pub fn list(databases: &[String], org: Option<&str>) -> Result<Self> {
        if let Some(org) = org {
            let single = match databases {
                [db] if db == "pathway" || db == "module" => db,
                _ => return Err(kegg_error("organism filter only applies to the pathway and module databases")),
            };
            return Ok(Self::new(KeggOperation::List, vec![single.clone(), segment("org", org)?]));
        }
        if databases.len() > MAX_LIST_DATABASES {
            return Err(kegg_error(&format!(
                "at most {} databases per list request",
                MAX_LIST_DATABASES
            )));
        }
        Ok(Self::new(KeggOperation::List, vec![join_entries("database", databases)?]))
    }

    pub fn find(database: &str, query: &[String], option: Option<&str>) -> Result<Self> {
        let db = segment("database", database)?;
        let query = join_entries("query", query)?;
        match option {
            Some(option) if FIND_DATABASES.contains(&database) && FIND_OPTIONS.contains(&option) => {
                Ok(Self::new(KeggOperation::Find, vec![db, query, option.to_string()]))
            }
            Some(option) => Err(kegg_error(&format!("invalid find option '{}' for database '{}'", option, database))),
            None => Ok(Self::new(KeggOperation::Find, vec![db, query])),
        }
    }

    pub fn get(entries: &[String], option: Option<&str>) -> Result<Self> {
        if entries.len() > MAX_GET_ENTRIES {
            return Err(kegg_error(&format!("at most {} entries per get request", MAX_GET_ENTRIES)));
        }
        let mut args = vec![join_entries("dbentries", entries)?];
        if let Some(option) = option {
            if !GET_OPTIONS.contains(&option) {
                return Err(kegg_error(&format!("invalid get option '{}'", option)));
            }
            args.push(option.to_string());
        }
        Ok(Self::new(KeggOperation::Get, args))
    }

    pub fn conv(target_db: &str, source: &[String], option: Option<&str>) -> Result<Self> {
        let target = segment("target_db", target_db)?;
        check_rdf_option(option)?;
        let source_db = join_entries("source_db", source)?;

        let gene = GENE_OUTSIDE_DBS.contains(&target_db) || GENE_OUTSIDE_DBS.contains(&source_db.as_str());
        let chemical = (CHEMICAL_KEGG_DBS.contains(&target_db) && CHEMICAL_OUTSIDE_DBS.contains(&source_db.as_str()))
            || (CHEMICAL_OUTSIDE_DBS.contains(&target_db) && CHEMICAL_KEGG_DBS.contains(&source_db.as_str()));
        if !gene && !chemical {
            return Err(kegg_error(&format!(
                "cannot convert between '{}' and '{}'",
                target_db, source_db
            )));
        }

        let mut args = vec![target, source_db];
        args.extend(option.map(String::from));
        Ok(Self::new(KeggOperation::Conv, args))
    }

    pub fn link(target_db: &str, source: &[String], option: Option<&str>) -> Result<Self> {
        let target = segment("target_db", target_db)?;
        check_rdf_option(option)?;
        let mut args = vec![target, join_entries("source_db", source)?];
        args.extend(option.map(String::from));
        Ok(Self::new(KeggOperation::Link, args))
    }

    /// Build from merged tool arguments
    pub fn from_arguments(operation: KeggOperation, args: &Map<String, Value>) -> Result<Self> {
        let option = optional_text(args, "option")?;
        match operation {
            KeggOperation::Info => Self::info(&required_text(args, "database")?),
            KeggOperation::List => Self::list(&text_list(args, "database")?, optional_text(args, "org")?.as_deref()),
            KeggOperation::Find => Self::find(
                &required_text(args, "database")?,
                &text_list(args, "query")?,
                option.as_deref(),
            ),
            KeggOperation::Get => Self::get(&text_list(args, "dbentries")?, option.as_deref()),
            KeggOperation::Conv => Self::conv(
                &required_text(args, "target_db")?,
                &text_list(args, "source_db")?,
                option.as_deref(),
            ),
            KeggOperation::Link => Self::link(
                &required_text(args, "target_db")?,
                &text_list(args, "source_db")?,
                option.as_deref(),
            ),
        }
    }
}

fn kegg_error(message: &str) -> CatalogError {
    CatalogError::Kegg(message.to_string())
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(kegg_error(&format!("'{}' must not be empty", field)));
    }
    Ok(())
}

fn check_rdf_option(option: Option<&str>) -> Result<()> {
    match option {
        Some(option) if !RDF_OPTIONS.contains(&option) => {
            Err(kegg_error(&format!("invalid option '{}', expected turtle or n-triple", option)))
        }
        _ => Ok(()),
    }
}

/// Caller text as one encoded path segment
fn segment(field: &str, value: &str) -> Result<String> {
    require_text(field, value)?;
    if template::is_dot_segment(value.trim()) {
        return Err(kegg_error(&format!("'{}' cannot be '{}'", field, value)));
    }
    Ok(template::encode_segment(value))
}

/// Entries encoded one by one and joined with a literal `+`
fn join_entries(field: &str, entries: &[String]) -> Result<String> {
    if entries.is_empty() {
        return Err(kegg_error(&format!("'{}' must not be empty", field)));
    }
    let parts = entries
        .iter()
        .map(|entry| segment(field, entry))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("+"))
}

fn required_text(args: &Map<String, Value>, key: &str) -> Result<String> {
    optional_text(args, key)?.ok_or_else(|| kegg_error(&format!("missing '{}'", key)))
}

fn optional_text(args: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(kegg_error(&format!("'{}' must be a string, got {}", key, other))),
    }
}

/// A string or an array of strings
fn text_list(args: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(String::from)
                    .ok_or_else(|| kegg_error(&format!("'{}' entries must be strings", key)))
            })
            .collect(),
        Some(other) => Err(kegg_error(&format!("'{}' must be a string or list, got {}", key, other))),
        None => Err(kegg_error(&format!("missing '{}'", key))),
    }
}

/// Request builder for tools of type "KEGG"
#[derive(Debug, Clone, Copy, Default)]
pub struct KeggRequestBuilder;

impl RequestBuilder for KeggRequestBuilder {
    fn prepare(&self, tool: &ToolDescriptor, args: &Value) -> Result<PreparedRequest> {
        let operation = KeggOperation::for_tool(tool)
            .ok_or_else(|| kegg_error(&format!("cannot tell which KEGG operation '{}' performs", tool.name)))?;
        let merged = template::merge_arguments(tool, args)?;
        let request = KeggRequest::from_arguments(operation, &merged)?;
        log::debug!("KEGG {} -> {}", tool.name, request.path());
        Ok(PreparedRequest::new(tool.name.clone(), request.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_operation_for_tool() {
        let by_url = ToolDescriptor::new("pathway_stats", "d").with_url("/info/{database}");
        assert_eq!(KeggOperation::for_tool(&by_url), Some(KeggOperation::Info));

        let by_name = ToolDescriptor::new("kegg_link", "d");
        assert_eq!(KeggOperation::for_tool(&by_name), Some(KeggOperation::Link));

        let neither = ToolDescriptor::new("other", "d").with_url("/search");
        assert_eq!(KeggOperation::for_tool(&neither), None);
    }

    #[test]
    fn test_info() {
        assert_eq!(KeggRequest::info("pathway").unwrap().path(), "/info/pathway");
        assert!(KeggRequest::info(" ").is_err());
    }

    #[test]
    fn test_list() {
        assert_eq!(KeggRequest::list(&strings(&["brite"]), None).unwrap().path(), "/list/brite");
        assert_eq!(
            KeggRequest::list(&strings(&["pathway"]), Some("hsa")).unwrap().path(),
            "/list/pathway/hsa"
        );
        assert_eq!(
            KeggRequest::list(&strings(&["hsa:10458", "ece:Z5100"]), None).unwrap().path(),
            "/list/hsa:10458+ece:Z5100"
        );
    }

    #[test]
    fn test_list_rejects_org_for_other_databases() {
        assert!(KeggRequest::list(&strings(&["compound"]), Some("hsa")).is_err());
    }

    #[test]
    fn test_list_limit() {
        let many: Vec<String> = (0..=MAX_LIST_DATABASES).map(|i| format!("hsa:{}", i)).collect();
        assert!(KeggRequest::list(&many, None).is_err());
        assert!(KeggRequest::list(&many[..MAX_LIST_DATABASES], None).is_ok());
    }

    #[test]
    fn test_find() {
        assert_eq!(
            KeggRequest::find("genes", &strings(&["shiga", "toxin"]), None).unwrap().path(),
            "/find/genes/shiga+toxin"
        );
        assert_eq!(
            KeggRequest::find("compound", &strings(&["C7H10O5"]), Some("formula"))
                .unwrap()
                .path(),
            "/find/compound/C7H10O5/formula"
        );
        assert!(KeggRequest::find("genes", &strings(&["x"]), Some("formula")).is_err());
        assert!(KeggRequest::find("drug", &strings(&["x"]), Some("weight")).is_err());
    }

    #[test]
    fn test_get() {
        assert_eq!(KeggRequest::get(&strings(&["hsa:10458"]), None).unwrap().path(), "/get/hsa:10458");
        assert_eq!(
            KeggRequest::get(&strings(&["hsa00010"]), Some("kgml")).unwrap().path(),
            "/get/hsa00010/kgml"
        );
        assert!(KeggRequest::get(&strings(&["hsa00010"]), Some("pdf")).is_err());

        let eleven: Vec<String> = (0..=MAX_GET_ENTRIES).map(|i| format!("hsa:{}", i)).collect();
        assert!(KeggRequest::get(&eleven, None).is_err());
    }

    #[test]
    fn test_conv() {
        assert_eq!(
            KeggRequest::conv("ncbi-geneid", &strings(&["hsa"]), None).unwrap().path(),
            "/conv/ncbi-geneid/hsa"
        );
        assert_eq!(
            KeggRequest::conv("compound", &strings(&["chebi"]), Some("turtle"))
                .unwrap()
                .path(),
            "/conv/compound/chebi/turtle"
        );
        assert_eq!(
            KeggRequest::conv("pubchem", &strings(&["drug"]), None).unwrap().path(),
            "/conv/pubchem/drug"
        );
        assert!(KeggRequest::conv("pathway", &strings(&["hsa"]), None).is_err());
        assert!(KeggRequest::conv("uniprot", &strings(&["hsa"]), Some("xml")).is_err());
    }

    #[test]
    fn test_link() {
        assert_eq!(
            KeggRequest::link("pathway", &strings(&["hsa:10458", "ece:Z5100"]), None)
                .unwrap()
                .path(),
            "/link/pathway/hsa:10458+ece:Z5100"
        );
        assert!(KeggRequest::link("pathway", &strings(&["hsa"]), Some("json")).is_err());
    }

    #[test]
    fn test_arguments_are_encoded_per_segment() {
        assert_eq!(
            KeggRequest::find("genes", &strings(&["a#b"]), None).unwrap().path(),
            "/find/genes/a%23b"
        );
        assert_eq!(
            KeggRequest::info("pathway/../../x").unwrap().path(),
            "/info/pathway%2F..%2F..%2Fx"
        );
        assert_eq!(
            KeggRequest::get(&strings(&["hsa:1?x=1", "C+1"]), None).unwrap().path(),
            "/get/hsa:1%3Fx=1+C%2B1"
        );
    }

    #[test]
    fn test_dot_segments_rejected() {
        assert!(matches!(KeggRequest::info(".."), Err(CatalogError::Kegg(_))));
        assert!(KeggRequest::link(".", &strings(&["hsa"]), None).is_err());
        assert!(KeggRequest::get(&strings(&["hsa:1", ".."]), None).is_err());
        assert!(KeggRequest::list(&strings(&["pathway"]), Some("..")).is_err());
    }

    #[test]
    fn test_from_arguments_type_errors() {
        let args = json!({ "database": 5 });
        let result = KeggRequest::from_arguments(KeggOperation::Info, args.as_object().unwrap());
        assert!(matches!(result, Err(CatalogError::Kegg(_))));

        let args = json!({ "dbentries": ["hsa:1", 2] });
        let result = KeggRequest::from_arguments(KeggOperation::Get, args.as_object().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_prepare() {
        let tool: ToolDescriptor = serde_json::from_value(json!({
            "name": "kegg_get",
            "description": "Retrieve entries",
            "parameter": {
                "type": "object",
                "properties": {
                    "dbentries": { "type": ["string", "array"], "items": { "type": "string" } },
                    "option": { "type": "string" }
                },
                "required": ["dbentries"]
            },
            "query_schema": {},
            "type": "KEGG",
            "tool_url": "/get/{dbentries}"
        }))
        .unwrap();

        let request = KeggRequestBuilder
            .prepare(&tool, &json!({ "dbentries": ["hsa:10458", "hsa:10459"], "option": "aaseq" }))
            .unwrap();
        assert_eq!(request.path, "/get/hsa:10458+hsa:10459/aaseq");
        assert!(request.query.is_empty());

        let missing = KeggRequestBuilder.prepare(&tool, &json!({}));
        assert!(matches!(missing, Err(CatalogError::MissingArgument { .. })));
    }
}

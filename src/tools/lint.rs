//! Structural checks over catalog records
//!
//! Runs over a plain record list rather than an indexed catalog so duplicate
//! names are still visible.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::definition::{ToolDescriptor, ToolKind};

/// Pagination keys checked in query templates
pub const PAGINATION_KEYS: [&str; 2] = ["limit", "offset"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What a lint issue is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IssueKind {
    EmptyName,
    DuplicateName,
    EmptyDescription,
    NestedRequired,
    UndeclaredRequired { argument: String },
    UnresolvedPlaceholder { placeholder: String },
    MalformedUrl { reason: String },
    InvalidPagination { key: String, value: String },
    NonObjectParameter { schema_type: String },
    IncompleteApiTool { missing: Vec<String> },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyName
            | Self::DuplicateName
            | Self::UndeclaredRequired { .. }
            | Self::MalformedUrl { .. }
            | Self::InvalidPagination { .. } => Severity::Error,
            Self::EmptyDescription
            | Self::NestedRequired
            | Self::UnresolvedPlaceholder { .. }
            | Self::NonObjectParameter { .. }
            | Self::IncompleteApiTool { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is empty"),
            Self::DuplicateName => write!(f, "name is not unique"),
            Self::EmptyDescription => write!(f, "description is empty"),
            Self::NestedRequired => write!(f, "'required' is nested inside 'properties'"),
            Self::UndeclaredRequired { argument } => {
                write!(f, "required argument '{}' is not declared in properties", argument)
            }
            Self::UnresolvedPlaceholder { placeholder } => {
                write!(f, "tool_url placeholder '{{{}}}' is not a declared property", placeholder)
            }
            Self::MalformedUrl { reason } => write!(f, "tool_url is malformed: {}", reason),
            Self::InvalidPagination { key, value } => {
                write!(f, "query_schema.{} must be a non-negative integer, got {}", key, value)
            }
            Self::NonObjectParameter { schema_type } => {
                write!(f, "parameter type is '{}', expected 'object'", schema_type)
            }
            Self::IncompleteApiTool { missing } => write!(f, "API tool is missing {}", missing.join(", ")),
        }
    }
}

/// One finding against one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    /// Record name (may be empty)
    pub tool: String,
    /// Position in the checked list
    pub index: usize,
    #[serde(flatten)]
    pub kind: IssueKind,
    pub severity: Severity,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tool = if self.tool.trim().is_empty() {
            format!("#{}", self.index)
        } else {
            self.tool.clone()
        };
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", level, tool, self.kind)
    }
}

/// All findings for a record list
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn errors(&self) -> Vec<&LintIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error).collect()
    }

    pub fn warnings(&self) -> Vec<&LintIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Errors always fail; warnings fail only in strict mode
    pub fn passes(&self, strict: bool) -> bool {
        if strict { self.is_clean() } else { self.errors().is_empty() }
    }

    pub fn for_tool(&self, name: &str) -> Vec<&LintIssue> {
        self.issues.iter().filter(|i| i.tool == name).collect()
    }

    /// Append another report, e.g. from a second file
    pub fn extend(&mut self, other: LintReport) {
        self.issues.extend(other.issues);
    }
}

/// Check every record and collect findings in record order
pub fn lint_records(records: &[ToolDescriptor]) -> LintReport {
    let mut report = LintReport::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, tool) in records.iter().enumerate() {
        let mut push = |kind: IssueKind| {
            let severity = kind.severity();
            report.issues.push(LintIssue {
                tool: tool.name.clone(),
                index,
                kind,
                severity,
            });
        };

        if tool.name.trim().is_empty() {
            push(IssueKind::EmptyName);
        } else if !seen.insert(tool.name.as_str()) {
            push(IssueKind::DuplicateName);
        }

        if tool.description.trim().is_empty() {
            push(IssueKind::EmptyDescription);
        }

        check_parameter(tool, &mut push);
        check_url(tool, &mut push);
        check_pagination(tool, &mut push);

        if tool.kind() == ToolKind::Api {
            let mut missing = Vec::new();
            if tool.tool_url.is_none() {
                missing.push("tool_url".to_string());
            }
            if tool.tool_type.is_none() {
                missing.push("type".to_string());
            }
            if tool.query_schema.is_none() {
                missing.push("query_schema".to_string());
            }
            if !missing.is_empty() {
                push(IssueKind::IncompleteApiTool { missing });
            }
        }
    }

    log::debug!("Linted {} records: {} issues", records.len(), report.issues.len());
    report
}

fn check_parameter(tool: &ToolDescriptor, push: &mut impl FnMut(IssueKind)) {
    let parameter = &tool.parameter;

    if let Some(schema_type) = &parameter.schema_type {
        if schema_type != "object" {
            push(IssueKind::NonObjectParameter {
                schema_type: schema_type.clone(),
            });
        }
    }

    if parameter.has_nested_required() {
        push(IssueKind::NestedRequired);
    }

    for argument in parameter.required_names() {
        if !parameter.declares(&argument) {
            push(IssueKind::UndeclaredRequired { argument });
        }
    }
}

fn check_url(tool: &ToolDescriptor, push: &mut impl FnMut(IssueKind)) {
    match tool.placeholders() {
        Ok(placeholders) => {
            for placeholder in placeholders {
                if !tool.parameter.declares(&placeholder) {
                    push(IssueKind::UnresolvedPlaceholder { placeholder });
                }
            }
        }
        Err(e) => push(IssueKind::MalformedUrl { reason: e.to_string() }),
    }
}

fn check_pagination(tool: &ToolDescriptor, push: &mut impl FnMut(IssueKind)) {
    let Some(query) = &tool.query_schema else {
        return;
    };
    for key in PAGINATION_KEYS {
        match query.get(key) {
            None | Some(Value::Null) => {}
            Some(value) if value.is_u64() => {}
            Some(value) => push(IssueKind::InvalidPagination {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolCatalog;

    fn lint_json(json: &str) -> LintReport {
        lint_records(&ToolCatalog::parse_records(json).unwrap())
    }

    #[test]
    fn test_clean_record() {
        let report = lint_json(
            r#"[{
                "name": "kegg_info",
                "description": "Stats",
                "parameter": {"type": "object", "properties": {"database": {"type": "string"}}, "required": ["database"]},
                "query_schema": {"limit": 10, "offset": 0},
                "type": "KEGG",
                "tool_url": "/info/{database}"
            }]"#,
        );
        assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
        assert!(report.passes(true));
    }

    #[test]
    fn test_empty_and_duplicate_names() {
        let report = lint_json(
            r#"[
                {"name": "", "description": "x", "parameter": {}},
                {"name": "Finish", "description": "x", "parameter": {}},
                {"name": "Finish", "description": "x", "parameter": {}}
            ]"#,
        );
        let kinds: Vec<_> = report.errors().iter().map(|i| (i.index, i.kind.clone())).collect();
        assert!(kinds.contains(&(0, IssueKind::EmptyName)));
        assert!(kinds.contains(&(2, IssueKind::DuplicateName)));
        assert!(!kinds.iter().any(|(index, _)| *index == 1));
    }

    #[test]
    fn test_nested_required_is_warning() {
        let report = lint_json(
            r#"[{
                "name": "Tool_RAG",
                "description": "x",
                "parameter": {"type": "object", "properties": {"q": {"type": "string"}, "required": ["q"]}}
            }]"#,
        );
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::NestedRequired);
        assert!(report.passes(false));
        assert!(!report.passes(true));
    }

    #[test]
    fn test_undeclared_required() {
        let report = lint_json(
            r#"[{
                "name": "CallAgent",
                "description": "x",
                "parameter": {"type": "object", "properties": {}, "required": ["solution"]}
            }]"#,
        );
        assert_eq!(
            report.errors()[0].kind,
            IssueKind::UndeclaredRequired {
                argument: "solution".to_string()
            }
        );
    }

    #[test]
    fn test_placeholder_mismatch_is_flagged() {
        let report = lint_json(
            r#"[{
                "name": "get_phenotype_by_HPO_ID",
                "description": "x",
                "parameter": {"type": "object", "properties": {"id": {"type": "string"}, "required": ["id"]}},
                "query_schema": {},
                "type": "Monarch",
                "tool_url": "/entity/{url_key}"
            }]"#,
        );
        let issues = report.for_tool("get_phenotype_by_HPO_ID");
        assert!(issues.iter().any(|i| i.kind
            == IssueKind::UnresolvedPlaceholder {
                placeholder: "url_key".to_string()
            }));
        assert!(!report.passes(true));
    }

    #[test]
    fn test_malformed_url() {
        let report = lint_json(
            r#"[{
                "name": "t",
                "description": "x",
                "parameter": {},
                "query_schema": {},
                "type": "T",
                "tool_url": "/entity/{url_key"
            }]"#,
        );
        assert!(matches!(report.errors()[0].kind, IssueKind::MalformedUrl { .. }));
    }

    #[test]
    fn test_invalid_pagination() {
        let report = lint_json(
            r#"[{
                "name": "t",
                "description": "x",
                "parameter": {},
                "query_schema": {"limit": -1, "offset": "0"},
                "type": "T",
                "tool_url": "/x"
            }]"#,
        );
        let errors = report.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].kind,
            IssueKind::InvalidPagination {
                key: "limit".to_string(),
                value: "-1".to_string()
            }
        );
        assert!(matches!(&errors[1].kind, IssueKind::InvalidPagination { key, .. } if key == "offset"));
    }

    #[test]
    fn test_null_pagination_is_allowed() {
        let report = lint_json(
            r#"[{
                "name": "t",
                "description": "x",
                "parameter": {},
                "query_schema": {"limit": null},
                "type": "T",
                "tool_url": "/x"
            }]"#,
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_incomplete_api_tool_and_non_object() {
        let report = lint_json(
            r#"[{
                "name": "t",
                "description": " ",
                "parameter": {"type": "array"},
                "tool_url": "/x"
            }]"#,
        );
        let kinds: Vec<_> = report.warnings().iter().map(|i| i.kind.clone()).collect();
        assert!(kinds.contains(&IssueKind::EmptyDescription));
        assert!(kinds.contains(&IssueKind::NonObjectParameter {
            schema_type: "array".to_string()
        }));
        assert!(kinds.contains(&IssueKind::IncompleteApiTool {
            missing: vec!["type".to_string(), "query_schema".to_string()]
        }));
    }

    #[test]
    fn test_issue_display() {
        let issue = LintIssue {
            tool: "get_phenotype_by_HPO_ID".to_string(),
            index: 1,
            kind: IssueKind::UnresolvedPlaceholder {
                placeholder: "url_key".to_string(),
            },
            severity: Severity::Warning,
        };
        assert_eq!(
            issue.to_string(),
            "warning: get_phenotype_by_HPO_ID: tool_url placeholder '{url_key}' is not a declared property"
        );

        let unnamed = LintIssue {
            tool: String::new(),
            index: 4,
            kind: IssueKind::EmptyName,
            severity: Severity::Error,
        };
        assert_eq!(unnamed.to_string(), "error: #4: name is empty");
    }

    #[test]
    fn test_report_extend() {
        let mut report = lint_json(r#"[{"name": "", "description": "x", "parameter": {}}]"#);
        let before = report.issues.len();
        report.extend(lint_json(r#"[{"name": "", "description": "x", "parameter": {}}]"#));
        assert_eq!(report.issues.len(), before * 2);
    }
}

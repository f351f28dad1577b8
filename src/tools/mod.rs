//! Tool catalog - descriptors, catalog loading, built-ins and linting

mod builtin;
mod catalog;
mod definition;
pub mod lint;
mod meta;

pub use builtin::{KEGG_TOOLS, META_TOOLS, MONARCH_TOOLS, TCGA_TOOLS, builtin_source, builtin_sources};
pub use catalog::ToolCatalog;
pub use definition::{ParameterSchema, REQUIRED_KEY, ToolDescriptor, ToolKind};
pub use lint::{IssueKind, LintIssue, LintReport, Severity, lint_records};
pub use meta::MetaTool;

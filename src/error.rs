//! Error types for toolcat
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while loading or resolving catalogs
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog document has the wrong shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Two records share a name within one source
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// No record with this name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Caller passed an argument the tool does not declare
    #[error("Tool '{tool}' does not accept argument '{argument}'")]
    UnknownArgument { tool: String, argument: String },

    /// Caller omitted a required argument
    #[error("Tool '{tool}' is missing required argument '{argument}'")]
    MissingArgument { tool: String, argument: String },

    /// Arguments failed schema validation
    #[error("Invalid arguments for '{tool}': {}", errors.join("; "))]
    InvalidArguments { tool: String, errors: Vec<String> },

    /// A URL placeholder has no value to fill it
    #[error("Tool '{tool}' has no value for URL placeholder '{{{placeholder}}}'")]
    UnresolvedPlaceholder { tool: String, placeholder: String },

    /// URL template with unbalanced or empty braces
    #[error("Malformed URL template: {0}")]
    MalformedTemplate(String),

    /// Meta tools are control signals, not endpoints
    #[error("Tool '{0}' is a meta tool and cannot be dispatched")]
    NotDispatchable(String),

    /// No base URL configured for this tool type
    #[error("No endpoint configured for tool type '{0}'")]
    NoEndpoint(String),

    /// Base URL or joined URL is invalid
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// KEGG request rule violated
    #[error("KEGG error: {0}")]
    Kegg(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for toolcat operations
pub type Result<T> = std::result::Result<T, CatalogError>;

//! A resolved request description

use reqwest::Url;
use serde::Serialize;

use crate::error::{CatalogError, Result};

/// Everything needed to issue a GET for one tool call, minus the base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedRequest {
    /// Tool the request was built for
    pub tool: String,
    /// Path relative to the endpoint base, starting with '/'
    pub path: String,
    /// Query pairs in template order; repeated keys allowed
    pub query: Vec<(String, String)>,
}

impl PreparedRequest {
    pub fn new(tool: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') { path } else { format!("/{}", path) };
        Self {
            tool: tool.into(),
            path,
            query: Vec::new(),
        }
    }

    /// Append one query pair
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Values for a query key, in order
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Join onto a base URL. The base's own path is kept as a prefix.
    pub fn url(&self, base: &str) -> Result<Url> {
        let base = base.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, self.path))
            .map_err(|e| CatalogError::InvalidUrl(format!("{}{}: {}", base, self.path, e)))?;

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

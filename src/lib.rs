//! Toolcat - a catalog of tool descriptors for agent orchestration
//!
//! Toolcat loads JSON descriptors for biomedical API tools (Monarch, KEGG,
//! TCGA) and agent meta tools, checks them, and resolves tool calls into
//! request URLs for an external engine to dispatch.

pub mod error;
pub mod request;
pub mod tools;

pub use error::{CatalogError, Result};

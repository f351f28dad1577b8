//! Request preparation - resolving tool calls into URLs without sending them

pub mod kegg;
mod planner;
mod prepared;
pub mod template;

pub use kegg::{KeggOperation, KeggRequest, KeggRequestBuilder};
pub use planner::{RequestBuilder, RequestPlanner, TemplateRequestBuilder};
pub use prepared::PreparedRequest;

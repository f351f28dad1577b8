//! Meta tools
//!
//! Control signals for an agent loop. They share the descriptor shape but
//! never map to an endpoint.

use serde::{Deserialize, Serialize};

/// The known meta tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaTool {
    /// End of multi-step reasoning
    #[serde(rename = "Finish")]
    Finish,
    /// Retrieve related tools by capability description
    #[serde(rename = "Tool_RAG")]
    ToolRag,
    /// Hand a solution plan to a sub-agent
    #[serde(rename = "CallAgent")]
    CallAgent,
}

impl MetaTool {
    pub fn all() -> [Self; 3] {
        [Self::Finish, Self::ToolRag, Self::CallAgent]
    }

    /// Catalog name of this meta tool
    pub fn name(&self) -> &'static str {
        match self {
            Self::Finish => "Finish",
            Self::ToolRag => "Tool_RAG",
            Self::CallAgent => "CallAgent",
        }
    }

    /// Exact, case-sensitive match on the catalog name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|m| m.name() == name)
    }

    /// Whether this signal ends the agent loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish)
    }
}

impl std::fmt::Display for MetaTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

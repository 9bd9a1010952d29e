use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catalog entry advertised to the reasoning backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object.
    pub parameters: Value,
}

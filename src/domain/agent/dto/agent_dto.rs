use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AgentQueryRequest {
    #[validate(length(min = 1, max = 8000))]
    pub query: String,
}

/// One tool call made while answering, without its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: Value,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnswer {
    pub run_id: Uuid,
    pub answer: String,
    /// Inference rounds used, including the final one.
    pub steps: usize,
    pub tool_calls: Vec<ToolCallRecord>,
    pub answered_at: DateTime<Utc>,
}

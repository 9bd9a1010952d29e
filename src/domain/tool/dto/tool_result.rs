use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ToolInvocationError;

/// The only two shapes a tool call may return.
///
/// Serialized as `{"status": "success", "payload": ...}` or
/// `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult<T = Value> {
    Success { payload: T },
    Error { message: String },
}

impl<T> ToolResult<T> {
    pub fn success(payload: T) -> Self {
        ToolResult::Success { payload }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ToolResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            ToolResult::Success { .. } => "success",
            ToolResult::Error { .. } => "error",
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            ToolResult::Success { payload } => Some(payload),
            ToolResult::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ToolResult::Success { .. } => None,
            ToolResult::Error { message } => Some(message),
        }
    }
}

impl<T: Serialize> ToolResult<T> {
    /// Erase the payload type for the registry boundary.
    pub fn into_json(self) -> ToolResult<Value> {
        match self {
            ToolResult::Success { payload } => match serde_json::to_value(payload) {
                Ok(v) => ToolResult::Success { payload: v },
                Err(e) => ToolResult::error(format!("Failed to encode tool payload: {}", e)),
            },
            ToolResult::Error { message } => ToolResult::Error { message },
        }
    }
}

impl<T> From<Result<T, ToolInvocationError>> for ToolResult<T> {
    fn from(result: Result<T, ToolInvocationError>) -> Self {
        match result {
            Ok(payload) => ToolResult::success(payload),
            Err(err) => ToolResult::error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_with_status_and_payload_only() {
        let result = ToolResult::success(json!([{"name": "p1"}]));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": "success", "payload": [{"name": "p1"}]})
        );
    }

    #[test]
    fn error_serializes_with_status_and_message_only() {
        let result: ToolResult = ToolResult::error("boom");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"status": "error", "message": "boom"})
        );
    }

    #[test]
    fn unknown_status_is_rejected_on_decode() {
        let decoded = serde_json::from_value::<ToolResult>(json!({"status": "partial", "message": "x"}));
        assert!(decoded.is_err());
    }

    #[test]
    fn invocation_errors_become_the_error_shape() {
        let result: ToolResult<()> = Err(ToolInvocationError::NotFound("Pod 'x' not found".into())).into();
        assert_eq!(result.message(), Some("Pod 'x' not found"));
        assert_eq!(result.status(), "error");
    }
}

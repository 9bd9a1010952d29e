//! Direct tool access, mainly for the web UI and debugging.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::dto::ApiResponse;
use crate::app_state::AppState;
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::domain::tool::dto::tool_spec::ToolSpec;
use crate::errors::AppError;

pub struct ToolController;

impl ToolController {
    pub async fn list_tools(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<Vec<ToolSpec>>>, AppError> {
        Ok(Json(ApiResponse::ok(state.registry.catalog().to_vec())))
    }

    /// Answers with the tool envelope, including for bodies that are not JSON.
    pub async fn invoke_tool(
        State(state): State<AppState>,
        Path(name): Path<String>,
        body: Bytes,
    ) -> Json<ToolResult<Value>> {
        match decode_arguments(&name, &body) {
            Ok(args) => Json(state.registry.invoke(&name, args).await),
            Err(message) => Json(ToolResult::error(message)),
        }
    }
}

/// An empty body means no arguments.
fn decode_arguments(name: &str, body: &[u8]) -> Result<Value, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| format!("Invalid arguments for {}: {}", name, e))
}

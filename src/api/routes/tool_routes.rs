use axum::{routing::{get, post}, Router};

use crate::api::controller::tool::ToolController;
use crate::app_state::AppState;

pub fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ToolController::list_tools))
        .route("/{name}", post(ToolController::invoke_tool))
}

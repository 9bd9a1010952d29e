use axum::{routing::post, Router};

use crate::api::controller::agent::AgentController;
use crate::app_state::AppState;

pub fn agent_routes() -> Router<AppState> {
    Router::new().route("/query", post(AgentController::query))
}

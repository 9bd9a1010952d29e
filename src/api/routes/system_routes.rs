//! Diagnostic routes (e.g., /api/v1/model)

use axum::{routing::get, Router};

use crate::api::controller::system::SystemController;
use crate::app_state::AppState;

pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/model", get(SystemController::model))
        .route("/cluster/connection", get(SystemController::cluster_connection))
}

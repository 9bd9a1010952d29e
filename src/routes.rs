use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    let api_v1 = Router::new()
        .nest("/tools", crate::api::routes::tool_routes::tool_routes())
        .nest("/agent", crate::api::routes::agent_routes::agent_routes())
        .merge(crate::api::routes::system_routes::system_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .fallback(handler_404)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}

async fn root() -> &'static str {
    "Kubernetes agent is running!"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}

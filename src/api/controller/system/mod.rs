//! Diagnostics: which model and which cluster credentials the process is using.

use axum::extract::State;
use axum::Json;

use crate::api::dto::cluster_dto::ConnectionReport;
use crate::api::dto::ApiResponse;
use crate::app_state::AppState;
use crate::domain::llm::dto::llm_messages::ModelDescriptor;
use crate::errors::AppError;

pub struct SystemController;

impl SystemController {
    pub async fn model(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<ModelDescriptor>>, AppError> {
        Ok(Json(ApiResponse::ok(state.registry.model().descriptor())))
    }

    /// Resolves the connection if nothing has needed it yet.
    pub async fn cluster_connection(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<ConnectionReport>>, AppError> {
        let connector = state.registry.connector();
        let report = match connector.client().await {
            Ok(_) => ConnectionReport::connected(connector.connected_source().map(|s| s.to_string())),
            Err(err) => ConnectionReport::failed(&err),
        };
        Ok(Json(ApiResponse::ok(report)))
    }
}

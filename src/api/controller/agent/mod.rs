use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::app_state::AppState;
use crate::domain::agent::dto::agent_dto::{AgentAnswer, AgentQueryRequest};
use crate::errors::AppError;

pub struct AgentController;

impl AgentController {
    pub async fn query(
        State(state): State<AppState>,
        Json(payload): Json<AgentQueryRequest>,
    ) -> Result<Json<ApiResponse<AgentAnswer>>, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::BodyParsingError(e.to_string()))?;

        let answer = state
            .agent_service
            .run(payload.query.trim())
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;
        Ok(Json(ApiResponse::ok(answer)))
    }
}

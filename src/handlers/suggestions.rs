use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::Instrument;
use uuid::Uuid;

use super::AppState;
use crate::error::{PlannerError, Result};
use crate::models::{SuggestionRequestBody, SuggestionResult};

/// `POST /api/ai/suggestions`
pub async fn suggest_destinations(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SuggestionRequestBody>, JsonRejection>,
) -> Result<Json<SuggestionResult>> {
    let Json(body) = payload.map_err(|rejection| PlannerError::BadRequest(rejection.body_text()))?;

    let span = tracing::info_span!("suggestions", request_id = %Uuid::new_v4());
    let result = state.suggester.handle(body).instrument(span).await?;
    Ok(Json(result))
}

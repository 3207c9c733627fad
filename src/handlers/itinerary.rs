use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::Instrument;
use uuid::Uuid;

use super::AppState;
use crate::error::{PlannerError, Result};
use crate::models::{ItineraryRequestBody, ItineraryResult};

/// `POST /api/ai/itinerary`
pub async fn generate_itinerary(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ItineraryRequestBody>, JsonRejection>,
) -> Result<Json<ItineraryResult>> {
    let Json(body) = payload.map_err(|rejection| PlannerError::BadRequest(rejection.body_text()))?;

    let span = tracing::info_span!("itinerary", request_id = %Uuid::new_v4());
    let result = state.planner.plan(body).instrument(span).await?;
    Ok(Json(result))
}

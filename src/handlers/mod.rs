//! HTTP surface: itinerary generation, destination suggestions, health.
pub mod itinerary;
pub mod suggestions;

#[cfg(test)]
mod test_handlers;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::planner::ItineraryPlanner;
use crate::suggest::DestinationSuggester;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<ItineraryPlanner>,
    pub suggester: Arc<DestinationSuggester>,
}

pub fn router(state: AppState) -> Router {
    // The web UI is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/api/ai/itinerary", post(itinerary::generate_itinerary))
        .route("/api/ai/suggestions", post(suggestions::suggest_destinations))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod completion;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod handlers;
pub mod models;
pub mod planner;
pub mod prompt;
pub mod providers;
pub mod resolver;
pub mod retry;
pub mod suggest;
pub mod transport;
pub mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::config::Config;
use crate::error::Result;
use crate::handlers::AppState;
use crate::planner::ItineraryPlanner;
use crate::providers::{BookingComClient, FlightSource, StaySource};
use crate::retry::RetryPolicy;
use crate::suggest::DestinationSuggester;
use crate::transport::{ChatCompletionsTransport, Transport};

/// Wire the production clients into the shared application state.
pub fn build_state(cfg: &Config) -> Result<AppState> {
    let transport = Arc::new(ChatCompletionsTransport::new(
        &cfg.llm,
        RetryPolicy::from(&cfg.retry),
    )?);
    let completion = Arc::new(CompletionClient::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        &cfg.llm,
    ));

    let travel = Arc::new(BookingComClient::new(
        &cfg.travel_api,
        cfg.travel_api_timeout(),
    )?);

    let planner = ItineraryPlanner::new(
        Arc::clone(&travel) as Arc<dyn FlightSource>,
        Arc::clone(&travel) as Arc<dyn StaySource>,
        Arc::clone(&completion),
        cfg.planner.max_offers_in_prompt,
    );
    let suggester = DestinationSuggester::new(completion, cfg.planner.suggestion_count);

    Ok(AppState {
        planner: Arc::new(planner),
        suggester: Arc::new(suggester),
    })
}

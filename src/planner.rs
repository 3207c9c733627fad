//! Itinerary orchestration.
//!
//! Stages run in a fixed order, each taking the previous stage's output by
//! value or reference:
//!
//! `ValidatingInput -> FetchingInventory -> BuildingPrompt -> AwaitingCompletion
//!  -> ResolvingSelections -> EnrichingStay -> Done`
//!
//! Only invalid input and a failed completion call end in `Failed`. Inventory
//! and enrichment problems shrink the result instead.

use std::sync::Arc;

use crate::completion::{CompletionClient, ReplyFormat};
use crate::enrichment;
use crate::error::Result;
use crate::models::{ItineraryRequest, ItineraryRequestBody, ItineraryResult};
use crate::prompt::{self, ITINERARY_SYSTEM_PROMPT};
use crate::providers::{
    CondensedFlightOffer, CondensedHotelOffer, FlightOffer, FlightQuery, FlightSource, HotelOffer,
    StayQuery, StaySource,
};
use crate::resolver;
use crate::validation::InputValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingInput,
    FetchingInventory,
    BuildingPrompt,
    AwaitingCompletion,
    ResolvingSelections,
    EnrichingStay,
    Done,
    Failed,
}

fn enter(stage: Stage) {
    tracing::debug!(?stage, "Itinerary pipeline stage");
}

/// Offers fetched for one request, already capped to what the prompt shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub flights: Vec<FlightOffer>,
    pub hotels: Vec<HotelOffer>,
}

impl Inventory {
    fn condensed_flights(&self) -> Vec<CondensedFlightOffer> {
        self.flights.iter().map(|o| o.condensed.clone()).collect()
    }

    fn condensed_hotels(&self) -> Vec<CondensedHotelOffer> {
        self.hotels.iter().map(|o| o.condensed.clone()).collect()
    }
}

/// Flight search parameters, or `None` when flights are off or an airport
/// code is missing.
pub fn flight_query(request: &ItineraryRequest) -> Option<FlightQuery> {
    if !request.include_flights {
        return None;
    }
    match (&request.from_airport, &request.to_airport) {
        (Some(from), Some(to)) => Some(FlightQuery {
            from_airport: from.clone(),
            to_airport: to.clone(),
            depart_date: request.date_from,
            return_date: request.date_to,
            adults: request.adults,
            currency: request.preferences.currency().to_string(),
        }),
        _ => {
            tracing::debug!("Flights requested without both airport codes, skipping flight search");
            None
        }
    }
}

pub fn stay_query(request: &ItineraryRequest) -> StayQuery {
    StayQuery {
        arrival_date: request.date_from,
        departure_date: request.date_to,
        adults: request.adults,
        currency: request.preferences.currency().to_string(),
    }
}

pub struct ItineraryPlanner {
    validator: InputValidator,
    flights: Arc<dyn FlightSource>,
    stays: Arc<dyn StaySource>,
    completion: Arc<CompletionClient>,
    max_offers: usize,
}

impl ItineraryPlanner {
    pub fn new(
        flights: Arc<dyn FlightSource>,
        stays: Arc<dyn StaySource>,
        completion: Arc<CompletionClient>,
        max_offers: usize,
    ) -> Self {
        Self {
            validator: InputValidator::new(),
            flights,
            stays,
            completion,
            max_offers: max_offers.max(1),
        }
    }

    /// Validate a request body and run the pipeline.
    pub async fn plan(&self, body: ItineraryRequestBody) -> Result<ItineraryResult> {
        enter(Stage::ValidatingInput);
        let request = self.validator.itinerary(body).inspect_err(|e| {
            tracing::info!(error = %e, "Rejected itinerary request");
            enter(Stage::Failed);
        })?;
        self.generate(&request).await
    }

    pub async fn generate(&self, request: &ItineraryRequest) -> Result<ItineraryResult> {
        tracing::info!(
            city = %request.city,
            days = request.trip_days(),
            include_flights = request.include_flights,
            include_stays = request.include_stays,
            "Generating itinerary"
        );

        enter(Stage::FetchingInventory);
        let inventory = self.fetch_inventory(request).await;

        enter(Stage::BuildingPrompt);
        let prompt = prompt::build_itinerary_prompt(
            request,
            &inventory.condensed_flights(),
            &inventory.condensed_hotels(),
        );

        enter(Stage::AwaitingCompletion);
        let text = self
            .completion
            .complete(ITINERARY_SYSTEM_PROMPT, prompt.as_str(), ReplyFormat::JsonObject)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, "Completion failed, aborting itinerary");
                enter(Stage::Failed);
            })?;

        enter(Stage::ResolvingSelections);
        let resolution = resolver::resolve(
            resolver::parse_reply(&text),
            &inventory.flights,
            &inventory.hotels,
        );

        let stay_booking_url = match resolution.stay {
            Some(stay) => {
                enter(Stage::EnrichingStay);
                enrichment::stay_booking_url(self.stays.as_ref(), stay, &stay_query(request))
                    .await
            }
            None => None,
        };

        enter(Stage::Done);
        Ok(ItineraryResult {
            itinerary: resolution.itinerary,
            selected_flight: resolution.flight.map(|offer| offer.raw.clone()),
            selected_stay: resolution.stay.map(|offer| offer.raw.clone()),
            stay_booking_url,
        })
    }

    /// Run both inventory branches concurrently. Neither branch can fail the
    /// request.
    pub async fn fetch_inventory(&self, request: &ItineraryRequest) -> Inventory {
        let (flights, hotels) = futures::join!(self.fetch_flights(request), self.fetch_hotels(request));
        Inventory { flights, hotels }
    }

    async fn fetch_flights(&self, request: &ItineraryRequest) -> Vec<FlightOffer> {
        let Some(query) = flight_query(request) else {
            return Vec::new();
        };

        match self.flights.search_offers(&query).await {
            Ok(mut offers) => {
                offers.truncate(self.max_offers);
                offers
            }
            Err(e) => {
                tracing::warn!(error = %e, "Flight search failed, continuing without flights");
                Vec::new()
            }
        }
    }

    async fn fetch_hotels(&self, request: &ItineraryRequest) -> Vec<HotelOffer> {
        if !request.include_stays {
            return Vec::new();
        }

        let destination = match self.stays.resolve_destination(&request.city).await {
            Ok(Some(destination)) => destination,
            Ok(None) => {
                tracing::warn!(city = %request.city, "No hotel destination for city, skipping hotel search");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Destination lookup failed, continuing without hotels");
                return Vec::new();
            }
        };

        match self
            .stays
            .search_hotels(&destination, &stay_query(request))
            .await
        {
            Ok(mut offers) => {
                offers.truncate(self.max_offers);
                offers
            }
            Err(e) => {
                tracing::warn!(error = %e, "Hotel search failed, continuing without hotels");
                Vec::new()
            }
        }
    }
}

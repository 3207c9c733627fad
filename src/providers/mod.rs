//! External inventory sources: flight offers and hotel offers.
//!
//! Each adapter returns either records or an empty list for "no results".
//! Transport and upstream failures come back as [`PlannerError::Upstream`]
//! so the orchestrator can tell them apart from an empty search.
//!
//! [`PlannerError::Upstream`]: crate::error::PlannerError::Upstream

pub mod booking;
pub mod dto;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

pub use booking::BookingComClient;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub from_airport: String,
    pub to_airport: String,
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StayQuery {
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub adults: u32,
    pub currency: String,
}

/// Provider-specific destination handle needed for hotel search
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: String,
    pub search_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSegment {
    pub carrier_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_logo: Option<String>,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
}

/// Prompt-sized view of a flight offer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondensedFlightOffer {
    pub token: String,
    pub price: String,
    pub segments: Vec<FlightSegment>,
}

/// Prompt-sized view of a hotel offer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondensedHotelOffer {
    pub hotel_id: String,
    pub name: String,
    pub address: Option<String>,
    pub price: String,
    pub rating: Option<f64>,
    pub photo_url: Option<String>,
}

/// A provider flight record together with its condensed projection.
/// `raw` is what ends up in the result; `condensed` is what the model sees.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightOffer {
    pub raw: Value,
    pub condensed: CondensedFlightOffer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotelOffer {
    pub raw: Value,
    pub condensed: CondensedHotelOffer,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FlightSource: Send + Sync {
    async fn search_offers(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait StaySource: Send + Sync {
    /// Map a city name to the provider's destination id. `None` when the
    /// provider knows no such place.
    async fn resolve_destination(&self, city: &str) -> Result<Option<Destination>>;

    async fn search_hotels(
        &self,
        destination: &Destination,
        query: &StayQuery,
    ) -> Result<Vec<HotelOffer>>;

    /// Booking deep-link for one hotel. `None` when the provider has none.
    async fn booking_url(&self, hotel_id: &str, query: &StayQuery) -> Result<Option<String>>;
}

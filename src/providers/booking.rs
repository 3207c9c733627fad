use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::dto::{self, Envelope};
use super::{
    Destination, FlightOffer, FlightQuery, FlightSource, HotelOffer, StayQuery, StaySource,
};
use crate::config::TravelApiConfig;
use crate::error::{PlannerError, Result};

const FLIGHTS: &str = "flights";
const HOTELS: &str = "hotels";

/// Client for the booking-com15 RapidAPI (flights, destinations, hotels).
pub struct BookingComClient {
    client: Client,
    base_url: String,
    api_key: String,
    host: String,
}

impl BookingComClient {
    pub fn new(cfg: &TravelApiConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            PlannerError::Config(format!("Failed to build travel API HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            host: cfg.host.clone(),
        })
    }

    async fn get(&self, service: &'static str, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Calling travel API");

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .query(query)
            .send()
            .await
            .map_err(|e| PlannerError::upstream(service, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::upstream(
                service,
                format!("{path} returned {status}: {body}"),
            ));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| PlannerError::upstream(service, format!("invalid response body: {e}")))?;
        envelope.into_data(service)
    }
}

/// booking-com15 expects airport ids such as `CDG.AIRPORT`.
fn airport_id(code: &str) -> String {
    let code = code.trim().to_uppercase();
    if code.contains('.') {
        code
    } else {
        format!("{code}.AIRPORT")
    }
}

fn stay_params(query: &StayQuery) -> Vec<(&'static str, String)> {
    vec![
        ("arrival_date", query.arrival_date.to_string()),
        ("departure_date", query.departure_date.to_string()),
        ("adults", query.adults.to_string()),
        ("currency_code", query.currency.clone()),
    ]
}

#[async_trait]
impl FlightSource for BookingComClient {
    async fn search_offers(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>> {
        let params = [
            ("fromId", airport_id(&query.from_airport)),
            ("toId", airport_id(&query.to_airport)),
            ("departDate", query.depart_date.to_string()),
            ("returnDate", query.return_date.to_string()),
            ("adults", query.adults.to_string()),
            ("currency_code", query.currency.clone()),
        ];
        let data = self
            .get(FLIGHTS, "/api/v1/flights/searchFlights", &params)
            .await?;

        let offers: Vec<FlightOffer> = dto::flight_offer_records(&data)
            .into_iter()
            .filter_map(|raw| match dto::condense_flight(&raw) {
                Some(condensed) => Some(FlightOffer { raw, condensed }),
                None => {
                    tracing::warn!("Dropping flight offer without a token");
                    None
                }
            })
            .collect();

        tracing::info!(count = offers.len(), "Flight search complete");
        Ok(offers)
    }
}

#[async_trait]
impl StaySource for BookingComClient {
    async fn resolve_destination(&self, city: &str) -> Result<Option<Destination>> {
        let data = self
            .get(
                HOTELS,
                "/api/v1/hotels/searchDestination",
                &[("query", city.to_string())],
            )
            .await?;
        Ok(dto::first_destination(&data))
    }

    async fn search_hotels(
        &self,
        destination: &Destination,
        query: &StayQuery,
    ) -> Result<Vec<HotelOffer>> {
        let mut params = vec![
            ("dest_id", destination.id.clone()),
            ("search_type", destination.search_type.clone()),
        ];
        params.extend(stay_params(query));

        let data = self
            .get(HOTELS, "/api/v1/hotels/searchHotels", &params)
            .await?;

        let offers: Vec<HotelOffer> = dto::hotel_records(&data)
            .into_iter()
            .filter_map(|raw| match dto::condense_hotel(&raw) {
                Some(condensed) => Some(HotelOffer { raw, condensed }),
                None => {
                    tracing::warn!("Dropping hotel record without a hotel_id");
                    None
                }
            })
            .collect();

        tracing::info!(count = offers.len(), dest_id = %destination.id, "Hotel search complete");
        Ok(offers)
    }

    async fn booking_url(&self, hotel_id: &str, query: &StayQuery) -> Result<Option<String>> {
        let mut params = vec![("hotel_id", hotel_id.to_string())];
        params.extend(stay_params(query));

        let data = self
            .get(HOTELS, "/api/v1/hotels/getHotelDetails", &params)
            .await?;
        Ok(dto::booking_url(&data))
    }
}

//! Shared fixtures and a scripted transport for unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{PlannerError, Result};
use crate::models::{
    ChatRequest, ChatResponse, Choice, ChoiceMessage, ItineraryRequest, Preferences,
};
use crate::providers::dto::{condense_flight, condense_hotel};
use crate::providers::{
    CondensedFlightOffer, CondensedHotelOffer, FlightOffer, HotelOffer, StayQuery,
};
use crate::transport::Transport;

/// Transport that replays canned responses in order and records requests.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<ChatResponse>>) -> Self {
        MockTransport {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .expect("Mock transport mutex should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        self.requests
            .lock()
            .expect("Mock transport mutex should not be poisoned")
            .push(req.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self
            .responses
            .lock()
            .expect("Mock transport mutex should not be poisoned")
            .pop_front();
        next.unwrap_or_else(|| {
            Err(PlannerError::Internal(
                "No more mock responses".to_string(),
            ))
        })
    }
}

pub fn chat_response(content: Option<&str>) -> ChatResponse {
    ChatResponse {
        choices: vec![Choice {
            message: ChoiceMessage {
                content: content.map(str::to_string),
            },
        }],
    }
}

/// A well-formed itinerary reply with `days` day plans.
pub fn itinerary_reply(flight_index: Value, stay_index: Value, days: u32) -> String {
    let plans: Vec<Value> = (1..=days)
        .map(|day| {
            json!({
                "day": day,
                "title": format!("Day {day} in Paris"),
                "activities": [
                    { "time": "Morning", "type": "sightseeing", "description": "Walk along the Seine", "location": "Quai d'Orsay" },
                    { "time": "Evening", "type": "food", "description": "Bistro dinner" }
                ]
            })
        })
        .collect();
    json!({
        "flightIndex": flight_index,
        "stayIndex": stay_index,
        "itinerary": plans,
    })
    .to_string()
}

/// Round-trip offer in the current searchFlights shape.
pub fn raw_flight(token: &str, units: i64) -> Value {
    json!({
        "token": token,
        "priceBreakdown": {
            "total": { "currencyCode": "USD", "units": units, "nanos": 500_000_000 }
        },
        "segments": [
            {
                "departureAirport": { "code": "JFK", "name": "John F. Kennedy" },
                "arrivalAirport": { "code": "CDG", "name": "Charles de Gaulle" },
                "departureTime": "2025-06-01T08:00:00",
                "arrivalTime": "2025-06-01T20:10:00",
                "legs": [{
                    "carriersData": [{ "name": "Air France", "code": "AF", "logo": "https://r-xx.bstatic.com/data/airlines_logo/AF.png" }],
                    "flightInfo": { "flightNumber": 1234, "carrierInfo": { "marketingCarrier": "AF" } }
                }]
            },
            {
                "departureAirport": { "code": "CDG" },
                "arrivalAirport": { "code": "JFK" },
                "departureTime": "2025-06-05T11:00:00",
                "arrivalTime": "2025-06-05T13:30:00",
                "legs": [{
                    "carriersData": [{ "name": "Air France", "code": "AF" }],
                    "flightInfo": { "flightNumber": 1235, "carrierInfo": { "marketingCarrier": "AF" } }
                }]
            }
        ]
    })
}

/// Hotel record in the searchHotels shape.
pub fn raw_hotel(id: u64, name: &str) -> Value {
    json!({
        "hotel_id": id,
        "accessibilityLabel": format!("{name}. 4 stars. 1.2 km from centre."),
        "property": {
            "name": name,
            "reviewScore": 8.7,
            "currency": "USD",
            "photoUrls": [format!("https://cf.bstatic.com/{id}.jpg")],
            "priceBreakdown": { "grossPrice": { "value": 640.0, "currency": "USD" } }
        }
    })
}

pub fn flight_offers(n: usize) -> Vec<FlightOffer> {
    (0..n)
        .map(|i| {
            let raw = raw_flight(&format!("tok-{i}"), 400 + i as i64);
            let condensed = condense_flight(&raw).expect("fixture flight condenses");
            FlightOffer { raw, condensed }
        })
        .collect()
}

pub fn hotel_offers(n: usize) -> Vec<HotelOffer> {
    (0..n)
        .map(|i| {
            let raw = raw_hotel(100 + i as u64, &format!("Hotel {i}"));
            let condensed = condense_hotel(&raw).expect("fixture hotel condenses");
            HotelOffer { raw, condensed }
        })
        .collect()
}

pub fn condensed_flights(n: usize) -> Vec<CondensedFlightOffer> {
    flight_offers(n).into_iter().map(|o| o.condensed).collect()
}

pub fn condensed_hotels(n: usize) -> Vec<CondensedHotelOffer> {
    hotel_offers(n).into_iter().map(|o| o.condensed).collect()
}

/// Paris, 2025-06-01..05, two adults, no inventory requested.
pub fn paris_request() -> ItineraryRequest {
    ItineraryRequest {
        city: "Paris".to_string(),
        date_from: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        date_to: NaiveDate::from_ymd_opt(2025, 6, 5).expect("valid date"),
        adults: 2,
        from_airport: None,
        to_airport: None,
        extra_preferences: None,
        include_flights: false,
        include_stays: false,
        preferences: Preferences {
            climate: Some("mild".to_string()),
            ..Preferences::default()
        },
    }
}

pub fn stay_query() -> StayQuery {
    StayQuery {
        arrival_date: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        departure_date: NaiveDate::from_ymd_opt(2025, 6, 5).expect("valid date"),
        adults: 2,
        currency: "USD".to_string(),
    }
}

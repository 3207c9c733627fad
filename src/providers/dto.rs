//! Wire types for the booking-com15 RapidAPI responses and their reduction
//! to condensed offers.
//!
//! Every field is optional: the provider omits or relocates fields between
//! endpoints and versions, and all of that reconciliation lives here.

use serde::Deserialize;
use serde_json::Value;

use super::{CondensedFlightOffer, CondensedHotelOffer, Destination, FlightSegment};
use crate::error::{PlannerError, Result};

/// A flight offer has at most an outbound and a return segment.
const MAX_SEGMENTS: usize = 2;

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default = "default_status")]
    pub status: bool,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub data: Value,
}

fn default_status() -> bool {
    true
}

impl Envelope {
    /// Unwrap the `data` payload, turning `status: false` into an error.
    pub fn into_data(self, service: &'static str) -> Result<Value> {
        if !self.status {
            let message = self
                .message
                .map(|m| match m {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "status: false".to_string());
            return Err(PlannerError::upstream(service, message));
        }
        Ok(self.data)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlightOffer {
    token: Option<String>,
    #[serde(default)]
    segments: Vec<RawSegment>,
    price_breakdown: Option<RawPriceBreakdown>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPriceBreakdown {
    total: Option<RawMoney>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMoney {
    currency_code: Option<String>,
    units: Option<i64>,
    nanos: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    departure_airport: Option<RawAirport>,
    arrival_airport: Option<RawAirport>,
    departure_time: Option<String>,
    arrival_time: Option<String>,
    #[serde(default)]
    legs: Vec<RawLeg>,
    #[serde(default)]
    carriers_data: Vec<RawCarrier>,
}

#[derive(Debug, Deserialize)]
struct RawAirport {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeg {
    #[serde(default)]
    carriers_data: Vec<RawCarrier>,
    flight_info: Option<RawFlightInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCarrier {
    name: Option<String>,
    logo: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlightInfo {
    flight_number: Option<Value>,
    carrier_info: Option<RawCarrierInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCarrierInfo {
    marketing_carrier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHotel {
    hotel_id: Option<Value>,
    #[serde(rename = "accessibilityLabel")]
    accessibility_label: Option<String>,
    property: Option<RawProperty>,
    #[serde(flatten)]
    top_level: RawProperty,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    id: Option<Value>,
    name: Option<String>,
    review_score: Option<f64>,
    #[serde(default)]
    photo_urls: Vec<String>,
    price_breakdown: Option<RawHotelPrice>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHotelPrice {
    gross_price: Option<RawGrossPrice>,
}

#[derive(Debug, Deserialize)]
struct RawGrossPrice {
    value: Option<f64>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDestination {
    dest_id: Option<Value>,
    search_type: Option<String>,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn format_price(currency: Option<&str>, amount: f64) -> String {
    match currency {
        Some(code) => format!("{code} {amount:.2}"),
        None => format!("{amount:.2}"),
    }
}

/// Offer records under `data.flightOffers`.
pub fn flight_offer_records(data: &Value) -> Vec<Value> {
    data.get("flightOffers")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Hotel records under `data.hotels`.
pub fn hotel_records(data: &Value) -> Vec<Value> {
    data.get("hotels")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// First destination entry with a usable id; `data` is a list.
pub fn first_destination(data: &Value) -> Option<Destination> {
    data.as_array()?
        .iter()
        .filter_map(|entry| serde_json::from_value::<RawDestination>(entry.clone()).ok())
        .find_map(|dest| {
            let id = dest.dest_id.as_ref().and_then(scalar_to_string)?;
            let search_type = dest
                .search_type
                .filter(|t| !t.trim().is_empty())
                .map(|t| t.to_uppercase())
                .unwrap_or_else(|| "CITY".to_string());
            Some(Destination { id, search_type })
        })
}

/// Booking URL from a hotel-details payload.
pub fn booking_url(data: &Value) -> Option<String> {
    data.get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

pub fn condense_flight(raw: &Value) -> Option<CondensedFlightOffer> {
    let offer: RawFlightOffer = serde_json::from_value(raw.clone()).ok()?;
    let token = offer.token.filter(|t| !t.trim().is_empty())?;

    let price = offer
        .price_breakdown
        .and_then(|p| p.total)
        .map(|money| {
            let amount =
                money.units.unwrap_or(0) as f64 + money.nanos.unwrap_or(0) as f64 / 1_000_000_000.0;
            format_price(money.currency_code.as_deref(), amount)
        })
        .unwrap_or_else(|| "price unavailable".to_string());

    let segments = offer
        .segments
        .into_iter()
        .take(MAX_SEGMENTS)
        .map(condense_segment)
        .collect();

    Some(CondensedFlightOffer {
        token,
        price,
        segments,
    })
}

fn condense_segment(segment: RawSegment) -> FlightSegment {
    let first_leg = segment.legs.into_iter().next();

    // Carrier lives on the leg in current payloads, on the segment in older ones.
    let carrier = first_leg
        .as_ref()
        .and_then(|leg| leg.carriers_data.first().cloned())
        .or_else(|| segment.carriers_data.into_iter().next());

    let flight_info = first_leg.and_then(|leg| leg.flight_info);
    let carrier_code = flight_info
        .as_ref()
        .and_then(|info| info.carrier_info.as_ref())
        .and_then(|c| c.marketing_carrier.clone())
        .or_else(|| carrier.as_ref().and_then(|c| c.code.clone()))
        .unwrap_or_default();
    let number = flight_info
        .as_ref()
        .and_then(|info| info.flight_number.as_ref())
        .and_then(scalar_to_string)
        .unwrap_or_default();

    FlightSegment {
        carrier_name: carrier
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| "Unknown carrier".to_string()),
        carrier_logo: carrier.and_then(|c| c.logo),
        flight_number: format!("{carrier_code}{number}"),
        departure_airport: segment
            .departure_airport
            .and_then(|a| a.code)
            .unwrap_or_default(),
        arrival_airport: segment
            .arrival_airport
            .and_then(|a| a.code)
            .unwrap_or_default(),
        departure_time: segment.departure_time.unwrap_or_default(),
        arrival_time: segment.arrival_time.unwrap_or_default(),
    }
}

pub fn condense_hotel(raw: &Value) -> Option<CondensedHotelOffer> {
    let hotel: RawHotel = serde_json::from_value(raw.clone()).ok()?;
    let property = hotel.property.unwrap_or_default();
    let top = hotel.top_level;

    let hotel_id = hotel
        .hotel_id
        .as_ref()
        .and_then(scalar_to_string)
        .or_else(|| property.id.as_ref().and_then(scalar_to_string))
        .or_else(|| top.id.as_ref().and_then(scalar_to_string))?;

    let name = property
        .name
        .or(top.name)
        .unwrap_or_else(|| "Unnamed hotel".to_string());

    let fallback_currency = property.currency.or(top.currency);
    let price = property
        .price_breakdown
        .or(top.price_breakdown)
        .and_then(|p| p.gross_price)
        .and_then(|gross| {
            let currency = gross.currency.or_else(|| fallback_currency.clone());
            gross
                .value
                .map(|value| format_price(currency.as_deref(), value))
        })
        .unwrap_or_else(|| "price unavailable".to_string());

    let photo_url = if property.photo_urls.is_empty() {
        top.photo_urls.into_iter().next()
    } else {
        property.photo_urls.into_iter().next()
    };

    Some(CondensedHotelOffer {
        hotel_id,
        name,
        address: hotel.accessibility_label,
        price,
        rating: property.review_score.or(top.review_score),
        photo_url,
    })
}

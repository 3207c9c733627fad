//! Prompt construction for both LLM workflows.
//!
//! The builders are pure: identical inputs give byte-identical prompts.
//! Offer listings are numbered from zero and the model is told to answer with
//! those numbers only, so the reply can be resolved against the same lists.

use std::fmt::Write;

use crate::models::{ItineraryRequest, Preferences};
use crate::providers::{CondensedFlightOffer, CondensedHotelOffer, FlightSegment};

pub const ITINERARY_SYSTEM_PROMPT: &str = "You are an expert travel planner. You write realistic day-by-day itineraries and you always answer with a single valid JSON object, without markdown or commentary.";

pub const SUGGESTION_SYSTEM_PROMPT: &str = "You are a travel advisor. You answer only with a JSON array of strings, without markdown or commentary.";

const RESPONSE_SHAPE: &str = r#"{
  "flightIndex": <number of the chosen flight option, or null>,
  "stayIndex": <number of the chosen hotel option, or null>,
  "itinerary": [
    {
      "day": 1,
      "title": "Short theme for the day",
      "activities": [
        { "time": "Morning", "type": "sightseeing", "description": "What to do", "location": "Where" }
      ]
    }
  ]
}"#;

/// Rendered request for the itinerary completion. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    text: String,
}

impl GenerationPrompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

fn push_profile(out: &mut String, prefs: &Preferences) {
    let scalar = [
        ("Preferred climate", prefs.climate.as_deref()),
        ("Trip style", prefs.trip_style.as_deref()),
        ("Budget", prefs.budget.as_deref()),
        ("Hotel type", prefs.hotel.as_deref()),
    ];

    out.push_str("Traveler profile:\n");
    for (label, value) in scalar {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            let _ = writeln!(out, "- {label}: {value}");
        }
    }
    if !prefs.interests.is_empty() {
        let _ = writeln!(out, "- Interests: {}", prefs.interests.join(", "));
    }
    if !prefs.food.is_empty() {
        let _ = writeln!(out, "- Food preferences: {}", prefs.food.join(", "));
    }
    let _ = writeln!(out, "- Currency: {}", prefs.currency());
}

fn describe_segment(segment: &FlightSegment) -> String {
    format!(
        "{} {} {} {} -> {} {}",
        segment.carrier_name,
        segment.flight_number,
        segment.departure_airport,
        segment.departure_time,
        segment.arrival_airport,
        segment.arrival_time
    )
}

fn push_flights(out: &mut String, flights: &[CondensedFlightOffer]) {
    out.push_str("\nFlight options:\n");
    for (index, offer) in flights.iter().enumerate() {
        let segments: Vec<String> = offer.segments.iter().map(describe_segment).collect();
        let _ = writeln!(out, "[{index}] {} | {}", offer.price, segments.join(" | "));
    }
}

fn push_hotels(out: &mut String, hotels: &[CondensedHotelOffer]) {
    out.push_str("\nHotel options:\n");
    for (index, offer) in hotels.iter().enumerate() {
        let _ = write!(out, "[{index}] {} | {}", offer.name, offer.price);
        if let Some(address) = &offer.address {
            let _ = write!(out, " | {address}");
        }
        if let Some(rating) = offer.rating {
            let _ = write!(out, " | rating {rating:.1}");
        }
        out.push('\n');
    }
}

/// Render the itinerary prompt. Callers pass the same (already capped)
/// offer lists they will later hand to the resolver.
pub fn build_itinerary_prompt(
    request: &ItineraryRequest,
    flights: &[CondensedFlightOffer],
    hotels: &[CondensedHotelOffer],
) -> GenerationPrompt {
    let days = request.trip_days();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Plan a {days}-day trip to {} from {} to {} for {} adult(s).\n",
        request.city, request.date_from, request.date_to, request.adults
    );

    push_profile(&mut out, &request.preferences);

    if let Some(extra) = request
        .extra_preferences
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        let _ = writeln!(out, "Additional wishes: {extra}");
    }

    if !flights.is_empty() {
        push_flights(&mut out, flights);
    }
    if !hotels.is_empty() {
        push_hotels(&mut out, hotels);
    }

    out.push_str("\nReply with exactly one JSON object with these three fields and no others:\n");
    out.push_str(RESPONSE_SHAPE);
    out.push_str("\n\nRules:\n");
    let _ = writeln!(
        out,
        "- \"itinerary\" must contain exactly {days} entries, with \"day\" numbered 1 to {days}."
    );
    out.push_str("- Give each day 3 to 5 activities; \"time\" is Morning, Afternoon or Evening.\n");
    if flights.is_empty() {
        out.push_str("- No flight options are provided, so \"flightIndex\" must be null.\n");
    } else {
        let _ = writeln!(
            out,
            "- \"flightIndex\" must be the number (0 to {}) of one listed flight option that best fits the profile. Do not invent flights or restate flight details.",
            flights.len() - 1
        );
    }
    if hotels.is_empty() {
        out.push_str("- No hotel options are provided, so \"stayIndex\" must be null.\n");
    } else {
        let _ = writeln!(
            out,
            "- \"stayIndex\" must be the number (0 to {}) of one listed hotel option that best fits the profile. Do not invent hotels or restate hotel details.",
            hotels.len() - 1
        );
    }
    out.push_str("- Plan the first and last day around arrival and departure.\n");

    GenerationPrompt { text: out }
}

/// Render the destination-suggestion prompt.
pub fn build_suggestion_prompt(prefs: &Preferences, count: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Suggest {count} travel destinations that match this traveler.\n"
    );
    push_profile(&mut out, prefs);
    let _ = write!(
        out,
        "\nReply with only a JSON array of exactly {count} strings, each formatted as \"City, Country\". Example: [\"Lisbon, Portugal\", \"Kyoto, Japan\"]"
    );
    out
}

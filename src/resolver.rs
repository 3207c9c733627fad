//! Parsing of model replies and resolution of selection indices.
//!
//! The itinerary reply is parsed leniently: anything unusable degrades to the
//! raw text with no selections. The suggestion reply is parsed strictly and
//! any defect is an error.

use serde_json::Value;

use crate::error::{PlannerError, Result};
use crate::models::{DayPlan, Itinerary};
use crate::providers::{FlightOffer, HotelOffer};

/// Indices the model picked, before bounds checking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selections {
    pub flight_index: Option<usize>,
    pub stay_index: Option<usize>,
}

/// Outcome of parsing an itinerary reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Structured {
        days: Vec<DayPlan>,
        selections: Selections,
    },
    /// Well-formed object without any day plans.
    Empty { selections: Selections },
    /// Not parseable as the expected object; carries the reply verbatim.
    Degraded(String),
}

/// Day plans plus the raw offers the model's indices point at.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub itinerary: Itinerary,
    pub flight: Option<&'a FlightOffer>,
    pub stay: Option<&'a HotelOffer>,
}

/// Isolate the JSON payload in a model reply: drop surrounding markdown
/// fences, then keep the span from the first `open` to the last `close` so
/// commentary on either side is discarded.
fn json_payload(text: &str, open: char, close: char) -> &str {
    let mut candidate = text.trim();

    if let Some(rest) = candidate.strip_prefix("```") {
        // Skip the info string ("json") on the fence line.
        let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
        candidate = body.trim_end().trim_end_matches("```").trim();
    }

    match (candidate.find(open), candidate.rfind(close)) {
        (Some(start), Some(end)) if start < end => &candidate[start..=end],
        _ => candidate,
    }
}

fn index_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<usize> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_u64().and_then(|n| usize::try_from(n).ok()) {
            Some(index) => Some(index),
            None => {
                tracing::warn!(field = key, value = %value, "Ignoring non-integer selection index");
                None
            }
        },
    }
}

/// Parse an itinerary reply. Never fails.
pub fn parse_reply(text: &str) -> ModelReply {
    let degraded = || ModelReply::Degraded(text.to_string());

    let value: Value = match serde_json::from_str(json_payload(text, '{', '}')) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Completion is not valid JSON, returning raw text");
            return degraded();
        }
    };

    let Some(object) = value.as_object() else {
        tracing::warn!("Completion JSON is not an object, returning raw text");
        return degraded();
    };

    let selections = Selections {
        flight_index: index_field(object, "flightIndex"),
        stay_index: index_field(object, "stayIndex"),
    };

    match object.get("itinerary") {
        None | Some(Value::Null) => ModelReply::Empty { selections },
        Some(Value::Array(entries)) if entries.is_empty() => ModelReply::Empty { selections },
        Some(days @ Value::Array(_)) => match serde_json::from_value::<Vec<DayPlan>>(days.clone()) {
            Ok(days) => ModelReply::Structured { days, selections },
            Err(e) => {
                tracing::warn!(error = %e, "Day plans do not match the expected shape, returning raw text");
                degraded()
            }
        },
        Some(_) => {
            tracing::warn!("Completion \"itinerary\" is not an array, returning raw text");
            degraded()
        }
    }
}

fn pick<'a, T>(items: &'a [T], index: Option<usize>, label: &str) -> Option<&'a T> {
    let index = index?;
    let item = items.get(index);
    if item.is_none() {
        tracing::warn!(
            index,
            available = items.len(),
            "Model picked a {} outside the listed options",
            label
        );
    }
    item
}

/// Map the model's indices onto the offers it was shown. Out-of-range
/// indices resolve to no selection.
pub fn resolve<'a>(
    reply: ModelReply,
    flights: &'a [FlightOffer],
    hotels: &'a [HotelOffer],
) -> Resolution<'a> {
    let (itinerary, selections) = match reply {
        ModelReply::Structured { days, selections } => (Itinerary::Days(days), selections),
        ModelReply::Empty { selections } => (Itinerary::Days(Vec::new()), selections),
        ModelReply::Degraded(text) => (Itinerary::Raw(text), Selections::default()),
    };

    Resolution {
        itinerary,
        flight: pick(flights, selections.flight_index, "flight"),
        stay: pick(hotels, selections.stay_index, "stay"),
    }
}

/// Parse a suggestion reply: a non-empty JSON array of non-blank strings.
/// Every entry is checked and the whole array is returned.
pub fn parse_suggestions(text: &str) -> Result<Vec<String>> {
    let payload = json_payload(text, '[', ']');
    let entries: Vec<Value> = serde_json::from_str(payload)
        .map_err(|e| PlannerError::MalformedSuggestions(format!("not a JSON array: {e}")))?;

    if entries.is_empty() {
        return Err(PlannerError::MalformedSuggestions(
            "empty suggestion list".to_string(),
        ));
    }

    let suggestions = entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            other => Err(PlannerError::MalformedSuggestions(format!(
                "unexpected entry: {other}"
            ))),
        })
        .collect::<Result<Vec<String>>>()?;

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{flight_offers, hotel_offers};
    use serde_json::json;

    const TWO_DAYS: &str = r#"{
        "flightIndex": 1,
        "stayIndex": 0,
        "itinerary": [
            {"day": 1, "title": "Arrival", "activities": [
                {"time": "Morning", "type": "travel", "description": "Land at CDG"}
            ]},
            {"day": 2, "title": "Museums", "activities": [
                {"time": "Afternoon", "type": "culture", "description": "Louvre", "location": "Rue de Rivoli"}
            ]}
        ]
    }"#;

    #[test]
    fn test_structured_reply_resolves_raw_offers() {
        let flights = flight_offers(3);
        let hotels = hotel_offers(2);
        let resolution = resolve(parse_reply(TWO_DAYS), &flights, &hotels);

        match &resolution.itinerary {
            Itinerary::Days(days) => {
                assert_eq!(days.len(), 2);
                assert_eq!(days[1].activities[0].location.as_deref(), Some("Rue de Rivoli"));
            }
            other => panic!("expected day plans, got {other:?}"),
        }
        // Same record the adapter produced for that position.
        assert_eq!(resolution.flight, Some(&flights[1]));
        assert_eq!(resolution.flight.unwrap().raw, flights[1].raw);
        assert_eq!(resolution.stay, Some(&hotels[0]));
    }

    #[test]
    fn test_non_json_degrades_to_raw_text() {
        let text = "Day 1: wander around Montmartre. Day 2: Louvre.";
        let reply = parse_reply(text);
        assert_eq!(reply, ModelReply::Degraded(text.to_string()));

        let flights = flight_offers(2);
        let hotels = hotel_offers(2);
        let resolution = resolve(reply, &flights, &hotels);
        assert_eq!(resolution.itinerary, Itinerary::Raw(text.to_string()));
        assert!(resolution.flight.is_none());
        assert!(resolution.stay.is_none());
    }

    #[test]
    fn test_out_of_range_and_malformed_indices_select_nothing() {
        let flights = flight_offers(2);
        let hotels = hotel_offers(1);

        for (flight_index, stay_index) in [
            (json!(2), json!(1)),
            (json!(-1), json!(99)),
            (json!("0"), json!(0.5)),
            (json!(null), json!(true)),
        ] {
            let reply = json!({
                "flightIndex": flight_index,
                "stayIndex": stay_index,
                "itinerary": [{"day": 1, "title": "Only day", "activities": []}]
            })
            .to_string();
            let resolution = resolve(parse_reply(&reply), &flights, &hotels);
            assert!(resolution.flight.is_none(), "flightIndex {flight_index}");
            assert!(resolution.stay.is_none(), "stayIndex {stay_index}");
            assert!(matches!(resolution.itinerary, Itinerary::Days(ref d) if d.len() == 1));
        }
    }

    #[test]
    fn test_indices_into_empty_lists_select_nothing() {
        let reply = parse_reply(r#"{"flightIndex": 0, "stayIndex": 0, "itinerary": []}"#);
        assert_eq!(
            reply,
            ModelReply::Empty {
                selections: Selections {
                    flight_index: Some(0),
                    stay_index: Some(0)
                }
            }
        );
        let resolution = resolve(reply, &[], &[]);
        assert_eq!(resolution.itinerary, Itinerary::Days(vec![]));
        assert!(resolution.flight.is_none());
        assert!(resolution.stay.is_none());
    }

    #[test]
    fn test_fenced_and_wrapped_json_is_recovered() {
        let fenced = format!("```json\n{TWO_DAYS}\n```");
        assert!(matches!(parse_reply(&fenced), ModelReply::Structured { .. }));

        let chatty = format!("Here is your plan:\n{TWO_DAYS}\nEnjoy!");
        assert!(matches!(parse_reply(&chatty), ModelReply::Structured { .. }));
    }

    #[test]
    fn test_trailing_commentary_is_dropped() {
        let flights = flight_offers(3);
        let hotels = hotel_offers(2);
        let reply = parse_reply(&format!("{TWO_DAYS}\nHope you enjoy Paris!"));
        assert!(matches!(reply, ModelReply::Structured { .. }));

        let resolution = resolve(reply, &flights, &hotels);
        assert_eq!(resolution.flight, Some(&flights[1]));
        assert_eq!(resolution.stay, Some(&hotels[0]));

        let parsed = parse_suggestions("[\"Lisbon, Portugal\"]\nHave a nice trip").unwrap();
        assert_eq!(parsed, vec!["Lisbon, Portugal"]);
    }

    #[test]
    fn test_null_activity_fields_keep_structure() {
        let reply = parse_reply(
            r#"{"flightIndex": null, "stayIndex": null, "itinerary": [
                {"day": 1, "title": null, "activities": [
                    {"time": "Morning", "type": null, "description": null, "location": null}
                ]}
            ]}"#,
        );
        match reply {
            ModelReply::Structured { days, .. } => {
                assert_eq!(days[0].title, "");
                assert_eq!(days[0].activities[0].time, "Morning");
                assert_eq!(days[0].activities[0].description, "");
                assert_eq!(days[0].activities[0].location, None);
            }
            other => panic!("expected day plans, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shapes_degrade() {
        for text in [
            r#"[1, 2, 3]"#,
            r#"{"itinerary": "Day 1: Louvre"}"#,
            r#"{"itinerary": [{"title": "no day number"}]}"#,
        ] {
            assert_eq!(parse_reply(text), ModelReply::Degraded(text.to_string()));
        }
    }

    #[test]
    fn test_parse_suggestions_strict() {
        let parsed = parse_suggestions(r#"["Lisbon, Portugal", " Kyoto, Japan "]"#).unwrap();
        assert_eq!(parsed, vec!["Lisbon, Portugal", "Kyoto, Japan"]);

        let parsed = parse_suggestions("```json\n[\"A, X\", \"B, Y\", \"C, Z\"]\n```").unwrap();
        assert_eq!(parsed, vec!["A, X", "B, Y", "C, Z"]);

        // More entries than were asked for are returned as-is.
        let six = r#"["A, X", "B, Y", "C, Z", "D, W", "E, V", "F, U"]"#;
        assert_eq!(parse_suggestions(six).unwrap().len(), 6);

        for text in [
            "not json",
            "[]",
            r#"["Lisbon, Portugal", 3]"#,
            r#"{"a": 1}"#,
            r#"["  "]"#,
            r#"["A, X", "B, Y", "C, Z", "D, W", "E, V", 42]"#,
        ] {
            let err = parse_suggestions(text).unwrap_err();
            assert!(
                matches!(err, PlannerError::MalformedSuggestions(_)),
                "{text} should be rejected"
            );
        }
    }
}

use chrono::NaiveDate;

use crate::error::{PlannerError, Result};
use crate::models::{ItineraryRequest, ItineraryRequestBody, Preferences, SuggestionRequestBody};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Checks inbound request bodies before any outbound call is made.
#[derive(Debug, Default, Clone)]
pub struct InputValidator;

#[derive(Default)]
struct Report {
    missing: Vec<String>,
    invalid: Vec<String>,
}

impl Report {
    fn missing(&mut self, field: &str) {
        self.missing.push(field.to_string());
    }

    fn invalid(&mut self, field: &str) {
        self.invalid.push(field.to_string());
    }

    fn into_result(self) -> Result<()> {
        if self.missing.is_empty() && self.invalid.is_empty() {
            Ok(())
        } else {
            Err(PlannerError::Validation {
                missing: self.missing,
                invalid: self.invalid,
            })
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(report: &mut Report, field: &str, value: Option<&str>) -> Option<NaiveDate> {
    match non_blank(value) {
        None => {
            report.missing(field);
            None
        }
        Some(raw) => match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                report.invalid(field);
                None
            }
        },
    }
}

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate an itinerary body, reporting every offending field at once.
    pub fn itinerary(&self, body: ItineraryRequestBody) -> Result<ItineraryRequest> {
        let mut report = Report::default();

        let city = non_blank(body.city.as_deref());
        if city.is_none() {
            report.missing("city");
        }

        let date_from = parse_date(&mut report, "dateFrom", body.date_from.as_deref());
        let date_to = parse_date(&mut report, "dateTo", body.date_to.as_deref());
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                report.invalid("dateTo");
            }
        }

        let adults = match &body.adults {
            None => {
                report.missing("adults");
                None
            }
            Some(raw) => match raw.to_i64().and_then(|n| u32::try_from(n).ok()) {
                Some(n) if n >= 1 => Some(n),
                _ => {
                    report.invalid("adults");
                    None
                }
            },
        };

        if body.preferences.is_none() {
            report.missing("preferences");
        }

        report.into_result()?;

        // Every branch above that yields None records a field, so these hold.
        match (city, date_from, date_to, adults, body.preferences) {
            (Some(city), Some(date_from), Some(date_to), Some(adults), Some(preferences)) => {
                Ok(ItineraryRequest {
                    city,
                    date_from,
                    date_to,
                    adults,
                    from_airport: non_blank(body.from_airport.as_deref()),
                    to_airport: non_blank(body.to_airport.as_deref()),
                    extra_preferences: non_blank(body.extra_preferences.as_deref()),
                    include_flights: body.include_flights.unwrap_or(false),
                    include_stays: body.include_stays.unwrap_or(false),
                    preferences,
                })
            }
            _ => Err(PlannerError::Internal(
                "validated itinerary request is incomplete".to_string(),
            )),
        }
    }

    pub fn suggestions(&self, body: SuggestionRequestBody) -> Result<Preferences> {
        body.preferences.ok_or_else(|| PlannerError::Validation {
            missing: vec!["preferences".to_string()],
            invalid: vec![],
        })
    }
}

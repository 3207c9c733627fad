use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integer that may arrive as a JSON number, float or numeric string from
/// different web clients. Kept unconverted so validation can report it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleInt {
    Int(i64),
    Float(f64),
    String(String),
}

impl FlexibleInt {
    /// Integer value, if the input is integral.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            FlexibleInt::Int(i) => Some(*i),
            FlexibleInt::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            FlexibleInt::Float(_) => None,
            FlexibleInt::String(s) => s.trim().parse::<i64>().ok(),
        }
    }
}

/// User preference profile, as stored by the profile service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub currency: Option<String>,
    pub interests: Vec<String>,
    pub budget: Option<String>,
    pub hotel: Option<String>,
    pub food: Vec<String>,
    pub climate: Option<String>,
    pub trip_style: Option<String>,
}

impl Preferences {
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    pub fn currency(&self) -> &str {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(Self::DEFAULT_CURRENCY)
    }
}

/// Body of `POST /api/ai/itinerary` before validation. Every field is
/// optional here so missing ones can be itemized.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryRequestBody {
    pub city: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub adults: Option<FlexibleInt>,
    pub from_airport: Option<String>,
    pub to_airport: Option<String>,
    pub extra_preferences: Option<String>,
    pub include_flights: Option<bool>,
    pub include_stays: Option<bool>,
    pub preferences: Option<Preferences>,
}

/// A validated itinerary request.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryRequest {
    pub city: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub adults: u32,
    pub from_airport: Option<String>,
    pub to_airport: Option<String>,
    pub extra_preferences: Option<String>,
    pub include_flights: bool,
    pub include_stays: bool,
    pub preferences: Preferences,
}

impl ItineraryRequest {
    /// Inclusive trip length in days.
    pub fn trip_days(&self) -> i64 {
        (self.date_to - self.date_from).num_days() + 1
    }
}

/// Body of `POST /api/ai/suggestions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SuggestionRequestBody {
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<Activity>,
}

/// Day plans, or the model's raw text when its reply could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Itinerary {
    Days(Vec<DayPlan>),
    Raw(String),
}

/// Response body of the itinerary workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResult {
    pub itinerary: Itinerary,
    pub selected_flight: Option<Value>,
    pub selected_stay: Option<Value>,
    pub stay_booking_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionResult {
    pub suggestions: Vec<String>,
}

// OpenAI-compatible chat message format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// Chat completions request format
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

// Chat completions response format
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Assistant message in a completion choice. `content` may be null when the
/// provider filters the output.
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

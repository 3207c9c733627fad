use super::*;
use crate::completion::CompletionClient;
use crate::config::Config;
use crate::error::PlannerError;
use crate::providers::{MockFlightSource, MockStaySource};
use crate::testing::{MockTransport, chat_response, itinerary_reply};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(tx: Arc<MockTransport>) -> Router {
    app_with_sources(MockFlightSource::new(), MockStaySource::new(), tx)
}

fn app_with_sources(
    flights: MockFlightSource,
    stays: MockStaySource,
    tx: Arc<MockTransport>,
) -> Router {
    let cfg = Config::default();
    let completion = Arc::new(CompletionClient::new(tx, &cfg.llm));
    let state = AppState {
        planner: Arc::new(ItineraryPlanner::new(
            Arc::new(flights),
            Arc::new(stays),
            completion.clone(),
            cfg.planner.max_offers_in_prompt,
        )),
        suggester: Arc::new(DestinationSuggester::new(
            completion,
            cfg.planner.suggestion_count,
        )),
    };
    router(state)
}

async fn post_json(app: Router, uri: &str, body: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn scenario_a() -> Value {
    json!({
        "city": "Paris",
        "dateFrom": "2025-06-01",
        "dateTo": "2025-06-05",
        "adults": 2,
        "includeFlights": false,
        "includeStays": false,
        "preferences": { "climate": "mild" }
    })
}

#[tokio::test]
async fn itinerary_without_inventory_returns_null_selections() {
    let tx = Arc::new(MockTransport::new(vec![Ok(chat_response(Some(
        &itinerary_reply(json!(null), json!(null), 5),
    )))]));
    let response = post_json(app(tx), "/api/ai/itinerary", &scenario_a().to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["selectedFlight"], Value::Null);
    assert_eq!(json["selectedStay"], Value::Null);
    assert_eq!(json["stayBookingUrl"], Value::Null);
    assert_eq!(json["itinerary"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["itinerary"][0]["activities"][0]["type"], "sightseeing");
}

#[tokio::test]
async fn itinerary_missing_adults_is_400_without_outbound_calls() {
    let mut body = scenario_a();
    body.as_object_mut().unwrap().remove("adults");

    let tx = Arc::new(MockTransport::new(vec![]));
    let response = post_json(app(tx.clone()), "/api/ai/itinerary", &body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["missing"], json!(["adults"]));
    assert!(tx.requests().is_empty());
}

#[tokio::test]
async fn itinerary_completion_failure_is_500() {
    let tx = Arc::new(MockTransport::new(vec![Err(PlannerError::Completion(
        "dns error".to_string(),
    ))]));
    let response = post_json(app(tx), "/api/ai/itinerary", &scenario_a().to_string()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn itinerary_raw_text_fallback_is_200() {
    let tx = Arc::new(MockTransport::new(vec![Ok(chat_response(Some(
        "Day 1: Eiffel Tower",
    )))]));
    let response = post_json(app(tx), "/api/ai/itinerary", &scenario_a().to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["itinerary"], "Day 1: Eiffel Tower");
    assert_eq!(json["selectedFlight"], Value::Null);
}

#[tokio::test]
async fn malformed_body_is_400() {
    let tx = Arc::new(MockTransport::new(vec![]));
    let response = post_json(app(tx), "/api/ai/itinerary", "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn suggestions_return_model_array() {
    let tx = Arc::new(MockTransport::new(vec![Ok(chat_response(Some(
        r#"["Lisbon, Portugal", "Kyoto, Japan"]"#,
    )))]));
    let body = json!({ "preferences": { "climate": "warm" } }).to_string();
    let response = post_json(app(tx), "/api/ai/suggestions", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "suggestions": ["Lisbon, Portugal", "Kyoto, Japan"] }));
}

#[tokio::test]
async fn suggestions_non_json_reply_is_500() {
    let tx = Arc::new(MockTransport::new(vec![Ok(chat_response(Some("not json")))]));
    let body = json!({ "preferences": { "climate": "warm" } }).to_string();
    let response = post_json(app(tx), "/api/ai/suggestions", &body).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_is_ok() {
    let tx = Arc::new(MockTransport::new(vec![]));
    let response = app(tx)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_destination_still_returns_itinerary() {
    let mut stays = MockStaySource::new();
    stays.expect_resolve_destination().returning(|_| Ok(None));

    let mut body = scenario_a();
    body["includeStays"] = json!(true);
    let tx = Arc::new(MockTransport::new(vec![Ok(chat_response(Some(
        &itinerary_reply(json!(null), json!(null), 5),
    )))]));
    let response = post_json(
        app_with_sources(MockFlightSource::new(), stays, tx),
        "/api/ai/itinerary",
        &body.to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["selectedStay"], Value::Null);
    assert_eq!(json["stayBookingUrl"], Value::Null);
}

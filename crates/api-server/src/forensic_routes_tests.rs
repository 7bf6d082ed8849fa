use crate::{build_router, AppState, ServerConfig};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fundamental_analysis::{ForensicEngine, VerdictThresholds};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> axum::Router {
    build_router(AppState::new(ForensicEngine::new()), &ServerConfig::default())
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(uri, &body.to_string()).await
}

async fn post_raw(uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_verdict_scrap_elite() {
    let (status, body) = post_json(
        "/api/forensic/verdict",
        json!({
            "symbol": "acme",
            "currentPrice": 100.0,
            "marketCap": 1_000_000_000.0,
            "totalCash": 400_000_000.0,
            "totalDebt": 50_000_000.0,
            "forwardPE": 10.0,
            "revenueGrowth": 0.2,
            "pegRatio": 1.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["label"], "SCRAP_ELITE");
    assert_eq!(body["data"]["severity"], "positive");
    assert_eq!(body["data"]["snapshot"]["symbol"], "ACME");
    assert_eq!(body["data"]["snapshot"]["currency_mismatch"], false);
}

#[tokio::test]
async fn test_verdict_price_unavailable_is_422() {
    let (status, body) = post_json(
        "/api/forensic/verdict",
        json!({ "symbol": "NOPX", "marketCap": 10.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("NOPX"));
}

#[tokio::test]
async fn test_verdict_non_object_is_400() {
    let (status, body) = post_json("/api/forensic/verdict", json!(["AAPL"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed input"));
}

#[tokio::test]
async fn test_invalid_json_body_is_400_envelope() {
    let (status, body) = post_raw("/api/forensic/verdict", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed input"));
}

#[tokio::test]
async fn test_batch_with_object_body_is_400_envelope() {
    let (status, body) = post_json("/api/forensic/batch", json!({ "symbol": "A" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["data"].is_null());
    assert!(body["error"].as_str().unwrap().starts_with("Malformed input"));
}

#[tokio::test]
async fn test_batch_reports_per_record() {
    let (status, body) = post_json(
        "/api/forensic/batch",
        json!([
            { "symbol": "good", "currentPrice": 5.0, "revenueGrowth": -0.2 },
            { "symbol": "nopx" }
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["symbol"], "GOOD");
    assert_eq!(items[0]["report"]["label"], "KILL_SWITCH");
    assert_eq!(items[0]["report"]["triggered_rule"], "growth_risk");
    assert_eq!(items[1]["symbol"], "NOPX");
    assert!(items[1]["report"].is_null());
    assert!(items[1]["error"].is_string());
}

#[tokio::test]
async fn test_batch_limit() {
    let records: Vec<Value> = (0..51)
        .map(|i| json!({ "symbol": format!("T{}", i), "currentPrice": 1.0 }))
        .collect();
    let (status, _) = post_json("/api/forensic/batch", Value::Array(records)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_thresholds_endpoint() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/forensic/thresholds")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let thresholds: VerdictThresholds = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(thresholds, VerdictThresholds::default());
}

#[tokio::test]
async fn test_health_has_request_id() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and the dashboard queries.


use serde_json::{json, Value};

use test_utils::TestApiServer;

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "demandlens-dashboard");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "chart_queries_total",
        "explanations_streamed_total",
    ] {
        assert!(body.contains(name), "Expected {} metric", name);
    }
}

#[tokio::test]
async fn demand_endpoint_returns_raw_rows_for_region() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/demand").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["metadata"]["state"], "TX");
    assert_eq!(body["metadata"]["dateRange"]["start"], "2026-01-17");
    assert_eq!(body["metadata"]["dateRange"]["end"], "2026-02-20");
    // Raw rows are not cut at the recorded cutoff
    assert_eq!(body["actual"].as_array().unwrap().len(), 9);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 29);
    assert_eq!(body["weather"].as_array().unwrap().len(), 7);
    assert_eq!(body["actual"][0]["energySource"], "Gas");

    let response = app.server.get("/api/demand?state=CA").await;
    let body: Value = response.json();
    assert_eq!(body["actual"].as_array().unwrap().len(), 1);
    assert!(body["forecast"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn demand_endpoint_rejects_bad_parameters() {
    let app = TestApiServer::new().await;

    let response = app.server.get("/api/demand?state=ZZ").await;
    assert_eq!(response.status_code(), 400);

    let response = app.server.get("/api/demand?start=yesterday").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn chart_endpoint_merges_and_flags_outliers() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/chart").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert_eq!(points[0]["date"], "2026-02-10");
    assert_eq!(points[6]["date"], "2026-02-16");

    let outliers: Vec<&str> = points
        .iter()
        .filter(|p| p["isOutlier"] == true)
        .map(|p| p["date"].as_str().unwrap())
        .collect();
    assert_eq!(outliers, vec!["2026-02-11"]);

    // The actual row dated after the cutoff is dropped
    assert!(points[4]["actual"].is_null());
    assert_eq!(points[4]["isFuture"], true);

    // Boundary point carries both halves of the forecast line
    assert_eq!(points[3]["predictedPast"], 11_000.0);
    assert_eq!(points[3]["predictedFuture"], 11_000.0);

    assert_eq!(body["metrics"]["mae"], 500.0);
    assert_eq!(body["metrics"]["rmse"], 1_000.0);
    assert_eq!(body["metrics"]["maxError"], 2_000.0);
    assert_eq!(body["metrics"]["overallErrorRate"], 3.8);
    assert_eq!(body["metadata"]["referenceDate"], "2026-02-13");
    assert_eq!(body["metadata"]["primary"]["mode"], "pinned");
}

#[tokio::test]
async fn chart_endpoint_filters_sources() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/chart?sources=Gas").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["points"][0]["actual"], 10_000.0);
    assert_eq!(body["points"][0]["predicted"], 10_000.0);
    assert_eq!(body["metadata"]["sources"], json!(["Gas"]));

    let response = app.server.get("/api/chart?sources=Gas,Coal").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn chart_endpoint_overlays_comparison_vintage() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .get("/api/chart?primaryDate=2026-02-13&comparisonDate=2026-02-06")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let flagged: Vec<&str> = body["points"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["comparisonOutlier"] == true)
        .map(|p| p["date"].as_str().unwrap())
        .collect();
    assert_eq!(flagged, vec!["2026-02-15"]);
    assert_eq!(body["points"][5]["comparisonPredictedFuture"], 13_000.0);
    assert_eq!(body["metadata"]["comparison"]["date"], "2026-02-06");
}

#[tokio::test]
async fn chart_endpoint_latest_vintage_uses_newest_run() {
    let app = TestApiServer::new().await;

    let pinned: Value = app.server.get("/api/chart").await.json();
    assert_eq!(pinned["points"][6]["predicted"], 11_000.0);

    let response = app.server.get("/api/chart?vintage=latest").await;
    assert_eq!(response.status_code(), 200);
    let latest: Value = response.json();
    assert_eq!(latest["points"][6]["predicted"], 21_000.0);
    assert_eq!(latest["metadata"]["primary"]["mode"], "latest");
    assert_eq!(latest["metadata"]["referenceDate"], "2026-02-13");

    let response = app.server.get("/api/chart?vintage=oldest").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn chart_queries_are_counted() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/api/chart").await;
    let _ = app.server.get("/api/chart").await;

    assert_eq!(app.metrics.chart_queries_total.get(), 2);
    assert_eq!(app.metrics.outliers_flagged_total.get(), 2);
}

#[tokio::test]
async fn explain_endpoint_streams_chunks_then_done() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/explain")
        .json(&json!({
            "date": "2026-02-11",
            "actual": 13000,
            "predicted": 11000,
            "state": "TX",
            "temperature": 41
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("data:"));
    assert!(body.contains("Texas"));
    assert!(body.contains("\"done\":true"));
    let text_events = body.matches("\"text\"").count();
    assert!(text_events >= 2, "Expected several chunks, got {}", text_events);
    assert_eq!(app.metrics.explanations_streamed_total.get(), 1);
}

#[tokio::test]
async fn explain_endpoint_streams_comparison_narrative() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/explain")
        .json(&json!({
            "date": "2026-02-15",
            "predicted": 11000,
            "state": "TX",
            "temperature": 41,
            "isComparisonPoint": true,
            "comparisonPredicted": 13000,
            "daysDifference": 7
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    assert!(body.contains("7 days apart"));
    assert!(body.contains("\"done\":true"));
}

#[tokio::test]
async fn explain_endpoint_rejects_zero_forecast() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/explain")
        .json(&json!({
            "date": "2026-02-11",
            "actual": 13000,
            "predicted": 0,
            "state": "TX"
        }))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), 422);
    assert_eq!(app.metrics.explanations_streamed_total.get(), 0);
}

#[tokio::test]
async fn reload_endpoint_accepts_in_memory_store() {
    let app = TestApiServer::new().await;
    let response = app.server.post("/api/reload").await;
    assert_eq!(response.status_code(), 204);
}

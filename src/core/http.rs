//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{
        sse::{Event, Sse},
        Json, Response,
    },
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use futures_util::stream::{self, Stream, StreamExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::analysis::merge::{MergeOptions, Merger};
use crate::analysis::vintage::ForecastVintage;
use crate::config::{parse_date, DashboardConfig, ExplainPacing};
use crate::db::{CsvDemandStore, DemandStore};
use crate::explain::{generate_explanation, ExplainRequest};
use crate::metrics::Metrics;
use crate::models::chart::ChartData;
use crate::models::readings::{ActualReading, DateRange, ForecastReading, WeatherObservation};
use crate::models::region::{EnergySource, Region};

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub store: Arc<dyn DemandStore>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DemandStore>,
        config: DashboardConfig,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics: Arc::new(Metrics::new()?),
            start_time: Arc::new(Instant::now()),
            store,
            config: Arc::new(config),
        })
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "demandlens-dashboard"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct DemandQuery {
    state: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartQuery {
    state: Option<String>,
    start: Option<String>,
    end: Option<String>,
    /// Comma-separated energy sources, blank for all
    sources: Option<String>,
    primary_date: Option<String>,
    comparison_date: Option<String>,
    /// `pinned` (default) or `latest`
    vintage: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryMetadata {
    state: Region,
    date_range: DateRange,
}

#[derive(Debug, Serialize)]
struct DemandResponse {
    actual: Vec<ActualReading>,
    forecast: Vec<ForecastReading>,
    weather: Vec<WeatherObservation>,
    metadata: QueryMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartMetadata {
    state: Region,
    date_range: DateRange,
    reference_date: NaiveDate,
    primary: ForecastVintage,
    comparison: Option<ForecastVintage>,
    sources: Vec<EnergySource>,
}

#[derive(Debug, Serialize)]
struct ChartResponse {
    #[serde(flatten)]
    chart: ChartData,
    metadata: ChartMetadata,
}

fn bad_request(param: &str, reason: impl std::fmt::Display) -> StatusCode {
    warn!(param = param, reason = %reason, "Rejected query parameter");
    StatusCode::BAD_REQUEST
}

fn resolve_region(raw: Option<&str>, config: &DashboardConfig) -> Result<Region, StatusCode> {
    match raw {
        Some(code) if !code.trim().is_empty() => {
            code.parse().map_err(|e: String| bad_request("state", e))
        }
        _ => Ok(config.default_region),
    }
}

fn resolve_date(
    param: &str,
    raw: Option<&str>,
    fallback: NaiveDate,
) -> Result<NaiveDate, StatusCode> {
    match raw {
        Some(value) if !value.trim().is_empty() => {
            parse_date(param, value).map_err(|e| bad_request(param, e))
        }
        _ => Ok(fallback),
    }
}

fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    config: &DashboardConfig,
) -> Result<DateRange, StatusCode> {
    Ok(DateRange::new(
        resolve_date("start", start, config.default_range.start)?,
        resolve_date("end", end, config.default_range.end)?,
    ))
}

async fn load_series(
    store: &dyn DemandStore,
    region: Region,
    range: DateRange,
) -> Result<(Vec<ActualReading>, Vec<ForecastReading>, Vec<WeatherObservation>), StatusCode> {
    let load_failed = |e: crate::db::StoreError| {
        error!(error = %e, region = %region, "Failed to load demand data");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let actual = store.historical(region, range).await.map_err(load_failed)?;
    let forecasts = store.forecasts(region, range).await.map_err(load_failed)?;
    let weather = store.weather(region, range).await.map_err(load_failed)?;
    Ok((actual, forecasts, weather))
}

/// Raw rows for a region and date range
async fn get_demand(
    State(state): State<AppState>,
    Query(params): Query<DemandQuery>,
) -> Result<Json<DemandResponse>, StatusCode> {
    let region = resolve_region(params.state.as_deref(), &state.config)?;
    let range = resolve_range(params.start.as_deref(), params.end.as_deref(), &state.config)?;

    let (actual, forecast, weather) = load_series(state.store.as_ref(), region, range).await?;

    Ok(Json(DemandResponse {
        actual,
        forecast,
        weather,
        metadata: QueryMetadata {
            state: region,
            date_range: range,
        },
    }))
}

/// Merged chart points with error metrics
async fn get_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, StatusCode> {
    let config = state.config.as_ref();
    let region = resolve_region(params.state.as_deref(), config)?;
    let range = resolve_range(params.start.as_deref(), params.end.as_deref(), config)?;
    let sources = EnergySource::parse_selection(params.sources.as_deref().unwrap_or(""))
        .map_err(|e| bad_request("sources", e))?;

    let primary_date = resolve_date(
        "primaryDate",
        params.primary_date.as_deref(),
        config.real_today,
    )?;
    let primary = match params.vintage.as_deref().map(str::trim) {
        None | Some("") | Some("pinned") => ForecastVintage::Pinned(primary_date),
        Some("latest") => ForecastVintage::Latest,
        Some(other) => return Err(bad_request("vintage", format!("unknown mode '{}'", other))),
    };
    let comparison = match params.comparison_date.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(ForecastVintage::Pinned(
            parse_date("comparisonDate", raw).map_err(|e| bad_request("comparisonDate", e))?,
        )),
        _ => None,
    };

    let options = MergeOptions {
        sources,
        primary,
        comparison,
        real_today: config.real_today,
    };

    let (actual, forecasts, weather) = load_series(state.store.as_ref(), region, range).await?;
    let chart = Merger::build_chart(&actual, &forecasts, &weather, &options);

    let outliers = chart.points.iter().filter(|p| p.is_outlier).count();
    state.metrics.chart_queries_total.inc();
    state.metrics.outliers_flagged_total.inc_by(outliers as u64);
    info!(
        region = %region,
        points = chart.points.len(),
        outliers = outliers,
        "Computed chart"
    );

    Ok(Json(ChartResponse {
        metadata: ChartMetadata {
            state: region,
            date_range: range,
            reference_date: options.reference_date(),
            primary: options.primary,
            comparison: options.comparison,
            sources: options.sources,
        },
        chart,
    }))
}

fn chunk_delay(pacing: ExplainPacing) -> Duration {
    let min = pacing.min_delay.as_millis() as u64;
    let max = pacing.max_delay.as_millis() as u64;
    if max <= min {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rand::rng().random_range(min..=max))
}

/// Stream an explanation as server-sent events, one chunk per event
async fn explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, StatusCode> {
    let chunks = generate_explanation(&request).map_err(|e| {
        warn!(error = %e, "Cannot explain point");
        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    state.metrics.explanations_streamed_total.inc();
    info!(
        date = %request.date,
        region = %request.state,
        chunks = chunks.len(),
        comparison = request.is_comparison_point,
        "Streaming explanation"
    );

    let pacing = state.config.explain_pacing;
    let events = chunks
        .into_iter()
        .map(|text| json!({ "text": text }))
        .chain(std::iter::once(json!({ "done": true })))
        .enumerate();

    let stream = stream::iter(events).then(move |(i, payload)| async move {
        if i > 0 {
            tokio::time::sleep(chunk_delay(pacing)).await;
        }
        Event::default().json_data(payload)
    });

    Ok(Sse::new(stream))
}

/// Ask the store to re-read its backing files
async fn reload_store(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    state.store.reload().await.map_err(|e| {
        error!(error = %e, "Failed to reload demand store");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/demand", get(get_demand))
        .route("/api/chart", get(get_chart))
        .route("/api/explain", post(explain))
        .route("/api/reload", post(reload_store))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    config: DashboardConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = CsvDemandStore::open(config.data_dir.clone()).await?;
    info!(dir = %store.dir().display(), "CSV demand store ready");

    let state = AppState::new(Arc::new(store), config).map_err(|e| e.to_string())?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

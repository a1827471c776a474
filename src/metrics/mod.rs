//! Prometheus metrics for the HTTP service

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub chart_queries_total: IntCounter,
    pub outliers_flagged_total: IntCounter,
    pub explanations_streamed_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests handled")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;
        let chart_queries_total =
            IntCounter::new("chart_queries_total", "Merged chart queries computed")?;
        let outliers_flagged_total = IntCounter::new(
            "outliers_flagged_total",
            "Points flagged as actual-vs-forecast outliers across chart queries",
        )?;
        let explanations_streamed_total =
            IntCounter::new("explanations_streamed_total", "Explanations streamed to clients")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(chart_queries_total.clone()))?;
        registry.register(Box::new(outliers_flagged_total.clone()))?;
        registry.register(Box::new(explanations_streamed_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            chart_queries_total,
            outliers_flagged_total,
            explanations_streamed_total,
        })
    }

    /// Render every registered metric in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

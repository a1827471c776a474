//! Derived per-date records handed to the presentation and explanation layers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One merged date across actuals, forecasts and weather.
///
/// `*_past` / `*_future` carry the same value as their base field on the
/// side of the reference date they fall on, and null on the other side.
/// At the reference date itself both halves are set so that a past line and
/// a future line meet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedPoint {
    pub date: NaiveDate,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
    pub predicted_past: Option<f64>,
    pub predicted_future: Option<f64>,
    pub confidence_high: Option<f64>,
    pub confidence_low: Option<f64>,
    pub comparison_predicted: Option<f64>,
    pub comparison_predicted_past: Option<f64>,
    pub comparison_predicted_future: Option<f64>,
    pub comparison_outlier: bool,
    pub is_outlier: bool,
    pub is_future: bool,
    pub temperature: Option<f64>,
    pub temperature_past: Option<f64>,
    pub temperature_future: Option<f64>,
    pub humidity: Option<f64>,
    pub humidity_past: Option<f64>,
    pub humidity_future: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_speed_past: Option<f64>,
    pub wind_speed_future: Option<f64>,
}

/// Forecast accuracy over the dates that have both an actual and a forecast
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub max_error: f64,
    /// Mean absolute percentage error, one decimal place
    pub overall_error_rate: f64,
}

/// Narrow projection of a point for the explanation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPoint {
    pub date: NaiveDate,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
    pub temperature: Option<f64>,
    pub is_outlier: bool,
    pub deviation_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comparison_predicted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comparison_deviation_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub days_difference: Option<i64>,
    #[serde(default)]
    pub is_comparison_point: bool,
}

/// Full chart payload: aligned points plus their summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub points: Vec<AlignedPoint>,
    pub metrics: ErrorMetrics,
    pub y_domain: (f64, f64),
}

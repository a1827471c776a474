//! Forecast/actual alignment and outlier detection.
//!
//! Every function here is a pure transformation of its inputs.

pub mod aggregation;
pub mod merge;
pub mod metrics;
pub mod outliers;
pub mod selection;
pub mod vintage;

pub use aggregation::{Aggregator, DailyTotals};
pub use merge::{MergeOptions, Merger};
pub use metrics::{compute_error_metrics, compute_y_domain};
pub use outliers::{deviation_percent, deviation_ratio, OutlierClassifier};
pub use vintage::ForecastVintage;

//! Forecast error statistics and chart axis bounds

use crate::models::chart::{AlignedPoint, ErrorMetrics};

/// Fallback axis when there is nothing to plot
pub const EMPTY_Y_DOMAIN: (f64, f64) = (0.0, 100_000.0);
const Y_DOMAIN_PADDING: f64 = 0.08;

/// Compute RMSE, MAE, max error and mean percentage error.
///
/// Only points with both an actual and a primary forecast count. Points with
/// an actual of zero are left out of the percentage average.
pub fn compute_error_metrics(points: &[AlignedPoint]) -> ErrorMetrics {
    let pairs: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| Some((p.actual?, p.predicted?)))
        .collect();

    if pairs.is_empty() {
        return ErrorMetrics::default();
    }

    let mut sum_squared = 0.0;
    let mut sum_abs = 0.0;
    let mut max_error: f64 = 0.0;
    let mut sum_pct = 0.0;
    let mut pct_count = 0usize;

    for &(actual, predicted) in &pairs {
        let error = (actual - predicted).abs();
        sum_squared += error * error;
        sum_abs += error;
        max_error = max_error.max(error);
        if actual != 0.0 {
            sum_pct += error / actual.abs();
            pct_count += 1;
        }
    }

    let n = pairs.len() as f64;
    let overall_error_rate = if pct_count == 0 {
        0.0
    } else {
        round_to(sum_pct / pct_count as f64 * 100.0, 1)
    };

    ErrorMetrics {
        rmse: (sum_squared / n).sqrt().round(),
        mae: (sum_abs / n).round(),
        max_error: max_error.round(),
        overall_error_rate,
    }
}

/// Y axis bounds over actual and primary forecast values, padded by 8% of the range.
///
/// Comparison values are ignored so the axis holds still while the comparison
/// vintage changes.
pub fn compute_y_domain(points: &[AlignedPoint]) -> (f64, f64) {
    let values = points
        .iter()
        .flat_map(|p| [p.actual, p.predicted])
        .flatten();

    let mut bounds: Option<(f64, f64)> = None;
    for v in values {
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(v), max.max(v)),
            None => (v, v),
        });
    }

    match bounds {
        Some((min, max)) => {
            let padding = (max - min) * Y_DOMAIN_PADDING;
            ((min - padding).floor(), (max + padding).ceil())
        }
        None => EMPTY_Y_DOMAIN,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

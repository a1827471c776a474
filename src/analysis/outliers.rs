//! Outlier classification against the primary forecast

/// Actual vs. primary forecast, any date
pub const ACTUAL_DEVIATION_THRESHOLD: f64 = 0.10;
/// Comparison vs. primary forecast on dates at or before the reference date
pub const COMPARISON_PAST_THRESHOLD: f64 = 0.10;
/// Comparison vs. primary forecast on dates after the reference date
pub const COMPARISON_FUTURE_THRESHOLD: f64 = 0.05;

/// Relative distance `|value - predicted| / predicted`.
///
/// Undefined for a zero forecast, which yields `None`.
pub fn deviation_ratio(value: f64, predicted: f64) -> Option<f64> {
    if predicted == 0.0 {
        return None;
    }
    Some((value - predicted).abs() / predicted)
}

/// Signed deviation in percent, `(value - predicted) / predicted * 100`
pub fn deviation_percent(value: Option<f64>, predicted: Option<f64>) -> Option<f64> {
    let (value, predicted) = (value?, predicted?);
    if predicted == 0.0 {
        return None;
    }
    Some((value - predicted) / predicted * 100.0)
}

pub struct OutlierClassifier;

impl OutlierClassifier {
    /// Actual deviates from the primary forecast by strictly more than 10%
    pub fn is_outlier(actual: Option<f64>, predicted: Option<f64>) -> bool {
        match (actual, predicted) {
            (Some(actual), Some(predicted)) => deviation_ratio(actual, predicted)
                .is_some_and(|ratio| ratio > ACTUAL_DEVIATION_THRESHOLD),
            _ => false,
        }
    }

    /// Comparison forecast diverges from the primary forecast.
    ///
    /// The bar is 5% for future dates and 10% otherwise, exclusive.
    pub fn is_comparison_outlier(
        comparison: Option<f64>,
        predicted: Option<f64>,
        is_future: bool,
    ) -> bool {
        let threshold = Self::comparison_threshold(is_future);
        match (comparison, predicted) {
            (Some(comparison), Some(predicted)) => {
                deviation_ratio(comparison, predicted).is_some_and(|ratio| ratio > threshold)
            }
            _ => false,
        }
    }

    pub fn comparison_threshold(is_future: bool) -> f64 {
        if is_future {
            COMPARISON_FUTURE_THRESHOLD
        } else {
            COMPARISON_PAST_THRESHOLD
        }
    }
}

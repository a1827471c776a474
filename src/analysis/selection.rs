//! Projection of a clicked chart point for the explanation layer

use chrono::NaiveDate;

use crate::analysis::outliers::deviation_percent;
use crate::models::chart::{AlignedPoint, SelectedPoint};

impl SelectedPoint {
    /// A point picked on the primary forecast line
    pub fn primary(point: &AlignedPoint) -> Self {
        Self {
            date: point.date,
            actual: point.actual,
            predicted: point.predicted,
            temperature: point.temperature,
            is_outlier: point.is_outlier,
            deviation_percent: deviation_percent(point.actual, point.predicted),
            comparison_predicted: None,
            comparison_deviation_percent: None,
            days_difference: None,
            is_comparison_point: false,
        }
    }

    /// A point picked on the comparison forecast line
    pub fn comparison(
        point: &AlignedPoint,
        primary_date: NaiveDate,
        comparison_date: NaiveDate,
    ) -> Self {
        Self {
            comparison_predicted: point.comparison_predicted,
            comparison_deviation_percent: deviation_percent(
                point.comparison_predicted,
                point.predicted,
            ),
            days_difference: Some((primary_date - comparison_date).num_days()),
            is_comparison_point: true,
            ..Self::primary(point)
        }
    }

    /// Whether the explanation layer has enough to work with
    pub fn is_explainable(&self) -> bool {
        if self.is_comparison_point {
            self.predicted.is_some() && self.comparison_predicted.is_some()
        } else {
            self.actual.is_some() && self.predicted.is_some()
        }
    }
}

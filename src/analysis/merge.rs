//! Alignment of actuals, forecasts and weather into one record per date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::analysis::aggregation::{Aggregator, DailyTotals};
use crate::analysis::metrics::{compute_error_metrics, compute_y_domain};
use crate::analysis::outliers::OutlierClassifier;
use crate::analysis::vintage::ForecastVintage;
use crate::models::chart::{AlignedPoint, ChartData};
use crate::models::readings::{ActualReading, ForecastReading, SourcedValue, WeatherObservation};
use crate::models::region::EnergySource;

/// Upper edge of the confidence envelope, as a multiple of the forecast
pub const CONFIDENCE_HIGH_FACTOR: f64 = 1.10;
/// Lower edge of the confidence envelope, as a multiple of the forecast
pub const CONFIDENCE_LOW_FACTOR: f64 = 0.90;

/// Parameters of a merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOptions {
    /// Energy sources summed into every series; empty means all
    pub sources: Vec<EnergySource>,
    pub primary: ForecastVintage,
    pub comparison: Option<ForecastVintage>,
    /// Last date with recorded actuals; later actual rows are dropped
    pub real_today: NaiveDate,
}

impl MergeOptions {
    pub fn pinned(primary_date: NaiveDate, real_today: NaiveDate) -> Self {
        Self {
            sources: Vec::new(),
            primary: ForecastVintage::Pinned(primary_date),
            comparison: None,
            real_today,
        }
    }

    pub fn latest(real_today: NaiveDate) -> Self {
        Self {
            sources: Vec::new(),
            primary: ForecastVintage::Latest,
            comparison: None,
            real_today,
        }
    }

    pub fn with_sources(mut self, sources: Vec<EnergySource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_comparison(mut self, comparison_date: NaiveDate) -> Self {
        self.comparison = Some(ForecastVintage::Pinned(comparison_date));
        self
    }

    /// Dates strictly after this one are future.
    ///
    /// A pinned primary vintage is its own reference; the latest-vintage mode
    /// splits at the last date with actuals.
    pub fn reference_date(&self) -> NaiveDate {
        self.primary.pinned_date().unwrap_or(self.real_today)
    }
}

pub struct Merger;

impl Merger {
    /// Merge the three series over the union of their dates, ascending.
    pub fn merge(
        actual: &[ActualReading],
        forecasts: &[ForecastReading],
        weather: &[WeatherObservation],
        options: &MergeOptions,
    ) -> Vec<AlignedPoint> {
        let sources = options.sources.as_slice();
        let reference = options.reference_date();

        let actual_by_date = Aggregator::aggregate_by_date(
            actual
                .iter()
                .filter(|a| a.date <= options.real_today)
                .map(SourcedValue::from),
            sources,
        );
        let primary_by_date = Self::forecast_totals(forecasts, &options.primary, sources);
        let comparison_by_date = options
            .comparison
            .as_ref()
            .map(|vintage| Self::forecast_totals(forecasts, vintage, sources));

        let mut weather_by_date: BTreeMap<NaiveDate, &WeatherObservation> = BTreeMap::new();
        for w in weather {
            weather_by_date.insert(w.date, w);
        }

        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
        dates.extend(actual_by_date.keys());
        dates.extend(primary_by_date.keys());
        if let Some(comparison) = &comparison_by_date {
            dates.extend(comparison.keys());
        }
        dates.extend(weather_by_date.keys());

        let mut points: Vec<AlignedPoint> = dates
            .into_iter()
            .map(|date| {
                let w = weather_by_date.get(&date);
                Self::build_point(
                    date,
                    reference,
                    actual_by_date.get(&date).copied(),
                    primary_by_date.get(&date).copied(),
                    comparison_by_date
                        .as_ref()
                        .and_then(|c| c.get(&date).copied()),
                    w.map(|w| w.temperature),
                    w.map(|w| w.humidity),
                    w.map(|w| w.wind_speed),
                )
            })
            .collect();

        Self::stitch_boundary(&mut points, reference);

        debug!(
            points = points.len(),
            reference = %reference,
            outliers = points.iter().filter(|p| p.is_outlier).count(),
            comparison_outliers = points.iter().filter(|p| p.comparison_outlier).count(),
            "Merged demand series"
        );

        points
    }

    /// Merge and summarise in one pass, for callers that want the full chart payload
    pub fn build_chart(
        actual: &[ActualReading],
        forecasts: &[ForecastReading],
        weather: &[WeatherObservation],
        options: &MergeOptions,
    ) -> ChartData {
        let points = Self::merge(actual, forecasts, weather, options);
        let metrics = compute_error_metrics(&points);
        let y_domain = compute_y_domain(&points);
        ChartData {
            points,
            metrics,
            y_domain,
        }
    }

    fn forecast_totals(
        forecasts: &[ForecastReading],
        vintage: &ForecastVintage,
        sources: &[EnergySource],
    ) -> DailyTotals {
        Aggregator::aggregate_by_date(
            vintage.select(forecasts).into_iter().map(SourcedValue::from),
            sources,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build_point(
        date: NaiveDate,
        reference: NaiveDate,
        actual: Option<f64>,
        predicted: Option<f64>,
        comparison: Option<f64>,
        temperature: Option<f64>,
        humidity: Option<f64>,
        wind_speed: Option<f64>,
    ) -> AlignedPoint {
        let is_future = date > reference;
        let past = |v: Option<f64>| if is_future { None } else { v };
        let future = |v: Option<f64>| if is_future { v } else { None };

        AlignedPoint {
            date,
            actual,
            predicted,
            predicted_past: past(predicted),
            predicted_future: future(predicted),
            confidence_high: predicted.map(|p| p * CONFIDENCE_HIGH_FACTOR),
            confidence_low: predicted.map(|p| p * CONFIDENCE_LOW_FACTOR),
            comparison_predicted: comparison,
            comparison_predicted_past: past(comparison),
            comparison_predicted_future: future(comparison),
            comparison_outlier: OutlierClassifier::is_comparison_outlier(
                comparison, predicted, is_future,
            ),
            is_outlier: OutlierClassifier::is_outlier(actual, predicted),
            is_future,
            temperature,
            temperature_past: past(temperature),
            temperature_future: future(temperature),
            humidity,
            humidity_past: past(humidity),
            humidity_future: future(humidity),
            wind_speed,
            wind_speed_past: past(wind_speed),
            wind_speed_future: future(wind_speed),
        }
    }

    /// Copy each series' value at the reference date into its future half too,
    /// so the past and future segments share an endpoint.
    fn stitch_boundary(points: &mut [AlignedPoint], reference: NaiveDate) {
        let Some(boundary) = points.iter_mut().find(|p| p.date == reference) else {
            return;
        };
        if boundary.predicted.is_some() {
            boundary.predicted_future = boundary.predicted;
        }
        if boundary.comparison_predicted.is_some() {
            boundary.comparison_predicted_future = boundary.comparison_predicted;
        }
        if boundary.temperature.is_some() {
            boundary.temperature_future = boundary.temperature;
        }
        if boundary.humidity.is_some() {
            boundary.humidity_future = boundary.humidity;
        }
        if boundary.wind_speed.is_some() {
            boundary.wind_speed_future = boundary.wind_speed;
        }
    }
}

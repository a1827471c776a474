//! Unit tests for the merger

use demandlens::analysis::merge::{MergeOptions, Merger};
use demandlens::analysis::vintage::ForecastVintage;
use demandlens::models::region::EnergySource;

use crate::fixtures::{actual, assert_close, date, forecast, weather};

const REAL_TODAY: &str = "2026-02-13";

#[test]
fn test_single_day_merge() {
    let actuals = vec![actual("2026-01-17", 100.0, EnergySource::Gas)];
    let forecasts = vec![forecast("2026-01-16", "2026-01-17", 90.0, EnergySource::Gas)];
    let options = MergeOptions::pinned(date("2026-01-16"), date(REAL_TODAY));

    let points = Merger::merge(&actuals, &forecasts, &[], &options);

    assert_eq!(points.len(), 1);
    let p = &points[0];
    assert_eq!(p.date, date("2026-01-17"));
    assert_eq!(p.actual, Some(100.0));
    assert_eq!(p.predicted, Some(90.0));
    assert_close(p.confidence_high.unwrap(), 99.0);
    assert_close(p.confidence_low.unwrap(), 81.0);
    assert!(p.is_outlier);
    assert!(p.is_future);
    assert_eq!(p.predicted_past, None);
    assert_eq!(p.predicted_future, Some(90.0));
    assert_eq!(p.comparison_predicted, None);
    assert!(!p.comparison_outlier);
    assert_eq!(p.temperature, None);
}

#[test]
fn test_empty_inputs_produce_no_points() {
    let options = MergeOptions::pinned(date("2026-02-13"), date(REAL_TODAY));
    assert!(Merger::merge(&[], &[], &[], &options).is_empty());
}

#[test]
fn test_dates_are_union_of_all_series_in_order() {
    let actuals = vec![actual("2026-01-18", 100.0, EnergySource::Gas)];
    let forecasts = vec![forecast("2026-02-13", "2026-02-15", 90.0, EnergySource::Gas)];
    let weathers = vec![
        weather("2026-02-20", 50.0, 10.0, 60.0),
        weather("2026-01-17", 40.0, 12.0, 55.0),
    ];
    let options = MergeOptions::pinned(date("2026-02-13"), date(REAL_TODAY));

    let points = Merger::merge(&actuals, &forecasts, &weathers, &options);
    let dates: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
    assert_eq!(dates, vec!["2026-01-17", "2026-01-18", "2026-02-15", "2026-02-20"]);
    assert_eq!(points[0].actual, None);
    assert_eq!(points[0].temperature, Some(40.0));
    assert_eq!(points[1].temperature, None);
}

#[test]
fn test_actuals_after_real_today_are_dropped() {
    let actuals = vec![
        actual("2026-02-13", 100.0, EnergySource::Gas),
        actual("2026-02-14", 100.0, EnergySource::Gas),
    ];
    let options = MergeOptions::pinned(date("2026-02-13"), date(REAL_TODAY));
    let points = Merger::merge(&actuals, &[], &[], &options);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].date, date("2026-02-13"));
}

#[test]
fn test_energy_source_filter_applies_to_every_series() {
    let actuals = vec![
        actual("2026-01-17", 100.0, EnergySource::Gas),
        actual("2026-01-17", 40.0, EnergySource::Wind),
    ];
    let forecasts = vec![
        forecast("2026-01-16", "2026-01-17", 90.0, EnergySource::Gas),
        forecast("2026-01-16", "2026-01-17", 50.0, EnergySource::Wind),
    ];
    let options = MergeOptions::pinned(date("2026-01-16"), date(REAL_TODAY))
        .with_sources(vec![EnergySource::Wind]);
    let points = Merger::merge(&actuals, &forecasts, &[], &options);
    assert_eq!(points[0].actual, Some(40.0));
    assert_eq!(points[0].predicted, Some(50.0));

    let all = MergeOptions::pinned(date("2026-01-16"), date(REAL_TODAY));
    let points = Merger::merge(&actuals, &forecasts, &[], &all);
    assert_eq!(points[0].actual, Some(140.0));
    assert_eq!(points[0].predicted, Some(140.0));
}

#[test]
fn test_past_future_split_around_primary_date() {
    let forecasts = vec![
        forecast("2026-02-10", "2026-02-09", 100.0, EnergySource::Gas),
        forecast("2026-02-10", "2026-02-10", 100.0, EnergySource::Gas),
        forecast("2026-02-10", "2026-02-11", 100.0, EnergySource::Gas),
    ];
    let weathers = vec![
        weather("2026-02-09", 40.0, 10.0, 50.0),
        weather("2026-02-11", 42.0, 11.0, 51.0),
    ];
    let options = MergeOptions::pinned(date("2026-02-10"), date(REAL_TODAY));
    let points = Merger::merge(&[], &forecasts, &weathers, &options);

    let before = &points[0];
    assert!(!before.is_future);
    assert_eq!(before.predicted_past, Some(100.0));
    assert_eq!(before.predicted_future, None);
    assert_eq!(before.temperature_past, Some(40.0));
    assert_eq!(before.temperature_future, None);

    let after = &points[2];
    assert!(after.is_future);
    assert_eq!(after.predicted_past, None);
    assert_eq!(after.predicted_future, Some(100.0));
    assert_eq!(after.humidity_past, None);
    assert_eq!(after.humidity_future, Some(51.0));
    assert_eq!(after.wind_speed_future, Some(11.0));
}

#[test]
fn test_boundary_point_is_stitched() {
    let forecasts = vec![
        forecast("2026-02-10", "2026-02-10", 1000.0, EnergySource::Gas),
        forecast("2026-02-05", "2026-02-10", 1020.0, EnergySource::Gas),
    ];
    let weathers = vec![weather("2026-02-10", 33.0, 14.0, 70.0)];
    let options = MergeOptions::pinned(date("2026-02-10"), date(REAL_TODAY))
        .with_comparison(date("2026-02-05"));

    let points = Merger::merge(&[], &forecasts, &weathers, &options);
    assert_eq!(points.len(), 1);
    let p = &points[0];
    assert!(!p.is_future);
    assert_eq!(p.predicted_past, Some(1000.0));
    assert_eq!(p.predicted_future, Some(1000.0));
    assert_eq!(p.comparison_predicted_past, Some(1020.0));
    assert_eq!(p.comparison_predicted_future, Some(1020.0));
    assert_eq!(p.temperature_past, Some(33.0));
    assert_eq!(p.temperature_future, Some(33.0));
    assert_eq!(p.humidity_future, Some(70.0));
    assert_eq!(p.wind_speed_future, Some(14.0));
}

#[test]
fn test_boundary_stitching_skips_missing_series() {
    let weathers = vec![weather("2026-02-10", 33.0, 14.0, 70.0)];
    let options = MergeOptions::pinned(date("2026-02-10"), date(REAL_TODAY));
    let points = Merger::merge(&[], &[], &weathers, &options);
    let p = &points[0];
    assert_eq!(p.predicted_future, None);
    assert_eq!(p.comparison_predicted_future, None);
    assert_eq!(p.temperature_future, Some(33.0));
}

#[test]
fn test_comparison_outlier_depends_on_side_of_primary_date() {
    let forecasts = vec![
        forecast("2026-02-10", "2026-02-08", 100.0, EnergySource::Gas),
        forecast("2026-02-03", "2026-02-08", 106.0, EnergySource::Gas),
        forecast("2026-02-10", "2026-02-12", 100.0, EnergySource::Gas),
        forecast("2026-02-03", "2026-02-12", 106.0, EnergySource::Gas),
    ];
    let options = MergeOptions::pinned(date("2026-02-10"), date(REAL_TODAY))
        .with_comparison(date("2026-02-03"));
    let points = Merger::merge(&[], &forecasts, &[], &options);

    assert_eq!(points.len(), 2);
    assert!(!points[0].is_future);
    assert!(!points[0].comparison_outlier, "6% in the past is within 10%");
    assert!(points[1].is_future);
    assert!(points[1].comparison_outlier, "6% in the future exceeds 5%");
}

#[test]
fn test_comparison_only_date_has_no_classification() {
    let forecasts = vec![forecast("2026-02-03", "2026-02-12", 500.0, EnergySource::Gas)];
    let options = MergeOptions::pinned(date("2026-02-10"), date(REAL_TODAY))
        .with_comparison(date("2026-02-03"));
    let points = Merger::merge(&[], &forecasts, &[], &options);
    assert_eq!(points[0].predicted, None);
    assert_eq!(points[0].comparison_predicted, Some(500.0));
    assert!(!points[0].comparison_outlier);
    assert_eq!(points[0].confidence_high, None);
}

#[test]
fn test_later_weather_row_wins() {
    let weathers = vec![
        weather("2026-01-17", 40.0, 10.0, 50.0),
        weather("2026-01-17", 45.0, 12.0, 55.0),
    ];
    let options = MergeOptions::pinned(date("2026-02-13"), date(REAL_TODAY));
    let points = Merger::merge(&[], &[], &weathers, &options);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].temperature, Some(45.0));
    assert_eq!(points[0].wind_speed, Some(12.0));
}

#[test]
fn test_latest_mode_splits_at_real_today() {
    let forecasts = vec![
        forecast("2026-02-11", "2026-02-12", 100.0, EnergySource::Gas),
        forecast("2026-02-01", "2026-02-12", 80.0, EnergySource::Gas),
        forecast("2026-02-13", "2026-02-14", 100.0, EnergySource::Gas),
    ];
    let options = MergeOptions::latest(date(REAL_TODAY));
    assert_eq!(options.reference_date(), date(REAL_TODAY));
    assert_eq!(options.primary, ForecastVintage::Latest);

    let points = Merger::merge(&[], &forecasts, &[], &options);
    assert_eq!(points[0].predicted, Some(100.0));
    assert!(!points[0].is_future);
    assert!(points[1].is_future);
}

#[test]
fn test_merge_is_idempotent() {
    let actuals = vec![
        actual("2026-01-17", 100.0, EnergySource::Gas),
        actual("2026-01-18", 120.0, EnergySource::Gas),
    ];
    let forecasts = vec![
        forecast("2026-01-17", "2026-01-17", 95.0, EnergySource::Gas),
        forecast("2026-01-17", "2026-01-18", 100.0, EnergySource::Gas),
        forecast("2026-01-10", "2026-01-18", 130.0, EnergySource::Gas),
    ];
    let weathers = vec![weather("2026-01-17", 30.0, 8.0, 80.0)];
    let options = MergeOptions::pinned(date("2026-01-17"), date(REAL_TODAY))
        .with_comparison(date("2026-01-10"));

    let first = Merger::merge(&actuals, &forecasts, &weathers, &options);
    let second = Merger::merge(&actuals, &forecasts, &weathers, &options);
    assert_eq!(first, second);
}

#[test]
fn test_build_chart_bundles_metrics() {
    let actuals = vec![
        actual("2026-01-17", 100.0, EnergySource::Gas),
        actual("2026-01-18", 200.0, EnergySource::Gas),
    ];
    let forecasts = vec![
        forecast("2026-01-16", "2026-01-17", 90.0, EnergySource::Gas),
        forecast("2026-01-16", "2026-01-18", 210.0, EnergySource::Gas),
    ];
    let options = MergeOptions::pinned(date("2026-01-16"), date(REAL_TODAY));
    let chart = Merger::build_chart(&actuals, &forecasts, &[], &options);

    assert_eq!(chart.points.len(), 2);
    assert_eq!(chart.metrics.rmse, 10.0);
    assert_eq!(chart.metrics.overall_error_rate, 7.5);
    assert!(chart.y_domain.0 < 90.0 && chart.y_domain.1 > 210.0);
}

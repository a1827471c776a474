//! Raw demand, forecast and weather rows as delivered by the data store

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::region::{EnergySource, Region};

/// One historical demand measurement for one energy source on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualReading {
    pub date: NaiveDate,
    pub region: Region,
    pub value: f64,
    pub unit_of_measure: String,
    pub source: String,
    pub energy_source: EnergySource,
}

/// A forecast for `predicted_date`, produced on `date_of_prediction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReading {
    pub date_of_prediction: NaiveDate,
    pub predicted_date: NaiveDate,
    pub region: Region,
    pub value: f64,
    pub unit_of_measure: String,
    pub energy_source: EnergySource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub region: Region,
    pub temperature: f64,
    pub wind_speed: f64,
    pub humidity: f64,
}

/// Inclusive date range used by store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A row that carries a date, a value and an energy source, ready for aggregation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcedValue {
    pub date: NaiveDate,
    pub value: f64,
    pub energy_source: EnergySource,
}

impl From<&ActualReading> for SourcedValue {
    fn from(reading: &ActualReading) -> Self {
        Self {
            date: reading.date,
            value: reading.value,
            energy_source: reading.energy_source,
        }
    }
}

impl From<&ForecastReading> for SourcedValue {
    /// Forecasts aggregate on the date they predict, not the date they were made
    fn from(reading: &ForecastReading) -> Self {
        Self {
            date: reading.predicted_date,
            value: reading.value,
            energy_source: reading.energy_source,
        }
    }
}

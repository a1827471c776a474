//! Forecast vintage selection strategies

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::readings::ForecastReading;
use crate::models::region::EnergySource;

/// Which forecast run ("vintage") feeds a forecast series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "date", rename_all = "camelCase")]
pub enum ForecastVintage {
    /// Only rows whose `date_of_prediction` equals the given date
    Pinned(NaiveDate),
    /// For every (predicted date, energy source) the most recent run available
    Latest,
}

impl ForecastVintage {
    /// Keep the forecast rows this strategy selects, in input order
    pub fn select<'a>(&self, forecasts: &'a [ForecastReading]) -> Vec<&'a ForecastReading> {
        match self {
            ForecastVintage::Pinned(vintage) => forecasts
                .iter()
                .filter(|f| f.date_of_prediction == *vintage)
                .collect(),
            ForecastVintage::Latest => {
                let mut newest: HashMap<(NaiveDate, EnergySource), NaiveDate> = HashMap::new();
                for f in forecasts {
                    let entry = newest
                        .entry((f.predicted_date, f.energy_source))
                        .or_insert(f.date_of_prediction);
                    if f.date_of_prediction > *entry {
                        *entry = f.date_of_prediction;
                    }
                }
                forecasts
                    .iter()
                    .filter(|f| {
                        newest.get(&(f.predicted_date, f.energy_source))
                            == Some(&f.date_of_prediction)
                    })
                    .collect()
            }
        }
    }

    pub fn pinned_date(&self) -> Option<NaiveDate> {
        match self {
            ForecastVintage::Pinned(date) => Some(*date),
            ForecastVintage::Latest => None,
        }
    }
}

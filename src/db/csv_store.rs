//! Flat-file store backed by the three dashboard CSV exports

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::db::error::StoreError;
use crate::db::store::{DemandStore, Snapshot};
use crate::models::readings::{ActualReading, DateRange, ForecastReading, WeatherObservation};
use crate::models::region::{EnergySource, Region};

pub const HISTORICAL_FILE: &str = "historical_demand.csv";
pub const FORECAST_FILE: &str = "forecasted_demand.csv";
pub const WEATHER_FILE: &str = "weather.csv";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HistoricalRow {
    date: NaiveDate,
    region: Region,
    value: f64,
    unit_of_measure: String,
    source: String,
    energy_source: EnergySource,
}

impl From<HistoricalRow> for ActualReading {
    fn from(row: HistoricalRow) -> Self {
        Self {
            date: row.date,
            region: row.region,
            value: row.value,
            unit_of_measure: row.unit_of_measure,
            source: row.source,
            energy_source: row.energy_source,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ForecastRow {
    date_of_prediction: NaiveDate,
    predicted_date: NaiveDate,
    region: Region,
    value: f64,
    unit_of_measure: String,
    energy_source: EnergySource,
}

impl From<ForecastRow> for ForecastReading {
    fn from(row: ForecastRow) -> Self {
        Self {
            date_of_prediction: row.date_of_prediction,
            predicted_date: row.predicted_date,
            region: row.region,
            value: row.value,
            unit_of_measure: row.unit_of_measure,
            energy_source: row.energy_source,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WeatherRow {
    date: NaiveDate,
    region: Region,
    temperature: f64,
    wind_speed: f64,
    humidity: f64,
}

impl From<WeatherRow> for WeatherObservation {
    fn from(row: WeatherRow) -> Self {
        Self {
            date: row.date,
            region: row.region,
            temperature: row.temperature,
            wind_speed: row.wind_speed,
            humidity: row.humidity,
        }
    }
}

/// Holds one parsed snapshot of the CSV directory.
///
/// The snapshot only changes through [`DemandStore::reload`], which swaps
/// it in whole after all three files parse.
pub struct CsvDemandStore {
    dir: PathBuf,
    snapshot: Arc<RwLock<Snapshot>>,
}

impl CsvDemandStore {
    /// Load all three files from `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let snapshot = Self::load(&dir).await?;
        Ok(Self {
            dir,
            snapshot: Arc::new(RwLock::new(snapshot)),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn load(dir: &Path) -> Result<Snapshot, StoreError> {
        let actual: Vec<HistoricalRow> = read_rows(&dir.join(HISTORICAL_FILE)).await?;
        let forecasts: Vec<ForecastRow> = read_rows(&dir.join(FORECAST_FILE)).await?;
        let weather: Vec<WeatherRow> = read_rows(&dir.join(WEATHER_FILE)).await?;

        info!(
            dir = %dir.display(),
            actual = actual.len(),
            forecasts = forecasts.len(),
            weather = weather.len(),
            "Loaded CSV demand store"
        );

        Ok(Snapshot {
            actual: actual.into_iter().map(Into::into).collect(),
            forecasts: forecasts.into_iter().map(Into::into).collect(),
            weather: weather.into_iter().map(Into::into).collect(),
        })
    }
}

async fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "Parsed CSV file");
    Ok(rows)
}

#[async_trait]
impl DemandStore for CsvDemandStore {
    async fn historical(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<ActualReading>, StoreError> {
        Ok(self.snapshot.read().await.historical(region, range))
    }

    async fn forecasts(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<ForecastReading>, StoreError> {
        Ok(self.snapshot.read().await.forecasts(region, range))
    }

    async fn weather(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<WeatherObservation>, StoreError> {
        Ok(self.snapshot.read().await.weather(region, range))
    }

    /// Re-read the directory. On error the previous snapshot stays in place.
    async fn reload(&self) -> Result<(), StoreError> {
        let fresh = Self::load(&self.dir).await?;
        *self.snapshot.write().await = fresh;
        info!(dir = %self.dir.display(), "Reloaded CSV demand store");
        Ok(())
    }
}

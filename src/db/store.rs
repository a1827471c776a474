//! Read-only access to demand, forecast and weather rows

use async_trait::async_trait;

use crate::db::error::StoreError;
use crate::models::readings::{ActualReading, DateRange, ForecastReading, WeatherObservation};
use crate::models::region::Region;

#[async_trait]
pub trait DemandStore: Send + Sync {
    /// Actual readings for `region` with `date` inside `range`
    async fn historical(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<ActualReading>, StoreError>;

    /// Forecast rows for `region` whose `predicted_date` is inside `range`, every vintage
    async fn forecasts(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<ForecastReading>, StoreError>;

    async fn weather(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<WeatherObservation>, StoreError>;

    /// Refresh from the backing source. Stores without one keep their rows.
    async fn reload(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Everything a store holds, already parsed
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub actual: Vec<ActualReading>,
    pub forecasts: Vec<ForecastReading>,
    pub weather: Vec<WeatherObservation>,
}

impl Snapshot {
    pub fn historical(&self, region: Region, range: DateRange) -> Vec<ActualReading> {
        self.actual
            .iter()
            .filter(|r| r.region == region && range.contains(r.date))
            .cloned()
            .collect()
    }

    pub fn forecasts(&self, region: Region, range: DateRange) -> Vec<ForecastReading> {
        self.forecasts
            .iter()
            .filter(|r| r.region == region && range.contains(r.predicted_date))
            .cloned()
            .collect()
    }

    pub fn weather(&self, region: Region, range: DateRange) -> Vec<WeatherObservation> {
        self.weather
            .iter()
            .filter(|r| r.region == region && range.contains(r.date))
            .cloned()
            .collect()
    }
}

/// Store over rows handed in at construction
pub struct InMemoryDemandStore {
    snapshot: Snapshot,
}

impl InMemoryDemandStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl DemandStore for InMemoryDemandStore {
    async fn historical(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<ActualReading>, StoreError> {
        Ok(self.snapshot.historical(region, range))
    }

    async fn forecasts(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<ForecastReading>, StoreError> {
        Ok(self.snapshot.forecasts(region, range))
    }

    async fn weather(
        &self,
        region: Region,
        range: DateRange,
    ) -> Result<Vec<WeatherObservation>, StoreError> {
        Ok(self.snapshot.weather(region, range))
    }
}

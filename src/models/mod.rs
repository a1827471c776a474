//! Shared data models spanning the store, analysis and HTTP layers.

pub mod chart;
pub mod readings;
pub mod region;

pub use chart::{AlignedPoint, ChartData, ErrorMetrics, SelectedPoint};
pub use readings::{ActualReading, DateRange, ForecastReading, SourcedValue, WeatherObservation};
pub use region::{EnergySource, Region};

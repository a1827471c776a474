//! Electricity demand vs. forecast dashboard backend.
//!
//! Aligns actual demand, forecast vintages and weather per date, flags
//! outliers, and serves the result over HTTP.

pub mod analysis;
pub mod config;
pub mod core;
pub mod db;
pub mod explain;
pub mod logging;
pub mod metrics;
pub mod models;

//! Data access for the demand dashboard

pub mod csv_store;
pub mod error;
pub mod store;

pub use csv_store::CsvDemandStore;
pub use error::StoreError;
pub use store::{DemandStore, InMemoryDemandStore, Snapshot};

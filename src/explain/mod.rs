//! Template explanations for outlier points

pub mod error;
pub mod format;
pub mod generator;

pub use error::ExplainError;
pub use generator::{generate_explanation, ExplainRequest};

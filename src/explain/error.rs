use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExplainError {
    #[error("forecast for {date} is zero, deviation is undefined")]
    ZeroForecast { date: NaiveDate },
}

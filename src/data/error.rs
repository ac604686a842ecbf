use chrono::NaiveDate;
use thiserror::Error;

/// The one failure the filter engine can report. Everything else that yields
/// no rows is a valid, empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

//! The module contains the errors the engine can return.
//!
//! Aggregation itself never fails: unknown currencies normalize with factor 1
//! and missing income counts as zero. Errors only come from the input
//! boundary, where user-typed values are turned into typed records:
//!
//! - [`InvalidAmount`] when an amount is empty, non-numeric or out of range.
//! - [`MissingField`] when a required form field is blank.
//! - [`UnsupportedCurrency`] when a currency code is not in the closed set.
//! - [`InvalidPeriod`] when a month or year cannot be understood.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`MissingField`]: EngineError::MissingField
//!  [`UnsupportedCurrency`]: EngineError::UnsupportedCurrency
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" is required")]
    MissingField(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("Invalid form: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

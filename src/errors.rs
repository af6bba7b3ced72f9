use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

/// Client input we refuse before touching the store.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("unknown meal slot `{0}`")]
    UnknownSlot(String),
    #[error("calorie goal must be a positive number")]
    InvalidGoal,
    #[error("weight must be greater than 0 and at most 500 kg")]
    InvalidWeight,
    #[error("`from` must not be after `to`")]
    InvertedRange,
    #[error("range must not exceed {0} days")]
    RangeTooLong(i64),
}

impl From<InputError> for (StatusCode, String) {
    fn from(e: InputError) -> Self {
        (StatusCode::BAD_REQUEST, e.to_string())
    }
}

pub fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
}

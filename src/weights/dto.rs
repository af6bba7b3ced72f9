use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::errors::InputError;

pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MAX_HISTORY_DAYS: i64 = 366;

/// Stored body of a `weights` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub kg: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPoint {
    #[serde(with = "crate::day::serde_day")]
    pub date: Date,
    pub kg: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct RecordWeightRequest {
    pub kg: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub from: String,
    pub to: String,
}

pub fn validate_kg(kg: f64) -> Result<f64, InputError> {
    if kg.is_finite() && kg > 0.0 && kg <= MAX_WEIGHT_KG {
        Ok(kg)
    } else {
        Err(InputError::InvalidWeight)
    }
}

pub fn validate_range(from: Date, to: Date) -> Result<(), InputError> {
    if from > to {
        return Err(InputError::InvertedRange);
    }
    if (to - from).whole_days() >= MAX_HISTORY_DAYS {
        return Err(InputError::RangeTooLong(MAX_HISTORY_DAYS));
    }
    Ok(())
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::errors::InputError;
use crate::scoring::coerce_number;

/// Calorie budget and SMP of one user's day.
///
/// Fields are private so that `remaining = max(0, base_goal - consumed)` holds
/// after every mutation; documents read back from the store are re-normalised.
///
/// Other clients write the same documents, so decoding never fails on a
/// field: numbers may arrive as text, the SMP as a float, the timestamp in
/// any shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoal {
    #[serde(default, deserialize_with = "lenient_amount")]
    base_goal: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    consumed: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    remaining: f64,
    #[serde(
        default,
        deserialize_with = "lenient_smp",
        skip_serializing_if = "Option::is_none"
    )]
    current_smp: Option<u8>,
    #[serde(
        serialize_with = "time::serde::rfc3339::serialize",
        deserialize_with = "lenient_timestamp",
        default = "OffsetDateTime::now_utc"
    )]
    updated_at: OffsetDateTime,
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coerce_number).unwrap_or(0.0))
}

fn lenient_smp<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(coerce_number)
        .map(|v| v.round().clamp(0.0, 100.0) as u8))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match raw {
        Some(Value::String(s)) => OffsetDateTime::parse(&s, &Rfc3339).ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(OffsetDateTime::now_utc))
}

impl DailyGoal {
    pub fn new(base_goal: f64) -> Self {
        let mut goal = Self {
            base_goal,
            consumed: 0.0,
            remaining: 0.0,
            current_smp: None,
            updated_at: OffsetDateTime::now_utc(),
        };
        goal.recompute();
        goal
    }

    /// Restores the invariant on a document that came from the store.
    pub(crate) fn normalized(mut self, default_goal: f64) -> Self {
        if !(self.base_goal.is_finite() && self.base_goal > 0.0) {
            self.base_goal = default_goal;
        }
        if !self.consumed.is_finite() || self.consumed < 0.0 {
            self.consumed = 0.0;
        }
        self.current_smp = self.current_smp.map(|s| s.min(100));
        self.recompute();
        self
    }

    pub fn base_goal(&self) -> f64 {
        self.base_goal
    }

    pub fn consumed(&self) -> f64 {
        self.consumed
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn current_smp(&self) -> Option<u8> {
        self.current_smp
    }

    pub fn set_base_goal(&mut self, base_goal: f64) -> Result<(), InputError> {
        let base_goal = validate_base_goal(base_goal)?;
        self.base_goal = base_goal;
        self.touch();
        Ok(())
    }

    pub fn set_consumed(&mut self, consumed: f64) {
        self.consumed = if consumed.is_finite() { consumed.max(0.0) } else { 0.0 };
        self.touch();
    }

    pub fn set_current_smp(&mut self, smp: u8) {
        self.current_smp = Some(smp.min(100));
        self.touch();
    }

    fn touch(&mut self) {
        self.recompute();
        self.updated_at = OffsetDateTime::now_utc();
    }

    fn recompute(&mut self) {
        self.remaining = (self.base_goal - self.consumed).max(0.0);
    }
}

pub fn validate_base_goal(base_goal: f64) -> Result<f64, InputError> {
    if base_goal.is_finite() && base_goal > 0.0 {
        Ok(base_goal)
    } else {
        Err(InputError::InvalidGoal)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetGoalRequest {
    pub base_goal: f64,
}

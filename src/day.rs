use time::{format_description::FormatItem, macros::format_description, Date};

use crate::errors::InputError;

const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_day(raw: &str) -> Result<Date, InputError> {
    Date::parse(raw.trim(), DAY_FORMAT).map_err(|_| InputError::InvalidDate(raw.to_string()))
}

/// `YYYY-MM-DD` on the wire, for `#[serde(with = "crate::day::serde_day")]`.
pub mod serde_day {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(day: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = day.format(super::DAY_FORMAT).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).map_err(de::Error::custom)
    }
}

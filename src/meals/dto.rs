use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use time::Date;
use tracing::warn;

use crate::errors::InputError;
use crate::goals::DailyGoal;
use crate::scoring::{FoodItem, MealScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" => Ok(MealSlot::Snack),
            _ => Err(InputError::UnknownSlot(s.to_string())),
        }
    }
}

/// Everything logged for one day, keyed by slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DayMeals {
    pub slots: BTreeMap<MealSlot, Vec<FoodItem>>,
}

/// Keys are matched like path slots (`"Lunch"` is lunch). Unknown keys and
/// slots that are not lists are skipped, so one bad key from another client
/// does not hide the rest of the day. An exact lowercase key wins over a
/// differently cased one.
impl<'de> Deserialize<'de> for DayMeals {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut slots = BTreeMap::new();

        for (key, value) in raw {
            let Ok(slot) = key.parse::<MealSlot>() else {
                warn!(%key, "skipping unknown meal slot");
                continue;
            };
            let items: Vec<FoodItem> = match serde_json::from_value(value) {
                Ok(items) => items,
                Err(err) => {
                    warn!(%key, error = %err, "skipping unreadable meal slot");
                    continue;
                }
            };
            if key == slot.as_str() {
                slots.insert(slot, items);
            } else {
                slots.entry(slot).or_insert(items);
            }
        }

        Ok(Self { slots })
    }
}

impl DayMeals {
    pub fn total_kcal(&self) -> f64 {
        self.slots.values().flatten().map(|i| i.kcal).sum()
    }
}

/// Fresh score for display; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DayEstimate {
    pub score: u8,
    pub consumed_kcal: f64,
    pub per_slot: BTreeMap<MealSlot, MealScore>,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    #[serde(with = "crate::day::serde_day")]
    pub date: Date,
    pub meals: DayMeals,
    pub goal: DailyGoal,
    pub estimate: DayEstimate,
}

#[derive(Debug, Deserialize)]
pub struct SaveSlotRequest {
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slot_parsing_is_case_insensitive_and_strict() {
        assert_eq!("Lunch".parse::<MealSlot>().unwrap(), MealSlot::Lunch);
        assert_eq!(" snack ".parse::<MealSlot>().unwrap(), MealSlot::Snack);
        assert_eq!(
            "brunch".parse::<MealSlot>().unwrap_err(),
            InputError::UnknownSlot("brunch".into())
        );
    }

    #[test]
    fn day_meals_round_trip_through_documents() {
        let doc = json!({
            "breakfast": [{"kcal": "300", "carbs_g": 40}],
            "dinner": []
        });
        let day: DayMeals = serde_json::from_value(doc).unwrap();
        assert_eq!(day.slots.len(), 2);
        assert_eq!(day.total_kcal(), 300.0);
        assert_eq!(day.slots[&MealSlot::Breakfast][0].carbs_g, 40.0);
    }

    #[test]
    fn unknown_and_unreadable_slots_are_skipped() {
        let doc = json!({
            "brunch": [{"kcal": 900}],
            "lunch": "soup",
            "dinner": [{"kcal": 500}]
        });
        let day: DayMeals = serde_json::from_value(doc).unwrap();
        assert_eq!(day.slots.len(), 1);
        assert_eq!(day.total_kcal(), 500.0);
    }

    #[test]
    fn differently_cased_keys_map_to_slots() {
        let day: DayMeals = serde_json::from_value(json!({"Lunch": [{"kcal": 300}]})).unwrap();
        assert_eq!(day.slots[&MealSlot::Lunch][0].kcal, 300.0);

        let both: DayMeals = serde_json::from_value(json!({
            "Lunch": [{"kcal": 300}],
            "lunch": [{"kcal": 450}]
        }))
        .unwrap();
        assert_eq!(both.slots.len(), 1);
        assert_eq!(both.total_kcal(), 450.0);
    }
}

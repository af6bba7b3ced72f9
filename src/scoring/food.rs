use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Glycemic index assumed for items that carry none (or a non-positive one).
pub const DEFAULT_IG: f64 = 55.0;

/// One logged food, as it arrives from clients or from the food-recognition
/// service. Every numeric field is coerced on the way in: numbers, numeric
/// strings (`"12,5"`, `"12 g"`), `null` and missing keys are all accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub grams: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbs_g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub protein_g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fiber_g: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kcal: f64,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub ig: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub gl: f64,
}

impl FoodItem {
    /// The item's glycemic index, or [`DEFAULT_IG`] when absent or `<= 0`.
    pub fn effective_ig(&self) -> f64 {
        match self.ig {
            Some(ig) if ig > 0.0 => ig,
            _ => DEFAULT_IG,
        }
    }
}

/// Extracts a finite number from an arbitrary JSON value.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_text(s),
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// Reads the leading number of a free-text quantity such as `"12,5 g"`.
pub fn parse_numeric_text(raw: &str) -> Option<f64> {
    lazy_static! {
        static ref LEADING_NUMBER: Regex =
            Regex::new(r"^\s*([-+]?\d+(?:[.,]\d+)?)").expect("leading number regex");
    }
    let caps = LEADING_NUMBER.captures(raw)?;
    caps[1].replace(',', ".").parse::<f64>().ok()
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_f64(deserializer)?.unwrap_or(0.0))
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(coerce_number).map(|v| v.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        let item: FoodItem = serde_json::from_value(json!({
            "carbs_g": 30,
            "protein_g": "12.5",
            "fiber_g": "4,5 g",
            "kcal": " 320kcal",
            "ig": "70",
            "gl": 14.2
        }))
        .unwrap();

        assert_eq!(item.carbs_g, 30.0);
        assert_eq!(item.protein_g, 12.5);
        assert_eq!(item.fiber_g, 4.5);
        assert_eq!(item.kcal, 320.0);
        assert_eq!(item.ig, Some(70.0));
        assert_eq!(item.gl, 14.2);
    }

    #[test]
    fn missing_and_garbage_fields_default_to_zero() {
        let item: FoodItem = serde_json::from_value(json!({
            "name": "mystery",
            "carbs_g": null,
            "protein_g": "lots",
            "fiber_g": true,
            "kcal": [1, 2]
        }))
        .unwrap();

        assert_eq!(item.carbs_g, 0.0);
        assert_eq!(item.protein_g, 0.0);
        assert_eq!(item.fiber_g, 0.0);
        assert_eq!(item.kcal, 0.0);
        assert_eq!(item.gl, 0.0);
        assert_eq!(item.ig, None);
        assert_eq!(item.name.as_deref(), Some("mystery"));
    }

    #[test]
    fn negative_quantities_are_floored_at_zero() {
        let item: FoodItem = serde_json::from_value(json!({
            "grams": -20,
            "carbs_g": -5,
            "kcal": "-399",
            "protein_g": "-1,5 g",
            "ig": "-40"
        }))
        .unwrap();

        assert_eq!(item.grams, Some(0.0));
        assert_eq!(item.carbs_g, 0.0);
        assert_eq!(item.kcal, 0.0);
        assert_eq!(item.protein_g, 0.0);
        assert_eq!(item.effective_ig(), DEFAULT_IG);
    }

    #[test]
    fn effective_ig_falls_back_for_absent_or_non_positive() {
        let mut item = FoodItem::default();
        assert_eq!(item.effective_ig(), DEFAULT_IG);
        item.ig = Some(0.0);
        assert_eq!(item.effective_ig(), DEFAULT_IG);
        item.ig = Some(-3.0);
        assert_eq!(item.effective_ig(), DEFAULT_IG);
        item.ig = Some(42.0);
        assert_eq!(item.effective_ig(), 42.0);
    }

    #[test]
    fn parse_numeric_text_edge_cases() {
        assert_eq!(parse_numeric_text("  -2.25 units"), Some(-2.25));
        assert_eq!(parse_numeric_text("+8"), Some(8.0));
        assert_eq!(parse_numeric_text("about 8"), None);
        assert_eq!(parse_numeric_text(""), None);
    }
}

//! SMP scoring: food items → meal metrics → meal score → calorie-weighted day score.
//!
//! Everything here is pure and synchronous. The diary, the goal writer and the
//! survey all call into this module instead of carrying their own formula.

mod daily;
mod food;
pub mod handlers;
mod meal;
mod metrics;

pub use daily::daily_score;
pub use food::FoodItem;
pub use meal::{score_items, score_meal, MealScore};
pub use metrics::{aggregate, MealMetrics};

pub(crate) use food::coerce_number;
pub(crate) use meal::clamp_score;

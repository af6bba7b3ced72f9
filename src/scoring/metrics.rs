use serde::Serialize;

use super::food::{FoodItem, DEFAULT_IG};

/// Per-meal totals. Recomputed on every scoring call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealMetrics {
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fiber_g: f64,
    pub kcal: f64,
    pub gl_total: f64,
    /// Carbohydrate-weighted mean glycemic index of the plate.
    pub ig_plate: f64,
}

pub fn aggregate<'a, I>(items: I) -> MealMetrics
where
    I: IntoIterator<Item = &'a FoodItem>,
{
    let mut carbs = 0.0;
    let mut protein = 0.0;
    let mut fiber = 0.0;
    let mut kcal = 0.0;
    let mut gl = 0.0;
    let mut ig_carbs = 0.0;

    for item in items {
        carbs += item.carbs_g;
        protein += item.protein_g;
        fiber += item.fiber_g;
        kcal += item.kcal;
        gl += item.gl;
        ig_carbs += item.effective_ig() * item.carbs_g;
    }

    let ig_plate = if carbs == 0.0 { DEFAULT_IG } else { ig_carbs / carbs };

    MealMetrics {
        carbs_g: carbs,
        protein_g: protein,
        fiber_g: fiber,
        kcal,
        gl_total: gl,
        ig_plate,
    }
}

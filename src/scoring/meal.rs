use serde::Serialize;

use super::food::FoodItem;
use super::metrics::{aggregate, MealMetrics};

const GL_WEIGHT: f64 = 1.5;
const IG_WEIGHT: f64 = 0.5;
const FIBER_CAP_G: f64 = 10.0;
const FIBER_MAX_BONUS: f64 = 10.0;
const PROTEIN_CAP_G: f64 = 25.0;
const PROTEIN_MAX_BONUS: f64 = 10.0;
const KCAL_SOFT_CAP: f64 = 650.0;
const KCAL_STEP: f64 = 50.0;
const KCAL_POINTS_PER_STEP: f64 = 1.0;
const KCAL_MAX_PENALTY: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealScore {
    pub score: u8,
    /// Human-readable contributions, e.g. `"+6 fiber"`. Informational only.
    pub reasons: Vec<String>,
}

pub fn score_meal(m: &MealMetrics) -> MealScore {
    let gl_penalty = m.gl_total * GL_WEIGHT;
    let ig_penalty = m.ig_plate * IG_WEIGHT;
    let fiber_bonus = m.fiber_g.min(FIBER_CAP_G) / FIBER_CAP_G * FIBER_MAX_BONUS;
    let protein_bonus = m.protein_g.min(PROTEIN_CAP_G) / PROTEIN_CAP_G * PROTEIN_MAX_BONUS;
    let kcal_penalty = if m.kcal <= KCAL_SOFT_CAP {
        0.0
    } else {
        (((m.kcal - KCAL_SOFT_CAP) / KCAL_STEP) * KCAL_POINTS_PER_STEP).min(KCAL_MAX_PENALTY)
    };

    let raw = 100.0 - gl_penalty - ig_penalty + fiber_bonus + protein_bonus - kcal_penalty;

    let mut reasons = Vec::new();
    push_reason(&mut reasons, -gl_penalty, "GL");
    push_reason(&mut reasons, -ig_penalty, "IG");
    push_reason(&mut reasons, fiber_bonus, "fiber");
    push_reason(&mut reasons, protein_bonus, "protein");
    push_reason(&mut reasons, -kcal_penalty, "kcal");

    MealScore {
        score: clamp_score(raw),
        reasons,
    }
}

pub fn score_items<'a, I>(items: I) -> MealScore
where
    I: IntoIterator<Item = &'a FoodItem>,
{
    score_meal(&aggregate(items))
}

/// Clamps into `[0, 100]` and truncates. NaN maps to 0.
pub(crate) fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0) as u8
}

fn push_reason(reasons: &mut Vec<String>, signed: f64, label: &str) {
    if signed.abs() < 1.0 {
        return;
    }
    let sign = if signed > 0.0 { '+' } else { '-' };
    reasons.push(format!("{sign}{:.0} {label}", signed.abs()));
}

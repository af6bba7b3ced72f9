use super::food::FoodItem;
use super::meal::score_meal;
use super::metrics::aggregate;

/// Score of a day with nothing logged.
pub const EMPTY_DAY_SCORE: u8 = 100;

/// Calorie-weighted mean of the per-meal scores.
///
/// Empty slots are skipped. A meal whose items sum to zero (or fewer) kcal
/// carries no weight, so a day made only of such meals scores [`EMPTY_DAY_SCORE`].
pub fn daily_score<I, M>(meals: I) -> u8
where
    I: IntoIterator<Item = M>,
    M: AsRef<[FoodItem]>,
{
    let mut weighted = 0.0;
    let mut total_kcal = 0.0;

    for meal in meals {
        let items = meal.as_ref();
        if items.is_empty() {
            continue;
        }
        let metrics = aggregate(items);
        let kcal = metrics.kcal.max(0.0);
        if kcal == 0.0 {
            continue;
        }
        let score = score_meal(&metrics).score as f64;
        weighted += score * kcal;
        total_kcal += kcal;
    }

    if total_kcal > 0.0 {
        (weighted / total_kcal).round().clamp(0.0, 100.0) as u8
    } else {
        EMPTY_DAY_SCORE
    }
}

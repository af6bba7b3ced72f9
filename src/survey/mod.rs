//! Post-meal symptom survey. Each answer nudges the day's SMP by a fixed delta
//! (between -12 and +6); the sum is applied to a freshly computed baseline and
//! clamped once, at the end.

pub mod handlers;

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::scoring::clamp_score;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::survey_routes()
}

macro_rules! answers {
    ($name:ident { $($variant:ident => ($wire:literal, $delta:expr)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[cfg(test)]
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn delta(self) -> i32 {
                match self {
                    $($name::$variant => $delta),+
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }
    };
}

answers!(Energy {
    Energized => ("energized", 6),
    Steady => ("steady", 3),
    Tired => ("tired", -6),
    Crashed => ("crashed", -12),
});

answers!(Satiety {
    Full => ("full", 4),
    Satisfied => ("satisfied", 2),
    Hungry => ("hungry", -6),
    Starving => ("starving", -10),
});

answers!(Digestion {
    Comfortable => ("comfortable", 2),
    Bloated => ("bloated", -6),
    Heartburn => ("heartburn", -8),
});

answers!(Cravings {
    None => ("none", 2),
    Mild => ("mild", -3),
    Strong => ("strong", -8),
});

/// Every question is optional; unanswered ones contribute nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyAnswers {
    pub energy: Option<Energy>,
    pub satiety: Option<Satiety>,
    pub digestion: Option<Digestion>,
    pub cravings: Option<Cravings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDelta {
    pub question: &'static str,
    pub answer: &'static str,
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyOutcome {
    pub baseline: u8,
    pub adjusted: u8,
    pub applied: Vec<AppliedDelta>,
}

pub fn apply(baseline: u8, answers: &SurveyAnswers) -> SurveyOutcome {
    let mut applied = Vec::new();
    let mut record = |question: &'static str, answer: &'static str, delta: i32| {
        applied.push(AppliedDelta {
            question,
            answer,
            delta,
        })
    };

    if let Some(a) = answers.energy {
        record("energy", a.as_str(), a.delta());
    }
    if let Some(a) = answers.satiety {
        record("satiety", a.as_str(), a.delta());
    }
    if let Some(a) = answers.digestion {
        record("digestion", a.as_str(), a.delta());
    }
    if let Some(a) = answers.cravings {
        record("cravings", a.as_str(), a.delta());
    }

    let total: i32 = applied.iter().map(|d| d.delta).sum();
    SurveyOutcome {
        baseline,
        adjusted: clamp_score(baseline as f64 + total as f64),
        applied,
    }
}

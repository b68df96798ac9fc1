//! # Score Breakdown
//! The explainable output of one scoring call: six named sub-scores plus the
//! weighted total. Immutable once produced — a new computation produces a new
//! breakdown, never an in-place update.

use serde::{Deserialize, Serialize, Serializer};

/// Six factor scores (each in `[0, 100]`) and their weighted sum.
///
/// Internal math keeps full precision; serialization rounds every field to
/// two decimal places for display/persistence collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(serialize_with = "round2")]
    pub demand_strength: f64,
    #[serde(serialize_with = "round2")]
    pub demand_velocity: f64,
    #[serde(serialize_with = "round2")]
    pub competition_proxy: f64,
    #[serde(serialize_with = "round2")]
    pub feasibility: f64,
    #[serde(serialize_with = "round2")]
    pub automation_friendly: f64,
    #[serde(serialize_with = "round2")]
    pub monetization_clarity: f64,
    #[serde(serialize_with = "round2")]
    pub total: f64,
}

pub(crate) fn round2<S: Serializer>(x: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((x * 100.0).round() / 100.0)
}

impl ScoreBreakdown {
    /// Factor scores as `(name, value)` pairs, in weight-table order.
    /// Handy for explainability output and for generic assertions in tests.
    pub fn factors(&self) -> [(&'static str, f64); 6] {
        [
            ("demand_strength", self.demand_strength),
            ("demand_velocity", self.demand_velocity),
            ("competition_proxy", self.competition_proxy),
            ("feasibility", self.feasibility),
            ("automation_friendly", self.automation_friendly),
            ("monetization_clarity", self.monetization_clarity),
        ]
    }
}

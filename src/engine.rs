//! # Scoring Engine
//! Pure, testable logic that maps `(idea, signals)` → `ScoreBreakdown`.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Each factor function is pure and total: identical inputs always yield
//! identical outputs, and sparse input (no signals, no qualitative fields)
//! produces a well-defined neutral/base score rather than an error.

use chrono::{NaiveDate, Utc};
use tracing::warn;

use crate::breakdown::ScoreBreakdown;
use crate::idea::{Idea, OpsBurden};
use crate::signal::{MetricClass, Signal};
use crate::weights::{WeightError, WeightTable};

/// Thresholds and scale constants used by the factor functions.
///
/// The defaults are inherited from the first cut of the scoring model and
/// have no stated empirical basis — treat them as tunable, not correct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringTunables {
    /// Multiplier in `min(100, log_scale * ln(1 + mean))` for demand strength.
    pub log_scale: f64,
    /// Launch-indicator signals above this count mark a saturated market.
    pub launch_saturation_count: usize,
    /// Demand strength above this reads as moderate competition.
    pub high_demand_cutoff: f64,
    /// Demand strength below this reads as an underserved market.
    pub low_demand_cutoff: f64,
    /// Window for the velocity recency fallback.
    pub recency_window_days: i64,
}

impl Default for ScoringTunables {
    fn default() -> Self {
        Self {
            log_scale: 10.0,
            launch_saturation_count: 5,
            high_demand_cutoff: 80.0,
            low_demand_cutoff: 30.0,
            recency_window_days: 7,
        }
    }
}

fn clamp100(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

/// Volume of demand evidence, log-scaled to `[0, 100]`.
///
/// The log transform keeps sources whose raw magnitudes differ by orders of
/// magnitude (view counts vs. post counts) from dominating additively,
/// without per-source calibration tables.
///
/// Empty signal set → 0.0 (no evidence). Signals present but none
/// volume-class → 50.0 (no evidence ≠ no demand).
pub fn demand_strength(signals: &[Signal], tunables: &ScoringTunables) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }
    let volumes: Vec<f64> = signals
        .iter()
        .filter(|s| s.metric_type.class() == MetricClass::Volume)
        .map(|s| s.value)
        .collect();
    if volumes.is_empty() {
        return 50.0;
    }
    let mean = volumes.iter().sum::<f64>() / volumes.len() as f64;
    (tunables.log_scale * (1.0 + mean).ln()).min(100.0)
}

/// Growth trend mapped to `[0, 100]`: zero growth sits at neutral 50 and
/// ±100% growth saturates the extremes.
///
/// Without growth metrics, falls back to a binary recency check: any signal
/// dated within the recency window of `today` is a weak positive (70.0),
/// otherwise neutral (50.0). `today` is a parameter so the function stays
/// pure; the engine passes the current date.
pub fn demand_velocity(signals: &[Signal], today: NaiveDate, tunables: &ScoringTunables) -> f64 {
    if signals.is_empty() {
        return 50.0;
    }
    let growth: Vec<f64> = signals
        .iter()
        .filter(|s| s.metric_type.class() == MetricClass::Growth)
        .map(|s| s.value)
        .collect();
    if !growth.is_empty() {
        let avg = growth.iter().sum::<f64>() / growth.len() as f64;
        return clamp100(50.0 + avg / 2.0);
    }
    let recent = signals
        .iter()
        .any(|s| (today - s.data_date).num_days() <= tunables.recency_window_days);
    if recent {
        70.0
    } else {
        50.0
    }
}

/// Market saturation, inverted: low competition ⇒ high score.
///
/// Priority order: many launch-indicator signals ⇒ saturated (30); very high
/// demand volume ⇒ moderate (50); very low volume ⇒ potentially underserved
/// (80); otherwise 65.
pub fn competition_proxy(signals: &[Signal], tunables: &ScoringTunables) -> f64 {
    let volume = demand_strength(signals, tunables);
    let launches = signals
        .iter()
        .filter(|s| s.source.is_launch_indicator())
        .count();

    if launches > tunables.launch_saturation_count {
        30.0
    } else if volume > tunables.high_demand_cutoff {
        50.0
    } else if volume < tunables.low_demand_cutoff {
        80.0
    } else {
        65.0
    }
}

/// Build feasibility from ops burden, with a bonus for a named distribution
/// channel and a penalty for declared compliance risks.
pub fn feasibility(idea: &Idea) -> f64 {
    let base = match idea.ops_burden {
        Some(OpsBurden::Low) => 85.0,
        Some(OpsBurden::Medium) | None => 65.0,
        Some(OpsBurden::High) => 40.0,
    };
    let mut score = base;
    if idea.distribution_channel.is_some() {
        score += 10.0;
    }
    if idea.compliance_risks.is_some() {
        score -= 15.0;
    }
    clamp100(score)
}

/// Automation potential: a pure lookup on ops burden, nothing else.
pub fn automation_friendly(idea: &Idea) -> f64 {
    match idea.ops_burden {
        Some(OpsBurden::Low) => 90.0,
        Some(OpsBurden::Medium) | None => 60.0,
        Some(OpsBurden::High) => 30.0,
    }
}

/// How clearly the idea can be charged for: base 50, +20 pricing model,
/// +15 target user, +15 value prop, capped at 100.
pub fn monetization_clarity(idea: &Idea) -> f64 {
    let mut score: f64 = 50.0;
    if idea.pricing_model.is_some() {
        score += 20.0;
    }
    if idea.target_user.is_some() {
        score += 15.0;
    }
    if idea.value_prop.is_some() {
        score += 15.0;
    }
    score.min(100.0)
}

/// Combines the factor functions with a normalized weight table.
///
/// Immutable after construction: runtime weight updates build a *new* engine
/// and swap it in, so an in-flight `score()` call always sees one consistent
/// weight set.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringEngine {
    weights: WeightTable,
    tunables: ScoringTunables,
}

impl ScoringEngine {
    /// Build an engine from a (possibly unnormalized) weight table.
    /// Normalization happens here; zero/negative tables are refused.
    pub fn new(weights: WeightTable) -> Result<Self, WeightError> {
        Self::with_tunables(weights, ScoringTunables::default())
    }

    pub fn with_tunables(
        weights: WeightTable,
        tunables: ScoringTunables,
    ) -> Result<Self, WeightError> {
        Ok(Self {
            weights: weights.normalized()?,
            tunables,
        })
    }

    /// Engine from the weight config file, falling back to defaults if the
    /// loaded table is unusable. Never fails: bad configuration at boot is a
    /// warning, not a crash.
    pub fn from_env() -> Self {
        let loaded = WeightTable::load_from_env();
        match Self::new(loaded) {
            Ok(engine) => engine,
            Err(e) => {
                warn!(error = %e, "invalid weight table in config; using defaults");
                Self::new(WeightTable::default()).expect("default weights are valid")
            }
        }
    }

    /// The post-normalization weights this engine scores with.
    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn tunables(&self) -> &ScoringTunables {
        &self.tunables
    }

    /// Score one idea against the full signal set collected for its topic.
    /// Uses today's date for the velocity recency fallback.
    pub fn score(&self, idea: &Idea, signals: &[Signal]) -> ScoreBreakdown {
        self.score_at(idea, signals, Utc::now().date_naive())
    }

    /// Deterministic variant with an explicit "today"; `score` delegates here.
    pub fn score_at(&self, idea: &Idea, signals: &[Signal], today: NaiveDate) -> ScoreBreakdown {
        let demand_strength = demand_strength(signals, &self.tunables);
        let demand_velocity = demand_velocity(signals, today, &self.tunables);
        let competition_proxy = competition_proxy(signals, &self.tunables);
        let feasibility = feasibility(idea);
        let automation_friendly = automation_friendly(idea);
        let monetization_clarity = monetization_clarity(idea);

        let w = &self.weights;
        let total = demand_strength * w.demand_strength
            + demand_velocity * w.demand_velocity
            + competition_proxy * w.competition_proxy
            + feasibility * w.feasibility
            + automation_friendly * w.automation_friendly
            + monetization_clarity * w.monetization_clarity;

        ScoreBreakdown {
            demand_strength,
            demand_velocity,
            competition_proxy,
            feasibility,
            automation_friendly,
            monetization_clarity,
            total,
        }
    }
}

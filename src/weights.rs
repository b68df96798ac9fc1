//! # Weight Table
//! Configurable mapping from the six score factors to their weights.
//!
//! - Loads from TOML (`config/weights.toml`, overridable via
//!   `WEIGHTS_CONFIG_PATH`); any load failure falls back to the documented
//!   defaults with a warning, never a hard error.
//! - Missing keys take the per-factor default; unknown keys are ignored.
//! - Tables whose sum drifts from 1.0 are normalized proportionally (and the
//!   correction is observable through the engine's weights accessor).
//! - A zero or negative table is a caller configuration fault and is refused
//!   with a typed error rather than silently divided by zero.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_WEIGHTS_CONFIG_PATH: &str = "config/weights.toml";
pub const ENV_WEIGHTS_CONFIG_PATH: &str = "WEIGHTS_CONFIG_PATH";

/// Tolerance for "sums to 1.0" checks.
pub const SUM_TOLERANCE: f64 = 1e-3;

/// Invalid weight configuration supplied by the caller.
#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("weight table sums to {sum}; cannot normalize")]
    NonPositiveSum { sum: f64 },
    #[error("weight for '{factor}' is negative ({value})")]
    NegativeWeight { factor: &'static str, value: f64 },
}

/// Weights for the six score factors. Field defaults are the documented
/// fallback table; `Default` yields a table that already sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    #[serde(default = "d_demand_strength")]
    pub demand_strength: f64,
    #[serde(default = "d_demand_velocity")]
    pub demand_velocity: f64,
    #[serde(default = "d_competition_proxy")]
    pub competition_proxy: f64,
    #[serde(default = "d_feasibility")]
    pub feasibility: f64,
    #[serde(default = "d_automation_friendly")]
    pub automation_friendly: f64,
    #[serde(default = "d_monetization_clarity")]
    pub monetization_clarity: f64,
}

fn d_demand_strength() -> f64 {
    0.25
}
fn d_demand_velocity() -> f64 {
    0.20
}
fn d_competition_proxy() -> f64 {
    0.15
}
fn d_feasibility() -> f64 {
    0.20
}
fn d_automation_friendly() -> f64 {
    0.10
}
fn d_monetization_clarity() -> f64 {
    0.10
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            demand_strength: d_demand_strength(),
            demand_velocity: d_demand_velocity(),
            competition_proxy: d_competition_proxy(),
            feasibility: d_feasibility(),
            automation_friendly: d_automation_friendly(),
            monetization_clarity: d_monetization_clarity(),
        }
    }
}

/// TOML file shape: a single `[weights]` table. Extra sections are ignored.
#[derive(Debug, Deserialize)]
struct WeightsFile {
    #[serde(default)]
    weights: Option<WeightTable>,
}

impl WeightTable {
    pub fn sum(&self) -> f64 {
        self.demand_strength
            + self.demand_velocity
            + self.competition_proxy
            + self.feasibility
            + self.automation_friendly
            + self.monetization_clarity
    }

    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("demand_strength", self.demand_strength),
            ("demand_velocity", self.demand_velocity),
            ("competition_proxy", self.competition_proxy),
            ("feasibility", self.feasibility),
            ("automation_friendly", self.automation_friendly),
            ("monetization_clarity", self.monetization_clarity),
        ]
    }

    /// Proportional normalization so the table sums to 1.0.
    ///
    /// Idempotent: normalizing an already-normalized table changes nothing
    /// beyond floating tolerance. Refuses negative weights and non-positive
    /// sums — those are configuration faults, not things to paper over.
    pub fn normalized(&self) -> Result<WeightTable, WeightError> {
        for (factor, value) in self.entries() {
            if value < 0.0 {
                return Err(WeightError::NegativeWeight { factor, value });
            }
        }
        let sum = self.sum();
        if sum <= 0.0 {
            return Err(WeightError::NonPositiveSum { sum });
        }
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            warn!(sum, "weight table does not sum to 1.0; normalizing");
        }
        Ok(WeightTable {
            demand_strength: self.demand_strength / sum,
            demand_velocity: self.demand_velocity / sum,
            competition_proxy: self.competition_proxy / sum,
            feasibility: self.feasibility / sum,
            automation_friendly: self.automation_friendly / sum,
            monetization_clarity: self.monetization_clarity / sum,
        })
    }

    /// Load from a TOML file. Falls back to `Default` on any read/parse
    /// failure — missing configuration is a warning, never a fatal error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<WeightsFile>(&raw) {
                Ok(file) => file.weights.unwrap_or_default(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed weights config; using defaults");
                    WeightTable::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "weights config not readable; using defaults");
                WeightTable::default()
            }
        }
    }

    /// Load from the path in `WEIGHTS_CONFIG_PATH`, or the default location.
    pub fn load_from_env() -> Self {
        let path = std::env::var(ENV_WEIGHTS_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_WEIGHTS_CONFIG_PATH.to_string());
        Self::load_from_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_sums_to_one() {
        assert!((WeightTable::default().sum() - 1.0).abs() < SUM_TOLERANCE);
    }

    #[test]
    fn all_ones_normalizes_to_one_sixth_each() {
        let table = WeightTable {
            demand_strength: 1.0,
            demand_velocity: 1.0,
            competition_proxy: 1.0,
            feasibility: 1.0,
            automation_friendly: 1.0,
            monetization_clarity: 1.0,
        };
        let n = table.normalized().unwrap();
        assert!((n.demand_strength - 1.0 / 6.0).abs() < 1e-9);
        assert!((n.sum() - 1.0).abs() < SUM_TOLERANCE);
    }

    #[test]
    fn normalization_is_idempotent() {
        let table = WeightTable {
            demand_strength: 0.5,
            demand_velocity: 0.1,
            competition_proxy: 0.1,
            feasibility: 0.1,
            automation_friendly: 0.1,
            monetization_clarity: 0.1,
        };
        let once = table.normalized().unwrap();
        let twice = once.normalized().unwrap();
        for ((_, a), (_, b)) in once.entries().iter().zip(twice.entries().iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_table_is_refused() {
        let table = WeightTable {
            demand_strength: 0.0,
            demand_velocity: 0.0,
            competition_proxy: 0.0,
            feasibility: 0.0,
            automation_friendly: 0.0,
            monetization_clarity: 0.0,
        };
        assert_eq!(
            table.normalized(),
            Err(WeightError::NonPositiveSum { sum: 0.0 })
        );
    }

    #[test]
    fn negative_weight_is_refused() {
        let table = WeightTable {
            demand_velocity: -0.2,
            ..WeightTable::default()
        };
        assert!(matches!(
            table.normalized(),
            Err(WeightError::NegativeWeight {
                factor: "demand_velocity",
                ..
            })
        ));
    }

    #[test]
    fn missing_keys_take_per_factor_defaults() {
        let file: WeightsFile = toml::from_str(
            r#"
            [weights]
            demand_strength = 0.5
            "#,
        )
        .unwrap();
        let w = file.weights.unwrap();
        assert!((w.demand_strength - 0.5).abs() < 1e-9);
        assert!((w.demand_velocity - 0.20).abs() < 1e-9);
        assert!((w.monetization_clarity - 0.10).abs() < 1e-9);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let file: Result<WeightsFile, _> = toml::from_str(
            r#"
            [weights]
            demand_strength = 0.5
            not_a_factor = 3.0
            "#,
        );
        assert!(file.is_ok());
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let w = WeightTable::load_from_file("/nonexistent/weights.toml");
        assert_eq!(w, WeightTable::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "weights_bad_{}.toml",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&path, "weights = \"not a table\"").unwrap();
        let w = WeightTable::load_from_file(&path);
        assert_eq!(w, WeightTable::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_table_loads_custom_values() {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "weights_ok_{}.toml",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(
            &path,
            r#"
            [weights]
            demand_strength = 0.5
            demand_velocity = 0.1
            competition_proxy = 0.1
            feasibility = 0.1
            automation_friendly = 0.1
            monetization_clarity = 0.1
            "#,
        )
        .unwrap();
        let w = WeightTable::load_from_file(&path);
        assert!((w.demand_strength - 0.5).abs() < 1e-9);
        let _ = std::fs::remove_file(&path);
    }
}

// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod breakdown;
pub mod connectors;
pub mod engine;
pub mod history;
pub mod idea;
pub mod metrics;
pub mod ranker;
pub mod signal;
pub mod weights;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::breakdown::ScoreBreakdown;
pub use crate::connectors::{collect_signals, SignalConnector};
pub use crate::engine::{ScoringEngine, ScoringTunables};
pub use crate::idea::{Idea, OpsBurden};
pub use crate::ranker::{rank_ideas, RankedIdea};
pub use crate::signal::{MetricClass, MetricType, Signal, SignalSource};
pub use crate::weights::{WeightError, WeightTable};

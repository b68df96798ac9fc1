use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tower_http::cors::CorsLayer;

use crate::breakdown::ScoreBreakdown;
use crate::connectors::{self, default_connectors, SignalConnector};
use crate::engine::ScoringEngine;
use crate::history::{HistoryEntry, ScoreHistory};
use crate::idea::Idea;
use crate::ranker::{rank_ideas, RankedIdea};
use crate::signal::Signal;
use crate::weights::WeightTable;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("score_requests_total", "Single-idea scoring calls.");
        describe_counter!("rank_requests_total", "Batch ranking calls.");
        describe_counter!(
            "weights_updates_total",
            "Accepted weight-table updates (engine swaps)."
        );
    });
}

#[derive(Clone)]
pub struct AppState {
    /// Swapped wholesale on weight updates; a `score()` call holds one read
    /// guard for its whole duration, so it sees a single consistent table.
    engine: Arc<RwLock<ScoringEngine>>,
    connectors: Arc<Vec<Box<dyn SignalConnector>>>,
    history: Arc<ScoreHistory>,
}

impl AppState {
    /// Boot state: weights from config (with default fallback) and the
    /// built-in mock connector set.
    pub fn from_env() -> Self {
        Self::with_engine(ScoringEngine::from_env())
    }

    pub fn with_engine(engine: ScoringEngine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            connectors: Arc::new(default_connectors()),
            history: Arc::new(ScoreHistory::with_capacity(2000)),
        }
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }
}

pub fn router(state: AppState) -> Router {
    ensure_metrics_described();

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/score", post(score))
        .route("/api/rank", post(rank))
        .route("/api/demand/collect", post(collect))
        .route("/api/scoring/weights", get(get_weights).post(update_weights))
        .route("/debug/history", get(debug_history))
        .route("/debug/last-score", get(debug_last_score))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct ScoreReq {
    idea: Idea,
    #[serde(default)]
    signals: Vec<Signal>,
}

async fn score(
    State(state): State<AppState>,
    Json(body): Json<ScoreReq>,
) -> Json<ScoreBreakdown> {
    counter!("score_requests_total").increment(1);
    let breakdown = {
        let engine = state.engine.read().expect("engine rwlock poisoned");
        engine.score(&body.idea, &body.signals)
    };
    state
        .history
        .push(body.idea.topic_id, &body.idea.title, &breakdown);
    Json(breakdown)
}

async fn rank(
    State(state): State<AppState>,
    Json(items): Json<Vec<ScoreReq>>,
) -> Json<Vec<RankedIdea>> {
    counter!("rank_requests_total").increment(1);
    let pairs = items
        .into_iter()
        .map(|it| (it.idea, it.signals))
        .collect::<Vec<_>>();
    let ranked = {
        let engine = state.engine.read().expect("engine rwlock poisoned");
        rank_ideas(&engine, pairs)
    };
    for entry in &ranked {
        state
            .history
            .push(entry.idea.topic_id, &entry.idea.title, &entry.score_breakdown);
    }
    Json(ranked)
}

#[derive(serde::Deserialize)]
struct CollectReq {
    queries: Vec<String>,
}

#[derive(serde::Serialize)]
struct CollectResp {
    signals_collected: usize,
    sources: Vec<&'static str>,
    signals: Vec<Signal>,
}

async fn collect(
    State(state): State<AppState>,
    Json(body): Json<CollectReq>,
) -> Json<CollectResp> {
    let signals = connectors::collect_signals(&state.connectors, &body.queries).await;
    let mut sources: Vec<&'static str> = signals.iter().map(|s| s.source.name()).collect();
    sources.sort_unstable();
    sources.dedup();
    Json(CollectResp {
        signals_collected: signals.len(),
        sources,
        signals,
    })
}

#[derive(serde::Serialize)]
struct WeightsConfigResp {
    weights: WeightTable,
    description: std::collections::BTreeMap<&'static str, &'static str>,
}

fn factor_descriptions() -> std::collections::BTreeMap<&'static str, &'static str> {
    [
        ("demand_strength", "Volume of mentions/signals"),
        ("demand_velocity", "Growth trend / recency"),
        ("competition_proxy", "Market saturation (inverse)"),
        ("feasibility", "Build complexity and risk"),
        ("automation_friendly", "Low oversight potential"),
        ("monetization_clarity", "Clear pricing and buyer"),
    ]
    .into_iter()
    .collect()
}

/// Current *post-normalization* weights — the table the engine actually
/// scores with, never the raw configured values.
async fn get_weights(State(state): State<AppState>) -> Json<WeightsConfigResp> {
    let weights = {
        let engine = state.engine.read().expect("engine rwlock poisoned");
        *engine.weights()
    };
    Json(WeightsConfigResp {
        weights,
        description: factor_descriptions(),
    })
}

#[derive(serde::Serialize)]
struct WeightsUpdateResp {
    status: &'static str,
    weights: WeightTable,
}

/// Accepts a (possibly unnormalized) table, builds a fresh engine, and swaps
/// it in. Zero/negative tables are refused with 422 — the engine will not
/// silently produce meaningless scores.
async fn update_weights(
    State(state): State<AppState>,
    Json(table): Json<WeightTable>,
) -> Result<Json<WeightsUpdateResp>, (StatusCode, String)> {
    let fresh = ScoringEngine::new(table)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let weights = *fresh.weights();
    let mut guard = state.engine.write().expect("engine rwlock poisoned");
    *guard = fresh;
    counter!("weights_updates_total").increment(1);
    Ok(Json(WeightsUpdateResp {
        status: "updated",
        weights,
    }))
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.snapshot_last_n(10))
}

async fn debug_last_score(State(state): State<AppState>) -> Json<Option<HistoryEntry>> {
    let mut rows = state.history.snapshot_last_n(1);
    Json(rows.pop())
}

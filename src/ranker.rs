//! # Idea Ranker
//! Batch-scores `(idea, signals)` pairs and orders them by composite score.
//!
//! Tie-break policy: the sort is *stable* on `total_score` descending, so
//! ideas with equal totals keep their original input order. An unstable sort
//! would make ranks non-reproducible across runs; this is load-bearing and
//! covered by tests.

use serde::{Deserialize, Serialize};

use crate::breakdown::ScoreBreakdown;
use crate::engine::ScoringEngine;
use crate::idea::Idea;
use crate::signal::Signal;

/// One ranked entry: the original idea plus its score and 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIdea {
    #[serde(flatten)]
    pub idea: Idea,
    #[serde(serialize_with = "crate::breakdown::round2")]
    pub total_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub rank: usize,
}

/// Score every idea against its own signal set and rank the batch.
///
/// Each idea's factor computation is independent; the output order is
/// deterministic for a given input order regardless of how the individual
/// scores were computed.
pub fn rank_ideas(
    engine: &ScoringEngine,
    items: Vec<(Idea, Vec<Signal>)>,
) -> Vec<RankedIdea> {
    let mut ranked: Vec<RankedIdea> = items
        .into_iter()
        .map(|(idea, signals)| {
            let breakdown = engine.score(&idea, &signals);
            RankedIdea {
                idea,
                total_score: breakdown.total,
                score_breakdown: breakdown,
                rank: 0,
            }
        })
        .collect();

    // Stable sort, descending by total. NaN cannot occur (factors are finite
    // and the table is normalized), so the ordering is total in practice.
    ranked.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idea::OpsBurden;
    use crate::signal::{MetricType, SignalSource};
    use crate::weights::WeightTable;
    use chrono::NaiveDate;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(WeightTable::default()).unwrap()
    }

    fn signals() -> Vec<Signal> {
        let date = NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        vec![Signal::new(
            SignalSource::Reddit,
            "test",
            MetricType::PostCount,
            150.0,
            "posts",
            "https://reddit.com/r/startups",
            date,
        )]
    }

    fn idea_with_burden(topic: i64, title: &str, burden: OpsBurden) -> Idea {
        let mut idea = Idea::new(topic, title);
        idea.ops_burden = Some(burden);
        idea
    }

    #[test]
    fn ranks_are_one_based_and_descending() {
        let items = vec![
            (idea_with_burden(1, "High burden", OpsBurden::High), signals()),
            (idea_with_burden(2, "Low burden", OpsBurden::Low), signals()),
        ];
        let ranked = rank_ideas(&engine(), items);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[0].idea.title, "Low burden");
        assert!(ranked[0].total_score >= ranked[1].total_score);
    }

    #[test]
    fn equal_totals_preserve_input_order() {
        // Identical ideas and identical signals produce bit-identical totals;
        // the stable sort must keep the input order.
        let items = vec![
            (idea_with_burden(1, "First", OpsBurden::Medium), signals()),
            (idea_with_burden(2, "Second", OpsBurden::Medium), signals()),
            (idea_with_burden(3, "Third", OpsBurden::Medium), signals()),
        ];
        let ranked = rank_ideas(&engine(), items);
        assert_eq!(ranked[0].total_score, ranked[1].total_score);
        assert_eq!(ranked[1].total_score, ranked[2].total_score);
        let titles: Vec<_> = ranked.iter().map(|r| r.idea.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[test]
    fn empty_batch_yields_empty_ranking() {
        assert!(rank_ideas(&engine(), Vec::new()).is_empty());
    }

    #[test]
    fn ranked_output_carries_idea_fields_and_breakdown() {
        let items = vec![(idea_with_burden(9, "Solo", OpsBurden::Low), signals())];
        let ranked = rank_ideas(&engine(), items);
        let v = serde_json::to_value(&ranked[0]).unwrap();
        // Flattened idea fields sit next to score fields, as the UI expects.
        assert_eq!(v["topic_id"], serde_json::json!(9));
        assert_eq!(v["title"], serde_json::json!("Solo"));
        assert_eq!(v["rank"], serde_json::json!(1));
        assert!(v["score_breakdown"]["demand_strength"].is_number());
        assert_eq!(v["total_score"], v["score_breakdown"]["total"]);
    }
}

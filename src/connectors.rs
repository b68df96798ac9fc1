//! # Signal Connectors
//! Capability boundary between the scoring core and the outside world:
//! a connector turns a search query into already-structured [`Signal`]s.
//!
//! The core never fetches from third-party networks itself — that is the job
//! of external collaborators implementing [`SignalConnector`]. What ships
//! here are the deterministic mock connectors used for demos and tests: they
//! derive values from a hash of the query, so the same query always yields
//! the same signals without any API keys.

use anyhow::Result;
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::signal::{MetricType, Signal, SignalSource};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "collect_signals_total",
            "Signals produced by connectors across all collect runs."
        );
        describe_counter!(
            "collect_connector_errors_total",
            "Connector search failures (skipped, never fatal)."
        );
        describe_gauge!(
            "collect_last_run_ts",
            "Unix ts when signal collection last ran."
        );
    });
}

/// A demand-signal source the collect pipeline can query.
#[async_trait::async_trait]
pub trait SignalConnector: Send + Sync {
    fn source(&self) -> SignalSource;

    /// Search for demand signals matching the query.
    async fn search(&self, query: &str) -> Result<Vec<Signal>>;
}

/// Run every connector for every query and pool the results.
///
/// A failing connector is logged and counted but never fails the batch —
/// partial evidence still scores.
pub async fn collect_signals(
    connectors: &[Box<dyn SignalConnector>],
    queries: &[String],
) -> Vec<Signal> {
    ensure_metrics_described();

    let mut collected = Vec::new();
    for query in queries {
        for connector in connectors {
            match connector.search(query).await {
                Ok(mut signals) => collected.append(&mut signals),
                Err(e) => {
                    warn!(
                        error = ?e,
                        source = connector.source().name(),
                        query = %query,
                        "connector error"
                    );
                    counter!("collect_connector_errors_total").increment(1);
                }
            }
        }
    }

    counter!("collect_signals_total").increment(collected.len() as u64);
    gauge!("collect_last_run_ts").set(Utc::now().timestamp().max(0) as f64);
    collected
}

/// Deterministic pseudo-value in `[0, modulus)` from `query:salt`.
/// Same construction as the original mock mode, so demo values are stable
/// across runs and across processes.
fn hash_value(query: &str, salt: u32, modulus: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update(b":");
    hasher.update(salt.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes) % modulus
}

/// URL-safe slug for provenance links: lowercase, whitespace runs → `+`.
fn query_slug(query: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("slug regex"));
    re.replace_all(query.trim(), "+").to_ascii_lowercase()
}

/// Mock Google Trends: one interest score (0–100) plus a growth-rate signal.
pub struct GoogleTrendsMock;

#[async_trait::async_trait]
impl SignalConnector for GoogleTrendsMock {
    fn source(&self) -> SignalSource {
        SignalSource::GoogleTrends
    }

    async fn search(&self, query: &str) -> Result<Vec<Signal>> {
        let today = Utc::now().date_naive();
        let url = format!("https://trends.google.com/trends/explore?q={}", query_slug(query));
        let interest = hash_value(query, 0, 101) as f64;
        // Growth in [-100, +100]%.
        let growth = hash_value(query, 1, 201) as f64 - 100.0;
        Ok(vec![
            Signal::new(self.source(), query, MetricType::InterestScore, interest, "relative interest", &url, today),
            Signal::new(self.source(), query, MetricType::GrowthRate, growth, "percent", &url, today),
        ])
    }
}

/// Mock Reddit: post volume plus comment engagement.
pub struct RedditMock;

#[async_trait::async_trait]
impl SignalConnector for RedditMock {
    fn source(&self) -> SignalSource {
        SignalSource::Reddit
    }

    async fn search(&self, query: &str) -> Result<Vec<Signal>> {
        let today = Utc::now().date_naive();
        let url = format!("https://www.reddit.com/search/?q={}", query_slug(query));
        let posts = (hash_value(query, 2, 1000) + 100) as f64;
        let comments = (hash_value(query, 3, 5000) + 50) as f64;
        Ok(vec![
            Signal::new(self.source(), query, MetricType::PostCount, posts, "posts", &url, today),
            Signal::new(self.source(), query, MetricType::Engagement, comments, "comments", &url, today),
        ])
    }
}

/// Mock Hacker News. The plain feed emits story volume, engagement, and
/// average points; `show_hn()` builds the launch-indicator variant the
/// competition proxy counts.
pub struct HackerNewsMock {
    source: SignalSource,
}

impl HackerNewsMock {
    pub fn new() -> Self {
        Self {
            source: SignalSource::Hackernews,
        }
    }

    /// Show HN sub-feed: product launches for the topic.
    pub fn show_hn() -> Self {
        Self {
            source: SignalSource::HackernewsShowHn,
        }
    }

    /// Ask HN sub-feed: problems people ask about.
    pub fn ask_hn() -> Self {
        Self {
            source: SignalSource::HackernewsAskHn,
        }
    }
}

impl Default for HackerNewsMock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SignalConnector for HackerNewsMock {
    fn source(&self) -> SignalSource {
        self.source
    }

    async fn search(&self, query: &str) -> Result<Vec<Signal>> {
        let today = Utc::now().date_naive();
        let url = format!("https://hn.algolia.com/?q={}", query_slug(query));
        // Salt on the sub-feed so show_hn/ask_hn don't mirror the main feed.
        let salt_base = match self.source {
            SignalSource::HackernewsShowHn => 40,
            SignalSource::HackernewsAskHn => 50,
            _ => 4,
        };
        let stories = (hash_value(query, salt_base, 200) + 1) as f64;
        let comments = hash_value(query, salt_base + 1, 3000) as f64;
        let avg_points = hash_value(query, salt_base + 2, 300) as f64;
        Ok(vec![
            Signal::new(self.source, query, MetricType::StoryCount, stories, "stories", &url, today),
            Signal::new(self.source, query, MetricType::Engagement, comments, "comments", &url, today),
            Signal::new(self.source, query, MetricType::AvgPoints, avg_points, "points", &url, today),
        ])
    }
}

/// Mock YouTube: video volume only.
pub struct YouTubeMock;

#[async_trait::async_trait]
impl SignalConnector for YouTubeMock {
    fn source(&self) -> SignalSource {
        SignalSource::Youtube
    }

    async fn search(&self, query: &str) -> Result<Vec<Signal>> {
        let today = Utc::now().date_naive();
        let url = format!("https://www.youtube.com/results?search_query={}", query_slug(query));
        let videos = (hash_value(query, 7, 2000) + 20) as f64;
        Ok(vec![Signal::new(
            self.source(),
            query,
            MetricType::VideoCount,
            videos,
            "videos",
            &url,
            today,
        )])
    }
}

/// The default connector set the service boots with.
pub fn default_connectors() -> Vec<Box<dyn SignalConnector>> {
    vec![
        Box::new(GoogleTrendsMock),
        Box::new(RedditMock),
        Box::new(HackerNewsMock::new()),
        Box::new(HackerNewsMock::show_hn()),
        Box::new(YouTubeMock),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingConnector;

    #[async_trait::async_trait]
    impl SignalConnector for FailingConnector {
        fn source(&self) -> SignalSource {
            SignalSource::Youtube
        }

        async fn search(&self, _query: &str) -> Result<Vec<Signal>> {
            anyhow::bail!("simulated outage")
        }
    }

    #[tokio::test]
    async fn mock_search_is_deterministic_per_query() {
        let c = RedditMock;
        let a = c.search("invoice automation").await.unwrap();
        let b = c.search("invoice automation").await.unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.value, y.value);
            assert_eq!(x.metric_type, y.metric_type);
        }
    }

    #[tokio::test]
    async fn different_queries_produce_different_values() {
        let c = RedditMock;
        let a = c.search("invoice automation").await.unwrap();
        let b = c.search("meal planning").await.unwrap();
        assert_ne!(a[0].value, b[0].value);
    }

    #[tokio::test]
    async fn show_hn_variant_tags_signals_as_launch_indicators() {
        let c = HackerNewsMock::show_hn();
        let signals = c.search("ai todo app").await.unwrap();
        assert!(!signals.is_empty());
        assert!(signals.iter().all(|s| s.source.is_launch_indicator()));
    }

    #[tokio::test]
    async fn collect_survives_a_failing_connector() {
        let connectors: Vec<Box<dyn SignalConnector>> =
            vec![Box::new(FailingConnector), Box::new(RedditMock)];
        let queries = vec!["invoice automation".to_string()];
        let signals = collect_signals(&connectors, &queries).await;
        assert!(!signals.is_empty());
        assert!(signals.iter().all(|s| s.source == SignalSource::Reddit));
    }

    #[tokio::test]
    async fn collect_covers_every_query_and_source() {
        let connectors = default_connectors();
        let queries = vec!["a".to_string(), "b".to_string()];
        let signals = collect_signals(&connectors, &queries).await;
        for q in &queries {
            assert!(signals.iter().any(|s| &s.query == q));
        }
        assert!(signals.iter().any(|s| s.source == SignalSource::GoogleTrends));
        assert!(signals.iter().any(|s| s.source == SignalSource::HackernewsShowHn));
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(query_slug("  Invoice   Automation "), "invoice+automation");
    }

    #[test]
    fn mock_values_stay_in_range() {
        for q in ["alpha", "beta", "gamma"] {
            let interest = hash_value(q, 0, 101);
            assert!(interest <= 100);
            let growth = hash_value(q, 1, 201) as f64 - 100.0;
            assert!((-100.0..=100.0).contains(&growth));
        }
    }
}

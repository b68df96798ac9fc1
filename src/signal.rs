//! # Demand Signals
//! One normalized measurement of topic interest from one source.
//!
//! Signals are immutable values: a connector creates them at fetch time and
//! later fetches supersede (never overwrite) earlier ones. The scoring core
//! only consumes them; it never fetches, parses, or rate-limits anything.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Connector identifiers. A closed set: the scoring core never depends on
/// which sources exist beyond this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    GoogleTrends,
    Reddit,
    Hackernews,
    /// Show HN sub-feed — product launches; used as the launch indicator
    /// by the competition proxy.
    HackernewsShowHn,
    /// Ask HN sub-feed — problem statements people post about.
    HackernewsAskHn,
    Youtube,
}

impl SignalSource {
    /// Stable lowercase name, matching the wire/serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleTrends => "google_trends",
            Self::Reddit => "reddit",
            Self::Hackernews => "hackernews",
            Self::HackernewsShowHn => "hackernews_show_hn",
            Self::HackernewsAskHn => "hackernews_ask_hn",
            Self::Youtube => "youtube",
        }
    }

    /// True for signals that indicate an existing product launch
    /// (competitors already shipping in this space).
    pub fn is_launch_indicator(&self) -> bool {
        matches!(self, Self::HackernewsShowHn)
    }
}

/// What a signal's raw value measures, in the connector's native unit.
/// Wire names match what the connectors emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Volume,
    PostCount,
    StoryCount,
    VideoCount,
    InterestScore,
    Engagement,
    AvgPoints,
    GrowthRate,
    TrendSlope,
}

/// Coarse classification used by the factor functions. Raw metric types from
/// different sources land in the same class so they can be averaged together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricClass {
    /// Raw counts and interest scores; values are non-negative.
    Volume,
    /// Percentage-change metrics; values may be negative.
    Growth,
    /// Engagement/quality metrics (comments, points).
    Quality,
    /// Reserved for label-valued metrics.
    Categorical,
}

impl MetricType {
    pub fn class(&self) -> MetricClass {
        match self {
            Self::Volume
            | Self::PostCount
            | Self::StoryCount
            | Self::VideoCount
            | Self::InterestScore => MetricClass::Volume,
            Self::GrowthRate | Self::TrendSlope => MetricClass::Growth,
            Self::Engagement | Self::AvgPoints => MetricClass::Quality,
        }
    }
}

/// One demand signal: a single measurement from a single source.
///
/// `value` is in the source's native unit (`unit` is a display label only).
/// Volume/count metrics are non-negative; growth metrics may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub source: SignalSource,
    /// The search term this measurement was collected for.
    pub query: String,
    pub metric_type: MetricType,
    pub value: f64,
    /// Display label ("mentions", "stories", "percent", ...).
    pub unit: String,
    /// Provenance link for the UI.
    pub url: String,
    /// When the connector observed this measurement.
    pub observed_at: DateTime<Utc>,
    /// Calendar date the measurement pertains to.
    pub data_date: NaiveDate,
}

impl Signal {
    pub fn new(
        source: SignalSource,
        query: impl Into<String>,
        metric_type: MetricType,
        value: f64,
        unit: impl Into<String>,
        url: impl Into<String>,
        data_date: NaiveDate,
    ) -> Self {
        Self {
            source,
            query: query.into(),
            metric_type,
            value,
            unit: unit.into(),
            url: url.into(),
            observed_at: Utc::now(),
            data_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_classes_partition_the_types() {
        assert_eq!(MetricType::PostCount.class(), MetricClass::Volume);
        assert_eq!(MetricType::InterestScore.class(), MetricClass::Volume);
        assert_eq!(MetricType::GrowthRate.class(), MetricClass::Growth);
        assert_eq!(MetricType::TrendSlope.class(), MetricClass::Growth);
        assert_eq!(MetricType::Engagement.class(), MetricClass::Quality);
        assert_eq!(MetricType::AvgPoints.class(), MetricClass::Quality);
    }

    #[test]
    fn only_show_hn_counts_as_launch_indicator() {
        assert!(SignalSource::HackernewsShowHn.is_launch_indicator());
        assert!(!SignalSource::Hackernews.is_launch_indicator());
        assert!(!SignalSource::Reddit.is_launch_indicator());
    }

    #[test]
    fn serde_uses_snake_case_wire_names() {
        let v = serde_json::to_value(SignalSource::HackernewsShowHn).unwrap();
        assert_eq!(v, serde_json::json!("hackernews_show_hn"));
        let v = serde_json::to_value(MetricType::InterestScore).unwrap();
        assert_eq!(v, serde_json::json!("interest_score"));
    }

    #[test]
    fn signal_roundtrips_through_json() {
        let s = Signal::new(
            SignalSource::Reddit,
            "invoice automation",
            MetricType::PostCount,
            150.0,
            "posts",
            "https://reddit.com/r/startups",
            NaiveDate::from_ymd_opt(2026, 2, 23).unwrap(),
        );
        let json = serde_json::to_string(&s).unwrap();
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}

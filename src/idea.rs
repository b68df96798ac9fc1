//! # Business Ideas
//! Qualitative idea record as supplied by the idea-store collaborator.
//! The scoring engine treats it as read-only input; absent optional fields
//! are `None`, never an empty string.

use serde::{Deserialize, Serialize};

/// Qualitative estimate of the operational effort to run an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpsBurden {
    Low,
    Medium,
    High,
}

/// A candidate business idea linked to a topic's signal set via `topic_id`.
///
/// Absence is meaningful input, not an error: the factor functions assign
/// neutral/base scores for fields the caller did not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub topic_id: i64,
    pub title: String,
    /// `None` means "not estimated"; the factors use the medium-ish defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ops_burden: Option<OpsBurden>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_prop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_risks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_now: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moat: Option<String>,
}

impl Idea {
    /// Minimal idea with everything optional left unset.
    pub fn new(topic_id: i64, title: impl Into<String>) -> Self {
        Self {
            topic_id,
            title: title.into(),
            ops_burden: None,
            pricing_model: None,
            target_user: None,
            value_prop: None,
            distribution_channel: None,
            compliance_risks: None,
            why_now: None,
            moat: None,
        }
    }
}

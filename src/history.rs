//! history.rs — simple in-memory log of recent score computations for the
//! debug endpoints. Not persistence: storage is a collaborator's concern.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::breakdown::ScoreBreakdown;

#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    pub topic_id: i64,
    pub title: String,
    #[serde(serialize_with = "crate::breakdown::round2")]
    pub total: f64,
}

#[derive(Debug)]
pub struct ScoreHistory {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl ScoreHistory {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, topic_id: i64, title: &str, breakdown: &ScoreBreakdown) {
        let entry = HistoryEntry {
            ts_unix: now_unix(),
            topic_id,
            title: title.to_string(),
            total: breakdown.total,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single detection produced by a poll tick. Not stored; consumed by the
/// alert dispatcher as soon as it is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    pub subject_id: String,
    #[serde(rename = "timestamp")]
    pub observed_at: DateTime<Utc>,
}

impl DetectionOutcome {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self::at(subject_id, Utc::now())
    }

    pub fn at(subject_id: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            subject_id: subject_id.into(),
            observed_at,
        }
    }
}

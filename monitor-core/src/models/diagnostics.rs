use serde::Serialize;

/// Counters for debugging monitoring sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDiagnostics {
    pub acquire_attempts: u64,
    pub acquire_failures: u64,
    /// Streams released, including ones discarded after a stop raced acquisition.
    pub releases: u64,
    pub ticks: u64,
    pub detections: u64,
    /// Alerts handed to the sink, detections and errors alike.
    pub alerts_shown: u64,
    /// Repeat detections dropped inside the dedup window.
    pub alerts_suppressed: u64,
}

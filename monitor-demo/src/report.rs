use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use monitor_core::{MonitorConfig, MonitorError, SessionDiagnostics, SessionStatus};

/// Summary of a finished demo run, written as pretty JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub finished_at: String,
    pub device: String,
    pub final_state: String,
    pub camera_connected: bool,
    pub poll_interval_ms: u64,
    pub acquire_attempts: u64,
    pub acquire_failures: u64,
    pub releases: u64,
    pub ticks: u64,
    pub detections: u64,
    pub alerts_shown: u64,
    pub alerts_suppressed: u64,
    pub last_error: Option<String>,
}

impl SessionReport {
    pub fn new(
        device: &str,
        config: &MonitorConfig,
        status: SessionStatus,
        diagnostics: &SessionDiagnostics,
        last_error: Option<String>,
    ) -> Self {
        Self {
            finished_at: chrono::Utc::now().to_rfc3339(),
            device: device.to_string(),
            final_state: status.state.to_string(),
            camera_connected: status.camera_connected,
            poll_interval_ms: config.poll_interval_ms,
            acquire_attempts: diagnostics.acquire_attempts,
            acquire_failures: diagnostics.acquire_failures,
            releases: diagnostics.releases,
            ticks: diagnostics.ticks,
            detections: diagnostics.detections,
            alerts_shown: diagnostics.alerts_shown,
            alerts_suppressed: diagnostics.alerts_suppressed,
            last_error,
        }
    }
}

pub fn write_report(report: &SessionReport, path: &Path) -> Result<(), MonitorError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| MonitorError::Storage(format!("failed to serialize report: {}", e)))?;
    fs::write(path, json)
        .map_err(|e| MonitorError::Storage(format!("failed to write report: {}", e)))
}

pub fn read_report(path: &Path) -> Result<SessionReport, MonitorError> {
    let json = fs::read_to_string(path)
        .map_err(|e| MonitorError::Storage(format!("failed to read report: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| MonitorError::Storage(format!("failed to parse report: {}", e)))
}

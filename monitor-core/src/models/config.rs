use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::device::CaptureConstraints;
use super::error::MonitorError;

/// Configuration for the stand-in roster detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionConfig {
    /// Chance of a detection on each tick (default: 0.3).
    pub probability: f64,

    /// Subjects a detection is drawn from, uniformly.
    pub roster: Vec<String>,

    /// Fixed RNG seed for reproducible runs, or None for entropy.
    pub seed: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            probability: 0.3,
            roster: vec![
                "John Doe".to_string(),
                "Jane Smith".to_string(),
                "Mike Johnson".to_string(),
            ],
            seed: None,
        }
    }
}

/// Alert presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertConfig {
    /// How long an alert stays on screen (default: 3000).
    pub display_ms: u64,

    /// Identical detections closer together than this are dropped (default: 1000).
    pub dedup_window_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            display_ms: 3000,
            dedup_window_ms: 1000,
        }
    }
}

/// Configuration for a monitoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorConfig {
    /// Requested capture stream (flattened so `width`, `height` and
    /// `facingPreference` sit at the top level).
    #[serde(flatten)]
    pub constraints: CaptureConstraints,

    /// Detection cadence in milliseconds (default: 2000).
    pub poll_interval_ms: u64,

    pub detection: DetectionConfig,

    pub alerts: AlertConfig,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.constraints.width == 0 || self.constraints.height == 0 {
            return Err(format!(
                "capture resolution must be non-zero, got {}x{}",
                self.constraints.width, self.constraints.height
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err("poll interval must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.detection.probability) {
            return Err(format!(
                "detection probability must be within [0, 1], got {}",
                self.detection.probability
            ));
        }
        if self.detection.probability > 0.0 && self.detection.roster.is_empty() {
            return Err("detection roster is empty".into());
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MonitorError::Configuration(format!("failed to parse config: {}", e)))?;
        config.validate().map_err(MonitorError::Configuration)?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, MonitorError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            constraints: CaptureConstraints::default(),
            poll_interval_ms: 2000,
            detection: DetectionConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}

use serde::Serialize;

/// Monitoring session state machine.
///
/// State transitions:
/// ```text
/// idle → acquiring → active → stopping → idle
///            ↓
///          idle (acquisition failed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Acquiring,
    Active,
    Stopping,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// States in which a bound capture resource is permitted.
    pub fn may_hold_capture(&self) -> bool {
        matches!(self, Self::Active | Self::Stopping)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Active => "active",
            Self::Stopping => "stopping",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binding status of a `CaptureResource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStatus {
    Unbound,
    Bound,
    Error,
}

/// Snapshot used to drive the host's toggle control and status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub state: SessionState,
    /// Monitoring has been requested and not yet stopped.
    pub monitoring: bool,
    /// A capture stream is bound ("Camera Active" / "Connected").
    pub camera_connected: bool,
}

impl SessionStatus {
    /// Detection runs only with both a monitoring request and a live camera.
    pub fn detection_active(&self) -> bool {
        self.monitoring && self.camera_connected
    }

    pub fn alerts_ready(&self) -> bool {
        self.monitoring
    }

    /// Monitoring was requested and the camera is still being acquired.
    pub fn camera_access_required(&self) -> bool {
        self.monitoring && !self.camera_connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_and_stopping_may_hold_capture() {
        assert!(!SessionState::Idle.may_hold_capture());
        assert!(!SessionState::Acquiring.may_hold_capture());
        assert!(SessionState::Active.may_hold_capture());
        assert!(SessionState::Stopping.may_hold_capture());
    }

    #[test]
    fn status_indicators_follow_monitoring_and_camera() {
        let waiting = SessionStatus {
            state: SessionState::Acquiring,
            monitoring: true,
            camera_connected: false,
        };
        assert!(waiting.camera_access_required());
        assert!(waiting.alerts_ready());
        assert!(!waiting.detection_active());

        let live = SessionStatus {
            state: SessionState::Active,
            monitoring: true,
            camera_connected: true,
        };
        assert!(live.detection_active());
        assert!(!live.camera_access_required());
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&SessionState::Stopping).unwrap();
        assert_eq!(json, "\"stopping\"");
    }
}

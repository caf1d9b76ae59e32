use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::detection::DetectionOutcome;
use super::error::AcquisitionError;

/// Severity of a transient alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Error,
}

/// Icon shown next to the alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertIcon {
    User,
    Warning,
}

/// Structured payload carried by an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AlertEvent {
    #[serde(rename_all = "camelCase")]
    Detection {
        subject_id: String,
        timestamp: DateTime<Utc>,
    },
    AcquisitionFailed { message: String },
}

/// A transient, auto-dismissing notification for the host to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub level: AlertLevel,
    pub icon: AlertIcon,
    pub message: String,
    #[serde(rename = "displayMs", serialize_with = "serialize_millis")]
    pub display_for: Duration,
    pub event: AlertEvent,
}

impl Alert {
    pub fn detection(outcome: &DetectionOutcome, display_for: Duration) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            level: AlertLevel::Success,
            icon: AlertIcon::User,
            message: format!("Student Detected: {}", outcome.subject_id),
            display_for,
            event: AlertEvent::Detection {
                subject_id: outcome.subject_id.clone(),
                timestamp: outcome.observed_at,
            },
        }
    }

    pub fn acquisition_failed(error: &AcquisitionError, display_for: Duration) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            level: AlertLevel::Error,
            icon: AlertIcon::Warning,
            message: "Unable to access camera. Please check permissions.".to_string(),
            display_for,
            event: AlertEvent::AcquisitionFailed {
                message: error.to_string(),
            },
        }
    }

    /// Subject named by a detection alert.
    pub fn subject_id(&self) -> Option<&str> {
        match &self.event {
            AlertEvent::Detection { subject_id, .. } => Some(subject_id),
            AlertEvent::AcquisitionFailed { .. } => None,
        }
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_alert_names_subject() {
        let outcome = DetectionOutcome::new("Jane Smith");
        let alert = Alert::detection(&outcome, Duration::from_secs(3));

        assert_eq!(alert.message, "Student Detected: Jane Smith");
        assert_eq!(alert.level, AlertLevel::Success);
        assert_eq!(alert.icon, AlertIcon::User);
        assert_eq!(alert.subject_id(), Some("Jane Smith"));
    }

    #[test]
    fn detection_event_serializes_subject_and_timestamp() {
        let outcome = DetectionOutcome::new("Mike Johnson");
        let alert = Alert::detection(&outcome, Duration::from_millis(3000));
        let json: serde_json::Value = serde_json::to_value(&alert).unwrap();

        assert_eq!(json["displayMs"], 3000);
        assert_eq!(json["event"]["kind"], "detection");
        assert_eq!(json["event"]["subjectId"], "Mike Johnson");
        assert!(json["event"]["timestamp"].is_string());
    }

    #[test]
    fn failure_alert_carries_error_message() {
        let alert =
            Alert::acquisition_failed(&AcquisitionError::PermissionDenied, Duration::from_secs(3));
        let json: serde_json::Value = serde_json::to_value(&alert).unwrap();

        assert_eq!(alert.level, AlertLevel::Error);
        assert_eq!(alert.subject_id(), None);
        assert_eq!(json["event"]["kind"], "acquisitionFailed");
        assert_eq!(json["event"]["message"], "permission denied");
    }
}

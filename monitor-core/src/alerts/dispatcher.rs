use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::models::alert::Alert;
use crate::models::config::AlertConfig;
use crate::models::detection::DetectionOutcome;
use crate::models::error::AcquisitionError;
use crate::models::state::SessionState;
use crate::traits::alert_sink::AlertSink;

/// Turns detection outcomes and acquisition failures into transient alerts.
///
/// Best-effort: sink failures are logged and dropped, and the only state kept
/// is the last shown detection, used to suppress an identical alert arriving
/// within the dedup window.
pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,
    display_for: Duration,
    dedup_window: Duration,
    last_shown: Mutex<Option<(String, DateTime<Utc>)>>,
    shown: AtomicU64,
    suppressed: AtomicU64,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>, config: &AlertConfig) -> Self {
        Self {
            sink,
            display_for: Duration::from_millis(config.display_ms),
            dedup_window: Duration::from_millis(config.dedup_window_ms),
            last_shown: Mutex::new(None),
            shown: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Surface a detection. Never blocks on delivery and never fails.
    pub fn notify(&self, outcome: &DetectionOutcome) {
        if self.is_flood(outcome) {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            log::debug!("suppressed repeat alert for {}", outcome.subject_id);
            return;
        }
        self.deliver(Alert::detection(outcome, self.display_for));
    }

    /// Surface an acquisition failure. Always delivered.
    pub fn notify_error(&self, error: &AcquisitionError) {
        self.deliver(Alert::acquisition_failed(error, self.display_for));
    }

    pub fn state_changed(&self, state: SessionState) {
        self.sink.on_state_changed(state);
    }

    /// Alerts handed to the sink (including ones the sink then failed on).
    pub fn shown(&self) -> u64 {
        self.shown.load(Ordering::Relaxed)
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    fn is_flood(&self, outcome: &DetectionOutcome) -> bool {
        let mut last = self.last_shown.lock();
        let repeat = match last.as_ref() {
            Some((subject, at)) if *subject == outcome.subject_id => {
                // A clock stepping backwards never hides an alert.
                let gap = outcome.observed_at.signed_duration_since(*at);
                gap.to_std().map(|g| g < self.dedup_window).unwrap_or(false)
            }
            _ => false,
        };
        if !repeat {
            *last = Some((outcome.subject_id.clone(), outcome.observed_at));
        }
        repeat
    }

    fn deliver(&self, alert: Alert) {
        self.shown.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.sink.show(&alert) {
            log::warn!("dropping alert {:?}: {}", alert.message, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::board::AlertBoard;
    use crate::models::alert::AlertLevel;
    use crate::models::error::DispatchError;

    struct FailingSink;

    impl AlertSink for FailingSink {
        fn show(&self, _alert: &Alert) -> Result<(), DispatchError> {
            Err(DispatchError("display detached".into()))
        }
    }

    fn dispatcher(sink: Arc<dyn AlertSink>) -> AlertDispatcher {
        AlertDispatcher::new(sink, &AlertConfig::default())
    }

    #[test]
    fn detection_reaches_sink() {
        let board = Arc::new(AlertBoard::new());
        let dispatcher = dispatcher(board.clone());

        dispatcher.notify(&DetectionOutcome::new("Jane Smith"));

        let history = board.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].subject_id(), Some("Jane Smith"));
        assert_eq!(history[0].display_for, Duration::from_millis(3000));
    }

    #[test]
    fn identical_detection_within_window_is_suppressed() {
        let board = Arc::new(AlertBoard::new());
        let dispatcher = dispatcher(board.clone());
        let t = Utc::now();

        let ms = chrono::Duration::milliseconds;

        dispatcher.notify(&DetectionOutcome::at("John Doe", t));
        dispatcher.notify(&DetectionOutcome::at("John Doe", t + ms(200)));
        dispatcher.notify(&DetectionOutcome::at("John Doe", t + ms(2000)));

        assert_eq!(board.history().len(), 2);
        assert_eq!(dispatcher.suppressed(), 1);
    }

    #[test]
    fn earlier_timestamp_is_not_treated_as_repeat() {
        let board = Arc::new(AlertBoard::new());
        let dispatcher = dispatcher(board.clone());
        let t = Utc::now();

        dispatcher.notify(&DetectionOutcome::at("Jane Smith", t));
        let earlier = t - chrono::Duration::milliseconds(500);
        dispatcher.notify(&DetectionOutcome::at("Jane Smith", earlier));

        assert_eq!(board.history().len(), 2);
        assert_eq!(dispatcher.suppressed(), 0);
    }

    #[test]
    fn different_subjects_are_not_deduplicated() {
        let board = Arc::new(AlertBoard::new());
        let dispatcher = dispatcher(board.clone());
        let t = Utc::now();

        dispatcher.notify(&DetectionOutcome::at("John Doe", t));
        dispatcher.notify(&DetectionOutcome::at("Mike Johnson", t));
        dispatcher.notify(&DetectionOutcome::at("John Doe", t));

        assert_eq!(board.history().len(), 3);
    }

    #[test]
    fn sink_failure_is_swallowed() {
        let dispatcher = dispatcher(Arc::new(FailingSink));
        dispatcher.notify(&DetectionOutcome::new("Jane Smith"));
        dispatcher.notify_error(&AcquisitionError::DeviceBusy);
        assert_eq!(dispatcher.shown(), 2);
    }

    #[test]
    fn errors_bypass_dedup() {
        let board = Arc::new(AlertBoard::new());
        let dispatcher = dispatcher(board.clone());

        dispatcher.notify_error(&AcquisitionError::PermissionDenied);
        dispatcher.notify_error(&AcquisitionError::PermissionDenied);

        let history = board.history();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|a| a.level == AlertLevel::Error));
    }
}

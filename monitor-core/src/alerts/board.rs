use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::models::alert::Alert;
use crate::models::error::DispatchError;
use crate::models::state::SessionState;
use crate::traits::alert_sink::AlertSink;

struct Posted {
    alert: Alert,
    posted_at: DateTime<Utc>,
}

/// In-memory alert sink, like a toast container: alerts stay visible for
/// their display duration and the full history is kept for inspection.
#[derive(Default)]
pub struct AlertBoard {
    posted: Mutex<Vec<Posted>>,
    states: Mutex<Vec<SessionState>>,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every alert ever shown, oldest first.
    pub fn history(&self) -> Vec<Alert> {
        self.posted.lock().iter().map(|p| p.alert.clone()).collect()
    }

    /// Alerts still on screen at `now`.
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.posted
            .lock()
            .iter()
            .filter(|p| {
                chrono::Duration::from_std(p.alert.display_for)
                    .map(|ttl| p.posted_at + ttl > now)
                    .unwrap_or(false)
            })
            .map(|p| p.alert.clone())
            .collect()
    }

    /// State changes observed, in order.
    pub fn states(&self) -> Vec<SessionState> {
        self.states.lock().clone()
    }
}

impl AlertSink for AlertBoard {
    fn show(&self, alert: &Alert) -> Result<(), DispatchError> {
        self.posted.lock().push(Posted {
            alert: alert.clone(),
            posted_at: Utc::now(),
        });
        Ok(())
    }

    fn on_state_changed(&self, state: SessionState) {
        self.states.lock().push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::detection::DetectionOutcome;
    use std::time::Duration;

    #[test]
    fn alerts_expire_after_display_duration() {
        let board = AlertBoard::new();
        let outcome = DetectionOutcome::new("Jane Smith");
        let alert = Alert::detection(&outcome, Duration::from_millis(3000));
        board.show(&alert).unwrap();

        let now = Utc::now();
        assert_eq!(board.visible_at(now).len(), 1);
        assert!(board.visible_at(now + chrono::Duration::seconds(4)).is_empty());
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn records_state_changes() {
        let board = AlertBoard::new();
        board.on_state_changed(SessionState::Acquiring);
        board.on_state_changed(SessionState::Idle);
        assert_eq!(board.states(), vec![SessionState::Acquiring, SessionState::Idle]);
    }
}

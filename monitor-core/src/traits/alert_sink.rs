use crate::models::alert::Alert;
use crate::models::error::DispatchError;
use crate::models::state::SessionState;

/// Receiver for the notification surface of a monitoring session.
///
/// Called from the session's tick task, not the host's UI thread, so
/// implementations must return quickly and marshal work elsewhere if needed.
pub trait AlertSink: Send + Sync {
    /// Display a transient alert. Errors are logged and dropped.
    fn show(&self, alert: &Alert) -> Result<(), DispatchError>;

    /// Called when the session state changes.
    fn on_state_changed(&self, _state: SessionState) {}
}

use crate::models::state::{SessionState, SessionStatus};

/// Control surface a hosting view uses to drive a monitoring session.
pub trait SessionControl {
    /// Request monitoring. Transitions: idle → acquiring → active.
    /// A no-op in any other state.
    fn start(&self);

    /// Stop monitoring and release the camera.
    /// Transitions: acquiring/active → stopping → idle. A no-op when idle.
    fn stop(&self);

    fn current_state(&self) -> SessionState;

    /// Whether a capture stream is currently bound.
    fn is_capturing(&self) -> bool;

    fn status(&self) -> SessionStatus;
}

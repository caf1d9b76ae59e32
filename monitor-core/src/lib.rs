//! # monitor-core
//!
//! Monitoring session core for the attendance demo.
//!
//! Acquires a camera, polls a detector against its frames on a fixed
//! interval, turns detections into transient alerts, and guarantees the
//! camera is released on every way out of a session. Platform backends
//! implement `CaptureProvider`; hosts receive alerts through `AlertSink`.
//!
//! ## Architecture
//!
//! ```text
//! monitor-core (this crate)
//! ├── traits/     ← CaptureProvider, CaptureStream, Detector, AlertSink, SessionControl
//! ├── models/     ← SessionState, MonitorConfig, AcquisitionError, Alert, etc.
//! ├── capture/    ← CaptureResource, SimulatedCamera
//! ├── detection/  ← DetectionPoller, RosterDetector
//! ├── alerts/     ← AlertDispatcher, AlertBoard
//! └── session/    ← MonitoringSession (state machine)
//! ```

pub mod alerts;
pub mod capture;
pub mod detection;
pub mod models;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use alerts::board::AlertBoard;
pub use alerts::dispatcher::AlertDispatcher;
pub use capture::resource::CaptureResource;
pub use capture::simulated::{PermissionDecision, SimulatedCamera, SimulatedStream};
pub use detection::poller::DetectionPoller;
pub use detection::roster::RosterDetector;
pub use models::alert::{Alert, AlertEvent, AlertIcon, AlertLevel};
pub use models::config::{AlertConfig, DetectionConfig, MonitorConfig};
pub use models::detection::DetectionOutcome;
pub use models::device::{CameraDevice, CaptureConstraints, FacingMode, Frame};
pub use models::diagnostics::SessionDiagnostics;
pub use models::error::{AcquisitionError, DispatchError, MonitorError};
pub use models::state::{CaptureStatus, SessionState, SessionStatus};
pub use session::monitor::MonitoringSession;
pub use traits::alert_sink::AlertSink;
pub use traits::capture_provider::{CaptureProvider, CaptureStream};
pub use traits::detector::Detector;
pub use traits::session_control::SessionControl;

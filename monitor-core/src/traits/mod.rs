pub mod alert_sink;
pub mod capture_provider;
pub mod detector;
pub mod session_control;

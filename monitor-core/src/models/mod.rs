pub mod alert;
pub mod config;
pub mod detection;
pub mod device;
pub mod diagnostics;
pub mod error;
pub mod state;

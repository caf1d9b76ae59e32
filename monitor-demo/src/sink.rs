use std::io::{self, Write};

use parking_lot::Mutex;
use serde::Serialize;

use monitor_core::{Alert, AlertLevel, AlertSink, DispatchError, SessionState};

// -- Event payloads --

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum EventLine<'a> {
    Alert(&'a Alert),
    StateChanged { state: SessionState },
}

/// AlertSink that writes every event as one JSON line, standing in for the
/// toast container of a hosting view.
pub struct EventLogSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl EventLogSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn emit(&self, line: &EventLine<'_>) -> Result<(), DispatchError> {
        let mut out = self.out.lock();
        serde_json::to_writer(&mut *out, line).map_err(|e| DispatchError(e.to_string()))?;
        writeln!(out).map_err(|e| DispatchError(e.to_string()))?;
        out.flush().map_err(|e| DispatchError(e.to_string()))
    }
}

impl AlertSink for EventLogSink {
    fn show(&self, alert: &Alert) -> Result<(), DispatchError> {
        match alert.level {
            AlertLevel::Success => log::info!("{}", alert.message),
            AlertLevel::Error => log::error!("{}", alert.message),
        }
        self.emit(&EventLine::Alert(alert))
    }

    fn on_state_changed(&self, state: SessionState) {
        if let Err(e) = self.emit(&EventLine::StateChanged { state }) {
            log::warn!("failed to write state change: {}", e);
        }
    }
}

use thiserror::Error;

/// Reasons a capture device could not be bound to a session.
///
/// Acquisition is atomic: whenever one of these is returned, no stream was
/// opened and nothing needs releasing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("no compatible capture device")]
    NoDevice,

    #[error("capture device is already in use")]
    DeviceBusy,

    #[error("constraints unsatisfiable: {0}")]
    ConstraintsUnsatisfiable(String),
}

/// Failure reported by an `AlertSink`. Never propagated past the dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("alert dispatch failed: {0}")]
pub struct DispatchError(pub String);

/// Errors surfaced by the public API of this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error("configuration invalid: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_errors_read_as_user_facing_text() {
        assert_eq!(AcquisitionError::PermissionDenied.to_string(), "permission denied");
        assert_eq!(
            AcquisitionError::ConstraintsUnsatisfiable("4096x4096".into()).to_string(),
            "constraints unsatisfiable: 4096x4096"
        );
    }

    #[test]
    fn monitor_error_wraps_acquisition_transparently() {
        let err: MonitorError = AcquisitionError::DeviceBusy.into();
        assert_eq!(err.to_string(), "capture device is already in use");
        assert_eq!(err, MonitorError::Acquisition(AcquisitionError::DeviceBusy));
    }
}

use std::future::Future;

use crate::models::device::{CameraDevice, CaptureConstraints, Frame};
use crate::models::error::AcquisitionError;

/// A live stream opened on a capture device.
///
/// Dropping a stream without calling `stop` must still free the device;
/// `stop` is the synchronous, observable path.
pub trait CaptureStream: Send + 'static {
    /// Read the most recent frame, or None once the stream has stopped.
    fn read_frame(&mut self) -> Option<Frame>;

    /// Stop every underlying track. Idempotent; returns once the device is free.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// Interface for platform-specific camera access.
///
/// Implemented by `SimulatedCamera`; a real backend would wrap the
/// platform's media API behind the same contract.
pub trait CaptureProvider: Send + Sync + 'static {
    type Stream: CaptureStream;

    /// The device this provider opens.
    fn device_info(&self) -> CameraDevice;

    /// Open a stream matching `constraints`.
    ///
    /// May suspend while the platform or the user decides on permission.
    /// Resolves exactly once; on error no stream was opened.
    fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> impl Future<Output = Result<Self::Stream, AcquisitionError>> + Send;
}

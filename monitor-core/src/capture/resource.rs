use std::sync::Arc;

use crate::models::device::{CaptureConstraints, Frame};
use crate::models::error::AcquisitionError;
use crate::models::state::CaptureStatus;
use crate::traits::capture_provider::{CaptureProvider, CaptureStream};

/// Slot owning at most one live capture stream.
///
/// The handle is present iff the status is `Bound`. Releasing is idempotent,
/// and a bound stream is released when the resource is dropped.
pub struct CaptureResource<P: CaptureProvider> {
    provider: Arc<P>,
    handle: Option<P::Stream>,
    status: CaptureStatus,
    last_error: Option<AcquisitionError>,
}

impl<P: CaptureProvider> CaptureResource<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            handle: None,
            status: CaptureStatus::Unbound,
            last_error: None,
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Acquire a stream from the provider and bind it.
    ///
    /// Not retried. On error nothing is bound and the status becomes `Error`.
    pub async fn acquire(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> Result<(), AcquisitionError> {
        if self.is_bound() {
            return Err(AcquisitionError::DeviceBusy);
        }
        let result = self.provider.acquire(constraints).await;
        self.settle(result)
    }

    /// Bind the outcome of a provider acquisition that was awaited elsewhere.
    pub fn settle(
        &mut self,
        result: Result<P::Stream, AcquisitionError>,
    ) -> Result<(), AcquisitionError> {
        match result {
            Ok(mut stream) if self.is_bound() => {
                stream.stop();
                Err(AcquisitionError::DeviceBusy)
            }
            Ok(stream) => {
                log::info!("capture bound on {}", self.provider.device_info().name);
                self.handle = Some(stream);
                self.status = CaptureStatus::Bound;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                if !self.is_bound() {
                    self.status = CaptureStatus::Error;
                }
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Stop and drop the bound stream. Returns whether anything was released.
    pub fn release(&mut self) -> bool {
        match self.handle.take() {
            Some(mut stream) => {
                stream.stop();
                self.status = CaptureStatus::Unbound;
                log::info!("capture released on {}", self.provider.device_info().name);
                true
            }
            None => {
                self.status = CaptureStatus::Unbound;
                false
            }
        }
    }

    pub fn read_frame(&mut self) -> Option<Frame> {
        self.handle.as_mut().and_then(|stream| stream.read_frame())
    }

    pub fn is_bound(&self) -> bool {
        self.status == CaptureStatus::Bound
    }

    pub fn status(&self) -> CaptureStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&AcquisitionError> {
        self.last_error.as_ref()
    }
}

impl<P: CaptureProvider> Drop for CaptureResource<P> {
    fn drop(&mut self) {
        self.release();
    }
}

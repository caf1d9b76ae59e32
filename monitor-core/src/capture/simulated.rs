use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use crate::models::device::{CameraDevice, CaptureConstraints, FacingMode, Frame};
use crate::models::error::AcquisitionError;
use crate::traits::capture_provider::{CaptureProvider, CaptureStream};

/// What the simulated platform answers to a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    Grant,
    Deny,
}

struct CameraShared {
    permission: Mutex<PermissionDecision>,
    decision_delay: Mutex<Duration>,
    connected: AtomicBool,
    in_use: AtomicBool,
    acquire_calls: AtomicUsize,
    release_calls: AtomicUsize,
}

/// In-process camera with scriptable permission, latency and availability.
///
/// Clones share one underlying device, so two sessions built from clones
/// contend for the same exclusive hold.
#[derive(Clone)]
pub struct SimulatedCamera {
    device: CameraDevice,
    shared: Arc<CameraShared>,
}

impl SimulatedCamera {
    pub fn new(device: CameraDevice) -> Self {
        Self {
            device,
            shared: Arc::new(CameraShared {
                permission: Mutex::new(PermissionDecision::Grant),
                decision_delay: Mutex::new(Duration::ZERO),
                connected: AtomicBool::new(true),
                in_use: AtomicBool::new(false),
                acquire_calls: AtomicUsize::new(0),
                release_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// A 720p user-facing camera.
    pub fn integrated() -> Self {
        Self::new(CameraDevice {
            id: "simulated-0".into(),
            name: "Simulated Integrated Camera".into(),
            facing: FacingMode::User,
            max_width: 1280,
            max_height: 720,
        })
    }

    pub fn deny_permission(&self) {
        *self.shared.permission.lock() = PermissionDecision::Deny;
    }

    pub fn grant_permission(&self) {
        *self.shared.permission.lock() = PermissionDecision::Grant;
    }

    /// How long acquisition waits before the permission decision resolves.
    pub fn set_decision_delay(&self, delay: Duration) {
        *self.shared.decision_delay.lock() = delay;
    }

    pub fn set_connected(&self, connected: bool) {
        self.shared.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_in_use(&self) -> bool {
        self.shared.in_use.load(Ordering::SeqCst)
    }

    pub fn acquire_calls(&self) -> usize {
        self.shared.acquire_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.shared.release_calls.load(Ordering::SeqCst)
    }
}

impl CaptureProvider for SimulatedCamera {
    type Stream = SimulatedStream;

    fn device_info(&self) -> CameraDevice {
        self.device.clone()
    }

    fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> impl Future<Output = Result<SimulatedStream, AcquisitionError>> + Send {
        let shared = Arc::clone(&self.shared);
        let device = self.device.clone();
        let constraints = constraints.clone();

        async move {
            shared.acquire_calls.fetch_add(1, Ordering::SeqCst);

            let delay = *shared.decision_delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            if !shared.connected.load(Ordering::SeqCst) {
                return Err(AcquisitionError::NoDevice);
            }
            let permission = *shared.permission.lock();
            if permission == PermissionDecision::Deny {
                return Err(AcquisitionError::PermissionDenied);
            }
            if !device.supports(&constraints) {
                return Err(AcquisitionError::ConstraintsUnsatisfiable(format!(
                    "{}x{} exceeds {}x{}",
                    constraints.width, constraints.height, device.max_width, device.max_height
                )));
            }
            if shared
                .in_use
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return Err(AcquisitionError::DeviceBusy);
            }

            Ok(SimulatedStream {
                shared,
                width: constraints.width,
                height: constraints.height,
                sequence: 0,
                live: true,
            })
        }
    }
}

/// Stream handed out by `SimulatedCamera`. Frames carry no pixel data.
pub struct SimulatedStream {
    shared: Arc<CameraShared>,
    width: u32,
    height: u32,
    sequence: u64,
    live: bool,
}

impl CaptureStream for SimulatedStream {
    fn read_frame(&mut self) -> Option<Frame> {
        if !self.live {
            return None;
        }
        self.sequence += 1;
        Some(Frame {
            sequence: self.sequence,
            width: self.width,
            height: self.height,
            captured_at: Utc::now(),
        })
    }

    fn stop(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        self.shared.in_use.store(false, Ordering::SeqCst);
        self.shared.release_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for SimulatedStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_advance_until_stopped() {
        let camera = SimulatedCamera::integrated();
        let mut stream = camera.acquire(&CaptureConstraints::default()).await.unwrap();

        assert_eq!(stream.read_frame().map(|f| f.sequence), Some(1));
        let frame = stream.read_frame().unwrap();
        assert_eq!(frame.sequence, 2);
        assert_eq!((frame.width, frame.height), (640, 480));

        stream.stop();
        assert!(!stream.is_live());
        assert!(stream.read_frame().is_none());
    }

    #[tokio::test]
    async fn stop_is_counted_once() {
        let camera = SimulatedCamera::integrated();
        let mut stream = camera.acquire(&CaptureConstraints::default()).await.unwrap();
        stream.stop();
        stream.stop();
        drop(stream);
        assert_eq!(camera.release_calls(), 1);
    }

    #[tokio::test]
    async fn disconnected_camera_reports_no_device() {
        let camera = SimulatedCamera::integrated();
        camera.set_connected(false);
        let err = camera.acquire(&CaptureConstraints::default()).await.err();
        assert_eq!(err, Some(AcquisitionError::NoDevice));
        assert!(!camera.is_in_use());
    }

    #[tokio::test]
    async fn oversized_request_is_unsatisfiable() {
        let camera = SimulatedCamera::integrated();
        let constraints = CaptureConstraints {
            width: 3840,
            height: 2160,
            ..Default::default()
        };
        let err = camera.acquire(&constraints).await.err();
        assert!(matches!(err, Some(AcquisitionError::ConstraintsUnsatisfiable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn decision_delay_suspends_acquire() {
        let camera = SimulatedCamera::integrated();
        camera.set_decision_delay(Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        let stream = camera.acquire(&CaptureConstraints::default()).await;
        assert!(stream.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(camera.acquire_calls(), 1);
    }
}

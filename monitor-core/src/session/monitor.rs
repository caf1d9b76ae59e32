use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::alerts::dispatcher::AlertDispatcher;
use crate::capture::resource::CaptureResource;
use crate::detection::poller::DetectionPoller;
use crate::detection::roster::RosterDetector;
use crate::models::config::MonitorConfig;
use crate::models::detection::DetectionOutcome;
use crate::models::diagnostics::SessionDiagnostics;
use crate::models::error::{AcquisitionError, MonitorError};
use crate::models::state::{SessionState, SessionStatus};
use crate::traits::alert_sink::AlertSink;
use crate::traits::capture_provider::{CaptureProvider, CaptureStream};
use crate::traits::detector::Detector;
use crate::traits::session_control::SessionControl;

/// Mutable session state, protected by `parking_lot::Mutex`.
struct SessionCore<P: CaptureProvider> {
    state: SessionState,
    capture: CaptureResource<P>,
    /// Bumped by every start and stop; an acquisition that resolves under an
    /// older generation was overtaken by a stop.
    generation: u64,
    diagnostics: SessionDiagnostics,
}

// Lock order: core → poller → poller gate. A tick holds the gate and takes
// core only while the session is active, which never overlaps a transition
// that holds core and starts the poller.
struct SessionInner<P: CaptureProvider, D: Detector> {
    config: MonitorConfig,
    core: Mutex<SessionCore<P>>,
    poller: Mutex<DetectionPoller>,
    detector: Mutex<D>,
    dispatcher: AlertDispatcher,
}

/// Monitoring session orchestrator.
///
/// Owns one capture resource and one detection poller. Every way out of a
/// session (explicit `stop`, drop of the session, failed acquisition)
/// cancels the poller and releases the camera exactly once.
///
/// ```text
/// start → [Provider::acquire] → bind → [DetectionPoller] → tick
///                                                         ├→ read frame
///                                                         ├→ Detector::detect
///                                                         └→ AlertDispatcher::notify
/// ```
///
/// `start` spawns onto the current Tokio runtime and must be called from
/// within one.
pub struct MonitoringSession<P: CaptureProvider, D: Detector> {
    inner: Arc<SessionInner<P, D>>,
}

impl<P: CaptureProvider> MonitoringSession<P, RosterDetector> {
    /// Session using the stand-in roster detector from `config.detection`.
    pub fn with_roster(
        provider: P,
        sink: Arc<dyn AlertSink>,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        let detector = RosterDetector::new(&config.detection);
        Self::new(provider, detector, sink, config)
    }
}

impl<P: CaptureProvider, D: Detector> MonitoringSession<P, D> {
    pub fn new(
        provider: P,
        detector: D,
        sink: Arc<dyn AlertSink>,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        config.validate().map_err(MonitorError::Configuration)?;

        let dispatcher = AlertDispatcher::new(sink, &config.alerts);
        let core = SessionCore {
            state: SessionState::Idle,
            capture: CaptureResource::new(Arc::new(provider)),
            generation: 0,
            diagnostics: SessionDiagnostics::default(),
        };

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                core: Mutex::new(core),
                poller: Mutex::new(DetectionPoller::new()),
                detector: Mutex::new(detector),
                dispatcher,
            }),
        })
    }

    /// Request monitoring. Transitions: idle → acquiring, then active once the
    /// camera is bound, or back to idle if acquisition fails.
    ///
    /// A no-op unless idle, so repeated calls never acquire twice.
    pub fn start(&self) {
        let (generation, provider) = {
            let mut core = self.inner.core.lock();
            if !core.state.is_idle() {
                log::debug!("start ignored while {}", core.state);
                return;
            }
            core.generation += 1;
            core.diagnostics.acquire_attempts += 1;
            core.state = SessionState::Acquiring;
            (core.generation, Arc::clone(core.capture.provider()))
        };
        self.inner.dispatcher.state_changed(SessionState::Acquiring);
        log::info!("acquiring {}", provider.device_info().name);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = provider.acquire(&inner.config.constraints).await;
            inner.complete_acquire(generation, result);
        });
    }

    /// Stop monitoring. Transitions: acquiring/active → stopping → idle.
    ///
    /// A no-op when idle or already stopping. Stopping during acquisition
    /// is remembered: if the camera is granted afterwards it is released
    /// straight away and the session stays idle.
    pub fn stop(&self) {
        {
            let mut core = self.inner.core.lock();
            if matches!(core.state, SessionState::Idle | SessionState::Stopping) {
                return;
            }
            core.generation += 1;
            core.state = SessionState::Stopping;
        }
        self.inner.dispatcher.state_changed(SessionState::Stopping);

        if self.inner.poller.lock().stop() {
            log::debug!("detection poller stopped");
        }

        {
            let mut core = self.inner.core.lock();
            if core.capture.release() {
                core.diagnostics.releases += 1;
            }
            core.state = SessionState::Idle;
        }
        self.inner.dispatcher.state_changed(SessionState::Idle);
        log::info!("monitoring stopped");
    }

    pub fn current_state(&self) -> SessionState {
        self.inner.core.lock().state
    }

    /// Whether a capture stream is bound right now.
    pub fn is_capturing(&self) -> bool {
        self.inner.core.lock().capture.is_bound()
    }

    pub fn status(&self) -> SessionStatus {
        let core = self.inner.core.lock();
        SessionStatus {
            state: core.state,
            monitoring: matches!(core.state, SessionState::Acquiring | SessionState::Active),
            camera_connected: core.capture.is_bound(),
        }
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        let mut diagnostics = self.inner.core.lock().diagnostics.clone();
        diagnostics.alerts_shown = self.inner.dispatcher.shown();
        diagnostics.alerts_suppressed = self.inner.dispatcher.suppressed();
        diagnostics
    }

    /// Most recent acquisition failure, cleared by the next successful bind.
    pub fn last_error(&self) -> Option<AcquisitionError> {
        self.inner.core.lock().capture.last_error().cloned()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }
}

impl<P: CaptureProvider, D: Detector> SessionControl for MonitoringSession<P, D> {
    fn start(&self) {
        MonitoringSession::start(self)
    }

    fn stop(&self) {
        MonitoringSession::stop(self)
    }

    fn current_state(&self) -> SessionState {
        MonitoringSession::current_state(self)
    }

    fn is_capturing(&self) -> bool {
        MonitoringSession::is_capturing(self)
    }

    fn status(&self) -> SessionStatus {
        MonitoringSession::status(self)
    }
}

impl<P: CaptureProvider, D: Detector> Drop for MonitoringSession<P, D> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<P: CaptureProvider, D: Detector> SessionInner<P, D> {
    /// Settle an acquisition started under `generation`.
    fn complete_acquire(
        self: &Arc<Self>,
        generation: u64,
        result: Result<P::Stream, AcquisitionError>,
    ) {
        let mut core = self.core.lock();

        if core.generation != generation || core.state != SessionState::Acquiring {
            match result {
                Ok(mut stream) => {
                    log::info!("camera granted after stop, releasing");
                    if core.capture.is_bound() {
                        stream.stop();
                    } else if core.capture.settle(Ok(stream)).is_ok() {
                        core.capture.release();
                    }
                    core.diagnostics.releases += 1;
                }
                Err(err) => {
                    core.diagnostics.acquire_failures += 1;
                    drop(core);
                    log::warn!("camera acquisition failed after stop: {}", err);
                    self.dispatcher.notify_error(&err);
                }
            }
            return;
        }

        match core.capture.settle(result) {
            Ok(()) => {
                core.state = SessionState::Active;
                let weak = Arc::downgrade(self);
                self.poller
                    .lock()
                    .start(self.config.poll_interval(), move || tick(&weak));
                drop(core);
                self.dispatcher.state_changed(SessionState::Active);
                log::info!("monitoring active, polling every {}ms", self.config.poll_interval_ms);
            }
            Err(err) => {
                core.diagnostics.acquire_failures += 1;
                core.state = SessionState::Idle;
                drop(core);
                log::warn!("camera acquisition failed: {}", err);
                self.dispatcher.notify_error(&err);
                self.dispatcher.state_changed(SessionState::Idle);
            }
        }
    }

    /// One poll tick: read the latest frame, detect, forward any outcome.
    fn run_tick(&self) -> Option<DetectionOutcome> {
        let frame = {
            let mut core = self.core.lock();
            if !core.state.is_active() {
                return None;
            }
            core.diagnostics.ticks += 1;
            core.capture.read_frame()
        };

        let outcome = self.detector.lock().detect(frame.as_ref())?;
        self.core.lock().diagnostics.detections += 1;
        log::debug!("detected {}", outcome.subject_id);
        self.dispatcher.notify(&outcome);
        Some(outcome)
    }
}

fn tick<P, D>(inner: &Weak<SessionInner<P, D>>) -> Option<DetectionOutcome>
where
    P: CaptureProvider,
    D: Detector,
{
    inner.upgrade()?.run_tick()
}

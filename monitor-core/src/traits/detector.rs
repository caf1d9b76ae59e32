use crate::models::detection::DetectionOutcome;
use crate::models::device::Frame;

/// One detection step, run once per poll tick.
///
/// Each call is independent of previous ones as far as the poller is
/// concerned; `None` means nothing was detected this tick.
pub trait Detector: Send + 'static {
    fn detect(&mut self, frame: Option<&Frame>) -> Option<DetectionOutcome>;
}

impl<F> Detector for F
where
    F: FnMut(Option<&Frame>) -> Option<DetectionOutcome> + Send + 'static,
{
    fn detect(&mut self, frame: Option<&Frame>) -> Option<DetectionOutcome> {
        self(frame)
    }
}

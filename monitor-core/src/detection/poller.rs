use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::models::detection::DetectionOutcome;

/// Shared between the poller and its timer task. Every tick runs while
/// holding this lock, which is what makes `stop` race-free.
#[derive(Default)]
struct TickGate {
    epoch: u64,
    running: bool,
    ticks: u64,
    detections: u64,
}

/// Cooperative periodic scheduler for the detection step.
///
/// The first tick fires one full interval after `start`, never immediately.
/// Ticks are serialized. Once `stop` returns no further tick runs, even if
/// its timer had already fired.
pub struct DetectionPoller {
    gate: Arc<Mutex<TickGate>>,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl DetectionPoller {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Mutex::new(TickGate::default())),
            cancel: None,
            task: None,
        }
    }

    /// Begin invoking `tick` every `interval`. Replaces any running schedule.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(&mut self, interval: Duration, tick: F)
    where
        F: FnMut() -> Option<DetectionOutcome> + Send + 'static,
    {
        self.stop();

        let epoch = {
            let mut gate = self.gate.lock();
            gate.epoch += 1;
            gate.running = true;
            gate.epoch
        };

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let gate = Arc::clone(&self.gate);
        let first_tick = Instant::now() + interval;

        let task = tokio::spawn(async move {
            let mut tick = tick;
            let mut ticker = tokio::time::interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if !run_tick(&gate, epoch, &mut tick) {
                            break;
                        }
                    }
                }
            }
            log::debug!("detection poller epoch {} finished", epoch);
        });

        log::debug!("detection poller epoch {} started ({:?} interval)", epoch, interval);
        self.cancel = Some(cancel);
        self.task = Some(task);
    }

    /// Cancel all pending and future ticks. Returns whether a schedule was running.
    ///
    /// Waits for a tick that is executing right now to finish.
    pub fn stop(&mut self) -> bool {
        let was_running = {
            let mut gate = self.gate.lock();
            std::mem::replace(&mut gate.running, false)
        };
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.gate.lock().running
    }

    /// Ticks executed over the poller's lifetime.
    pub fn ticks(&self) -> u64 {
        self.gate.lock().ticks
    }

    /// Ticks that produced an outcome.
    pub fn detections(&self) -> u64 {
        self.gate.lock().detections
    }
}

impl Default for DetectionPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DetectionPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run one tick if `epoch` is still the live schedule. Returns false when the
/// schedule has been stopped or replaced.
fn run_tick<F>(gate: &Mutex<TickGate>, epoch: u64, tick: &mut F) -> bool
where
    F: FnMut() -> Option<DetectionOutcome>,
{
    let mut gate = gate.lock();
    if !gate.running || gate.epoch != epoch {
        return false;
    }
    gate.ticks += 1;
    if tick().is_some() {
        gate.detections += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn counting_tick(
        counter: &Arc<AtomicU64>,
    ) -> impl FnMut() -> Option<DetectionOutcome> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    /// Let simulated time pass in 100ms steps so every timer fires in order.
    async fn run_for(ms: u64) {
        for _ in 0..ms / 100 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval_without_immediate_tick() {
        let counter = Arc::new(AtomicU64::new(0));
        let mut poller = DetectionPoller::new();
        poller.start(Duration::from_millis(2000), counting_tick(&counter));

        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        run_for(1900).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        run_for(8100).await;
        assert_eq!(counter.load(Ordering::SeqCst), 5);
        assert_eq!(poller.ticks(), 5);
        assert!(poller.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_future_ticks() {
        let counter = Arc::new(AtomicU64::new(0));
        let mut poller = DetectionPoller::new();
        poller.start(Duration::from_millis(500), counting_tick(&counter));

        run_for(1200).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        assert!(poller.stop());
        assert!(!poller.is_running());
        run_for(5000).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!poller.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_schedule() {
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));
        let mut poller = DetectionPoller::new();

        poller.start(Duration::from_millis(1000), counting_tick(&first));
        run_for(1500).await;
        poller.start(Duration::from_millis(1000), counting_tick(&second));
        run_for(3000).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 3);
        assert_eq!(poller.ticks(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn none_results_are_not_detections() {
        let mut calls = 0u32;
        let mut poller = DetectionPoller::new();
        poller.start(Duration::from_millis(100), move || {
            calls += 1;
            (calls == 2).then(|| DetectionOutcome::new("Jane Smith"))
        });

        run_for(300).await;
        assert_eq!(poller.ticks(), 3);
        assert_eq!(poller.detections(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn no_tick_runs_after_stop_returns() {
        let counter = Arc::new(AtomicU64::new(0));
        let slow = Arc::clone(&counter);
        let mut poller = DetectionPoller::new();
        poller.start(Duration::from_millis(5), move || {
            std::thread::sleep(Duration::from_millis(2));
            slow.fetch_add(1, Ordering::SeqCst);
            None
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        poller.stop();
        let at_stop = counter.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(counter.load(Ordering::SeqCst), at_stop);
    }
}

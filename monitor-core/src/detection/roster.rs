use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::config::DetectionConfig;
use crate::models::detection::DetectionOutcome;
use crate::models::device::Frame;
use crate::traits::detector::Detector;

/// Stand-in detector: on each tick with a frame available, reports a
/// detection with fixed probability, naming a subject drawn uniformly from
/// the roster. Ticks are independent of one another.
pub struct RosterDetector {
    roster: Vec<String>,
    probability: f64,
    rng: StdRng,
}

impl RosterDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            roster: config.roster.clone(),
            probability: config.probability.clamp(0.0, 1.0),
            rng,
        }
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }
}

impl Detector for RosterDetector {
    fn detect(&mut self, frame: Option<&Frame>) -> Option<DetectionOutcome> {
        // Nothing to look at until the stream delivers a frame.
        frame?;
        if self.roster.is_empty() || !self.rng.random_bool(self.probability) {
            return None;
        }
        let index = self.rng.random_range(0..self.roster.len());
        Some(DetectionOutcome::new(self.roster[index].clone()))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, pointed at the operator.
    #[default]
    User,
    Environment,
}

/// Resolution and orientation requested from the capture provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConstraints {
    pub width: u32,
    pub height: u32,
    pub facing_preference: FacingMode,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            facing_preference: FacingMode::User,
        }
    }
}

/// A camera known to a capture provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub facing: FacingMode,
    pub max_width: u32,
    pub max_height: u32,
}

impl CameraDevice {
    pub fn supports(&self, constraints: &CaptureConstraints) -> bool {
        constraints.width <= self.max_width && constraints.height <= self.max_height
    }
}

/// One frame read from a bound capture stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
}

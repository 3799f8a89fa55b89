//! Calibration baseline for gaze and head position

use serde::{Deserialize, Serialize};

/// User's neutral gaze and head position (normalized frame coordinates)
///
/// Replaced wholesale by a calibration; never partially updated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    pub gaze_center: f64,
    pub head_center_x: f64,
    pub head_center_y: f64,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            gaze_center: 0.5,
            head_center_x: 0.5,
            head_center_y: 0.5,
        }
    }
}

/// Raw gaze/head sample reported while in calibration mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub gaze_x: f64,
    pub head_x: f64,
    pub head_y: f64,
}

impl From<CalibrationSample> for CalibrationProfile {
    fn from(sample: CalibrationSample) -> Self {
        Self {
            gaze_center: sample.gaze_x,
            head_center_x: sample.head_x,
            head_center_y: sample.head_y,
        }
    }
}

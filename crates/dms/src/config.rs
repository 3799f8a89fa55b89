//! Threshold configuration
//!
//! One flat set of numeric thresholds read by every classifier. Values are
//! not range-checked; sensible values are the caller's responsibility.

use crate::DmsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix for threshold overrides (`DMS_EAR_THRESHOLD`, ...)
pub const ENV_PREFIX: &str = "DMS";

/// Detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Eye aspect ratio below which an eye counts as closed
    pub ear_threshold: f64,

    /// Consecutive closed frames before the "eyes closed" warning
    pub eye_closed_frames_threshold: u32,

    /// Blinks per minute at or above which the blink-rate warning fires
    pub blink_rate_threshold: u32,

    /// Mouth aspect ratio above which the mouth counts as open wide
    pub mar_threshold: f64,

    /// Open-mouth frames before the yawning warning
    #[serde(alias = "yawn_threshold")]
    pub yawn_frames_threshold: u32,

    /// Gaze offset from baseline that counts as a deviation (normalized)
    pub gaze_deviation_threshold: f64,

    /// Head offset from baseline that counts as a turn, tilt or droop (normalized)
    pub head_turn_threshold: f64,

    /// Radius around the face center for the hand-near-face check (pixels)
    pub hand_near_face_px: f64,

    /// How long an alert stays displayed after it was raised (seconds)
    #[serde(alias = "alert_duration")]
    pub alert_duration_secs: u64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.14,
            eye_closed_frames_threshold: 9,
            blink_rate_threshold: 5,
            mar_threshold: 0.6,
            yawn_frames_threshold: 3,
            gaze_deviation_threshold: 0.05,
            head_turn_threshold: 0.08,
            hand_near_face_px: 200.0,
            alert_duration_secs: 3,
        }
    }
}

impl ThresholdConfig {
    /// Create strict config (earlier alerts)
    pub fn strict() -> Self {
        Self {
            ear_threshold: 0.16,
            eye_closed_frames_threshold: 6,
            yawn_frames_threshold: 2,
            gaze_deviation_threshold: 0.04,
            head_turn_threshold: 0.06,
            ..Default::default()
        }
    }

    /// Create lenient config (later alerts)
    pub fn lenient() -> Self {
        Self {
            ear_threshold: 0.12,
            eye_closed_frames_threshold: 15,
            yawn_frames_threshold: 6,
            gaze_deviation_threshold: 0.08,
            head_turn_threshold: 0.12,
            ..Default::default()
        }
    }

    /// Load thresholds: defaults, then an optional file, then `DMS_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self, DmsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parse thresholds from a TOML document (missing keys take defaults)
    pub fn from_toml_str(toml: &str) -> Result<Self, DmsError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Copy of this config with the fields present in `update` replaced
    pub fn apply(&self, update: &ThresholdUpdate) -> Self {
        Self {
            ear_threshold: update.ear_threshold.unwrap_or(self.ear_threshold),
            eye_closed_frames_threshold: update
                .eye_closed_frames_threshold
                .unwrap_or(self.eye_closed_frames_threshold),
            blink_rate_threshold: update.blink_rate_threshold.unwrap_or(self.blink_rate_threshold),
            mar_threshold: update.mar_threshold.unwrap_or(self.mar_threshold),
            yawn_frames_threshold: update
                .yawn_frames_threshold
                .unwrap_or(self.yawn_frames_threshold),
            gaze_deviation_threshold: update
                .gaze_deviation_threshold
                .unwrap_or(self.gaze_deviation_threshold),
            head_turn_threshold: update.head_turn_threshold.unwrap_or(self.head_turn_threshold),
            hand_near_face_px: update.hand_near_face_px.unwrap_or(self.hand_near_face_px),
            alert_duration_secs: update.alert_duration_secs.unwrap_or(self.alert_duration_secs),
        }
    }

    /// Alert display window
    pub fn alert_duration(&self) -> Duration {
        Duration::from_secs(self.alert_duration_secs)
    }
}

/// Partial threshold update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdUpdate {
    pub ear_threshold: Option<f64>,
    pub eye_closed_frames_threshold: Option<u32>,
    pub blink_rate_threshold: Option<u32>,
    pub mar_threshold: Option<f64>,
    #[serde(alias = "yawn_threshold")]
    pub yawn_frames_threshold: Option<u32>,
    pub gaze_deviation_threshold: Option<f64>,
    pub head_turn_threshold: Option<f64>,
    pub hand_near_face_px: Option<f64>,
    #[serde(alias = "alert_duration")]
    pub alert_duration_secs: Option<u64>,
}

impl ThresholdUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

//! DMS alerts and per-frame detection output

use crate::calibration::CalibrationSample;
use crate::landmarks::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude band of a graded condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Mild,
    Moderate,
    Severe,
}

impl Grade {
    /// Grade an offset: below `mild_below` is mild, below `moderate_below` moderate
    pub fn from_offset(offset: f64, mild_below: f64, moderate_below: f64) -> Self {
        if offset < mild_below {
            Grade::Mild
        } else if offset < moderate_below {
            Grade::Moderate
        } else {
            Grade::Severe
        }
    }

    /// Ordinal 1..=3
    pub fn ordinal(self) -> u8 {
        match self {
            Grade::Mild => 1,
            Grade::Moderate => 2,
            Grade::Severe => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Grade::Mild => "Mild",
            Grade::Moderate => "Moderate",
            Grade::Severe => "Severe",
        }
    }
}

/// Reported alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Warning,
}

impl From<Grade> for Severity {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Mild => Severity::Mild,
            Grade::Moderate => Severity::Moderate,
            Grade::Severe => Severity::Severe,
        }
    }
}

/// Display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertColor {
    White,
    Yellow,
    Red,
}

impl From<Grade> for AlertColor {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Mild => AlertColor::White,
            Grade::Moderate => AlertColor::Yellow,
            Grade::Severe => AlertColor::Red,
        }
    }
}

/// Coarse category used by persistence and session tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Drowsiness,
    Distraction,
}

/// DMS alert identity
///
/// Two alerts are the same alert exactly when their kinds are equal; graded
/// kinds with different grades are distinct alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "grade", rename_all = "snake_case")]
pub enum DmsAlert {
    /// Eyes closed past the configured frame count
    EyesClosed,
    /// Eyes closed for more than 30 frames
    EyesClosedTooLong,
    /// Blink count over the last minute reached the threshold
    HighBlinkRate,
    Yawning,
    GazeDeviation(Grade),
    HeadTurn(Grade),
    /// Head above the baseline
    LookingUp(Grade),
    /// Head below the baseline
    HeadDroop(Grade),
    /// Hand held at the ear
    PhoneCall,
    HandNearFace,
    Texting,
    Drowsiness(Grade),
    Distraction(Grade),
}

impl DmsAlert {
    /// Display text
    pub fn message(&self) -> String {
        match self {
            DmsAlert::EyesClosed => "Warning: Eyes Closed".to_string(),
            DmsAlert::EyesClosedTooLong => "Alert: Eyes Closed Too Long".to_string(),
            DmsAlert::HighBlinkRate => "High Blinking Rate".to_string(),
            DmsAlert::Yawning => "Warning: Yawning".to_string(),
            DmsAlert::GazeDeviation(g) => format!("{} Gaze Deviation", g.label()),
            DmsAlert::HeadTurn(g) => format!("{} Head Turn", g.label()),
            DmsAlert::LookingUp(g) => format!("{} Looking Upward", g.label()),
            DmsAlert::HeadDroop(Grade::Mild) => "Head drooping symptom".to_string(),
            DmsAlert::HeadDroop(Grade::Moderate) => "Head drooping started".to_string(),
            DmsAlert::HeadDroop(Grade::Severe) => "Head drooped".to_string(),
            DmsAlert::PhoneCall => "Likely mobile call".to_string(),
            DmsAlert::HandNearFace => "Hand near the face".to_string(),
            DmsAlert::Texting => "Possible texting observed".to_string(),
            DmsAlert::Drowsiness(g) => format!("{} DROWSINESS Observed", g.label()),
            DmsAlert::Distraction(g) => format!("{} DISTRACTION Observed", g.label()),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DmsAlert::EyesClosedTooLong => Severity::Severe,
            DmsAlert::EyesClosed
            | DmsAlert::HighBlinkRate
            | DmsAlert::Yawning
            | DmsAlert::PhoneCall
            | DmsAlert::HandNearFace
            | DmsAlert::Texting => Severity::Warning,
            DmsAlert::GazeDeviation(g)
            | DmsAlert::HeadTurn(g)
            | DmsAlert::LookingUp(g)
            | DmsAlert::HeadDroop(g)
            | DmsAlert::Drowsiness(g)
            | DmsAlert::Distraction(g) => (*g).into(),
        }
    }

    pub fn color(&self) -> AlertColor {
        match self {
            DmsAlert::EyesClosed | DmsAlert::Yawning => AlertColor::White,
            DmsAlert::EyesClosedTooLong => AlertColor::Yellow,
            DmsAlert::HighBlinkRate
            | DmsAlert::PhoneCall
            | DmsAlert::HandNearFace
            | DmsAlert::Texting
            | DmsAlert::HeadDroop(_) => AlertColor::Red,
            DmsAlert::GazeDeviation(g)
            | DmsAlert::HeadTurn(g)
            | DmsAlert::LookingUp(g)
            | DmsAlert::Drowsiness(g)
            | DmsAlert::Distraction(g) => (*g).into(),
        }
    }

    pub fn category(&self) -> AlertCategory {
        match self {
            DmsAlert::EyesClosed
            | DmsAlert::EyesClosedTooLong
            | DmsAlert::HighBlinkRate
            | DmsAlert::Yawning
            | DmsAlert::HeadDroop(_)
            | DmsAlert::Drowsiness(_) => AlertCategory::Drowsiness,
            DmsAlert::GazeDeviation(_)
            | DmsAlert::HeadTurn(_)
            | DmsAlert::LookingUp(_)
            | DmsAlert::PhoneCall
            | DmsAlert::HandNearFace
            | DmsAlert::Texting
            | DmsAlert::Distraction(_) => AlertCategory::Distraction,
        }
    }
}

impl fmt::Display for DmsAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// An alert as reported in a frame's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub kind: DmsAlert,
    pub message: String,
    pub severity: Severity,
    pub color: AlertColor,
    /// When the alert was last raised (milliseconds, caller clock)
    pub raised_at_ms: u64,
    /// Raised by this frame, as opposed to carried over from an earlier one
    pub fresh: bool,
}

impl AlertRecord {
    pub fn new(kind: DmsAlert, raised_at_ms: u64, fresh: bool) -> Self {
        Self {
            kind,
            message: kind.message(),
            severity: kind.severity(),
            color: kind.color(),
            raised_at_ms,
            fresh,
        }
    }
}

/// Per-frame driver state flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverStates {
    pub eyes_closed: bool,
    /// A blink ended this frame
    pub blink: bool,
    pub yawning: bool,
    pub gaze_deviation: bool,
    pub head_turn: bool,
    pub head_tilt_up: bool,
    pub head_droop: bool,
    pub phone_use: bool,
    pub hand_near_face: bool,
    pub texting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drowsiness: Option<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distraction: Option<Grade>,
}

/// Per-frame numeric metrics (present only when a face was seen)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_ear: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mar: Option<f64>,
    /// Mean of the recent MAR history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mar_mean: Option<f64>,
    /// Blinks in the current one-minute window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink_count: Option<u32>,
}

/// Complete per-frame result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutput {
    /// Live alerts: fresh ones first, then carried-over ones
    pub alerts: Vec<AlertRecord>,

    pub states: DriverStates,

    pub metrics: FrameMetrics,

    /// Engine is waiting for a calibration
    pub calibration_mode: bool,

    /// Raw gaze/head sample, reported while in calibration mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_data: Option<CalibrationSample>,

    /// Echoed face geometry (empty when no face)
    pub face_landmarks: Vec<Point>,

    /// Echoed hand geometry
    pub hand_landmarks: Vec<Vec<Point>>,
}

impl DetectionOutput {
    /// Check if any alerts are active
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Alerts raised by this frame
    pub fn fresh_alerts(&self) -> impl Iterator<Item = &AlertRecord> {
        self.alerts.iter().filter(|a| a.fresh)
    }

    /// Whether `kind` is among the live alerts
    pub fn contains(&self, kind: DmsAlert) -> bool {
        self.alerts.iter().any(|a| a.kind == kind)
    }

    /// Get highest severity alert
    pub fn highest_severity_alert(&self) -> Option<&AlertRecord> {
        let rank = |s: Severity| match s {
            Severity::Severe => 3,
            Severity::Moderate => 2,
            Severity::Warning => 1,
            Severity::Mild => 0,
        };
        self.alerts.iter().max_by_key(|a| rank(a.severity))
    }
}

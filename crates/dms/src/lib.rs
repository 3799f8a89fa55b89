//! Driver Monitoring System (DMS)
//!
//! Per-frame driver alertness analysis from face and hand landmarks:
//! - Eye closure and blink rate (drowsiness)
//! - Yawning
//! - Gaze and head deviation from a calibrated baseline
//! - Phone use, hand near face, texting (distraction)
//! - Compound drowsiness/distraction grading
//!
//! One [`DmsModule`] serves one monitoring session. Frames must be fed
//! sequentially; independent sessions can run in parallel.

pub mod analysis;
pub mod calibration;
pub mod compound;
pub mod config;
pub mod deviation;
pub mod geometry;
pub mod hands;
pub mod landmarks;
pub mod state;

pub use analysis::{
    AlertCategory, AlertColor, AlertRecord, DetectionOutput, DmsAlert, DriverStates,
    FrameMetrics, Grade, Severity,
};
pub use calibration::{CalibrationProfile, CalibrationSample};
pub use crate::config::{ThresholdConfig, ThresholdUpdate};
pub use landmarks::{FaceLandmarks, HandLandmarks, LandmarkFrame, Point};
pub use state::{DriverState, EyeClosure};

use alerting::ActiveAlertSet;
use compound::FrameSignals;
use hands::FaceContact;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Keypoints missing: expected {expected} face landmarks, got {actual}")]
    KeypointsMissing { expected: usize, actual: usize },
}

impl From<::config::ConfigError> for DmsError {
    fn from(e: ::config::ConfigError) -> Self {
        DmsError::Config(e.to_string())
    }
}

/// Driver monitoring module (one per monitoring session)
pub struct DmsModule {
    thresholds: Arc<ThresholdConfig>,
    calibration: CalibrationProfile,
    calibration_mode: bool,
    state: DriverState,
    active_alerts: ActiveAlertSet<DmsAlert>,
}

impl DmsModule {
    /// Create a new DMS module with its own thresholds
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self::with_shared_thresholds(Arc::new(thresholds))
    }

    /// Create a DMS module reading a threshold snapshot shared with other sessions
    pub fn with_shared_thresholds(thresholds: Arc<ThresholdConfig>) -> Self {
        Self {
            active_alerts: ActiveAlertSet::new(thresholds.alert_duration()),
            thresholds,
            calibration: CalibrationProfile::default(),
            calibration_mode: true,
            state: DriverState::default(),
        }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Swap in a new threshold snapshot (takes effect from the next frame)
    pub fn update_thresholds(&mut self, thresholds: Arc<ThresholdConfig>) {
        info!("Updating DMS thresholds: {:?}", thresholds);
        self.active_alerts.set_window(thresholds.alert_duration());
        self.thresholds = thresholds;
    }

    /// Set the neutral gaze/head baseline and leave calibration mode
    pub fn calibrate(&mut self, profile: CalibrationProfile) {
        info!(
            "Calibrated: gaze_center={:.3} head_center=({:.3}, {:.3})",
            profile.gaze_center, profile.head_center_x, profile.head_center_y
        );
        self.calibration = profile;
        self.calibration_mode = false;
    }

    pub fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }

    /// Still waiting for a calibration
    pub fn is_calibrating(&self) -> bool {
        self.calibration_mode
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Reset driver state and live alerts (on session start)
    ///
    /// Calibration is kept.
    pub fn reset_state(&mut self) {
        debug!("Resetting DMS state");
        self.state.reset();
        self.active_alerts.clear();
    }

    /// Analyze a single frame
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> DetectionOutput {
        let thresholds = Arc::clone(&self.thresholds);
        let now = frame.timestamp_ms;
        let (w, h) = (frame.width, frame.height);

        let mut output = DetectionOutput {
            calibration_mode: self.calibration_mode,
            ..Default::default()
        };
        let mut raised = Vec::new();
        let mut signals = FrameSignals::default();

        if let Some(face) = &frame.face {
            self.analyze_face(face, frame, &thresholds, &mut output, &mut raised, &mut signals);
        }

        let present_hands: Vec<&HandLandmarks> =
            frame.hands.iter().filter(|h| !h.is_empty()).collect();
        for &hand in &present_hands {
            if let Some(face) = &frame.face {
                match hands::face_contact(face, hand, w, h, thresholds.hand_near_face_px) {
                    Some(FaceContact::PhoneCall) => {
                        raised.push(DmsAlert::PhoneCall);
                        output.states.phone_use = true;
                        signals.hands_busy = true;
                    }
                    Some(FaceContact::NearFace) => {
                        raised.push(DmsAlert::HandNearFace);
                        output.states.hand_near_face = true;
                        signals.hands_busy = true;
                    }
                    None => {}
                }
            }
            output.hand_landmarks.push(hand.points().to_vec());
        }

        if !self.calibration_mode && hands::is_texting(&present_hands) {
            raised.push(DmsAlert::Texting);
            output.states.texting = true;
            signals.hands_busy = true;
        }

        let compound = compound::assess(&signals);
        output.states.drowsiness = compound.drowsiness;
        output.states.distraction = compound.distraction;
        raised.extend(compound.alerts);

        output.alerts = self.merge_alerts(raised, now);
        output
    }

    /// Face-dependent metrics and classifiers
    fn analyze_face(
        &mut self,
        face: &FaceLandmarks,
        frame: &LandmarkFrame,
        thresholds: &ThresholdConfig,
        output: &mut DetectionOutput,
        raised: &mut Vec<DmsAlert>,
        signals: &mut FrameSignals,
    ) {
        let (w, h) = (frame.width, frame.height);

        // Eye closure needs both a low EAR and a missing or low iris
        let avg_ear = geometry::average_ear(face, w, h);
        output.metrics.avg_ear = Some(avg_ear);

        let eyes_closed = avg_ear < thresholds.ear_threshold && geometry::iris_missing_or_low(face);
        let eyes = self.state.observe_eyes(eyes_closed, thresholds.eye_closed_frames_threshold);
        match eyes.closure {
            EyeClosure::Severe => raised.push(DmsAlert::EyesClosedTooLong),
            EyeClosure::Warning => raised.push(DmsAlert::EyesClosed),
            EyeClosure::Open => {}
        }
        output.states.eyes_closed = eyes.closure != EyeClosure::Open;
        output.states.blink = eyes.blink;
        signals.eye_closure = eyes.closure;

        if let Some(blinks) = self.state.roll_blink_window(frame.timestamp_ms) {
            if blinks >= thresholds.blink_rate_threshold {
                raised.push(DmsAlert::HighBlinkRate);
            }
        }
        output.metrics.blink_count = Some(self.state.blink_count);

        let mar = geometry::mouth_aspect_ratio(face, w, h);
        let yawning = self.state.observe_mouth(
            mar,
            thresholds.mar_threshold,
            thresholds.yawn_frames_threshold,
        );
        output.metrics.mar = Some(mar);
        output.metrics.mar_mean = self.state.mar_mean();
        if yawning {
            raised.push(DmsAlert::Yawning);
            output.states.yawning = true;
            signals.yawning = true;
        }

        let head = face.nose_tip();
        let sample = CalibrationSample {
            gaze_x: geometry::gaze_point(face).x,
            head_x: head.x,
            head_y: head.y,
        };

        if self.calibration_mode {
            output.calibration_data = Some(sample);
        } else {
            let deviation = deviation::assess(&sample, &self.calibration, thresholds);
            output.states.gaze_deviation = deviation.gaze.is_some();
            output.states.head_turn = deviation.head_turn.is_some();
            output.states.head_tilt_up = deviation.head_tilt().is_some();
            output.states.head_droop = deviation.head_droop().is_some();
            signals.head_turn = deviation.head_turn;
            signals.head_tilt = deviation.head_tilt();
            signals.head_droop = deviation.head_droop();
            raised.extend(deviation.alerts());
        }

        output.face_landmarks = face.points().to_vec();
    }

    /// Record this frame's alerts and list everything still live
    ///
    /// Fresh alerts come first in raise order, then carried-over ones,
    /// oldest first. Each alert appears once.
    fn merge_alerts(&mut self, raised: Vec<DmsAlert>, now: u64) -> Vec<AlertRecord> {
        let mut fresh: Vec<DmsAlert> = Vec::with_capacity(raised.len());
        for kind in raised {
            if !fresh.contains(&kind) {
                self.active_alerts.raise(kind, now);
                fresh.push(kind);
            }
        }

        self.active_alerts.purge_expired(now);

        let mut alerts: Vec<AlertRecord> = fresh
            .iter()
            .map(|&kind| AlertRecord::new(kind, now, true))
            .collect();
        alerts.extend(
            self.active_alerts
                .entries()
                .iter()
                .filter(|e| !fresh.contains(&e.key))
                .map(|e| AlertRecord::new(e.key, e.raised_at_ms, false)),
        );
        alerts
    }
}

impl Default for DmsModule {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

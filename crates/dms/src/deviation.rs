//! Gaze and head deviation from the calibration baseline

use crate::analysis::{DmsAlert, Grade};
use crate::calibration::{CalibrationProfile, CalibrationSample};
use crate::config::ThresholdConfig;

/// Band upper bounds (mild, moderate) for horizontal gaze offset
pub const GAZE_BANDS: (f64, f64) = (0.10, 0.20);
/// Band upper bounds for horizontal head offset
pub const HEAD_TURN_BANDS: (f64, f64) = (0.10, 0.20);
/// Band upper bounds for the head above the baseline
pub const LOOKING_UP_BANDS: (f64, f64) = (0.08, 0.15);
/// Band upper bounds for the head below the baseline
pub const DROOP_BANDS: (f64, f64) = (0.07, 0.12);

/// Vertical head offset, by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalDeviation {
    LookingUp(Grade),
    Drooping(Grade),
}

/// Graded deviations for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviationAssessment {
    pub gaze: Option<Grade>,
    pub head_turn: Option<Grade>,
    pub vertical: Option<VerticalDeviation>,
}

impl DeviationAssessment {
    pub fn head_tilt(&self) -> Option<Grade> {
        match self.vertical {
            Some(VerticalDeviation::LookingUp(g)) => Some(g),
            _ => None,
        }
    }

    pub fn head_droop(&self) -> Option<Grade> {
        match self.vertical {
            Some(VerticalDeviation::Drooping(g)) => Some(g),
            _ => None,
        }
    }

    /// Alerts in raise order: gaze, head turn, vertical
    pub fn alerts(&self) -> Vec<DmsAlert> {
        let mut alerts = Vec::with_capacity(3);
        if let Some(g) = self.gaze {
            alerts.push(DmsAlert::GazeDeviation(g));
        }
        if let Some(g) = self.head_turn {
            alerts.push(DmsAlert::HeadTurn(g));
        }
        match self.vertical {
            Some(VerticalDeviation::LookingUp(g)) => alerts.push(DmsAlert::LookingUp(g)),
            Some(VerticalDeviation::Drooping(g)) => alerts.push(DmsAlert::HeadDroop(g)),
            None => {}
        }
        alerts
    }
}

fn grade(offset: f64, bands: (f64, f64)) -> Grade {
    Grade::from_offset(offset, bands.0, bands.1)
}

/// Compare a sample against the baseline
///
/// Each axis is graded only once its offset exceeds its gate threshold. The
/// vertical axis shares the head-turn threshold.
pub fn assess(
    sample: &CalibrationSample,
    baseline: &CalibrationProfile,
    thresholds: &ThresholdConfig,
) -> DeviationAssessment {
    let gaze_offset = (sample.gaze_x - baseline.gaze_center).abs();
    let head_x_offset = (sample.head_x - baseline.head_center_x).abs();
    let head_y_offset = (sample.head_y - baseline.head_center_y).abs();

    let gaze = (gaze_offset > thresholds.gaze_deviation_threshold)
        .then(|| grade(gaze_offset, GAZE_BANDS));

    let head_turn = (head_x_offset > thresholds.head_turn_threshold)
        .then(|| grade(head_x_offset, HEAD_TURN_BANDS));

    let vertical = (head_y_offset > thresholds.head_turn_threshold).then(|| {
        // Normalized y grows downward
        if sample.head_y < baseline.head_center_y {
            VerticalDeviation::LookingUp(grade(head_y_offset, LOOKING_UP_BANDS))
        } else {
            VerticalDeviation::Drooping(grade(head_y_offset, DROOP_BANDS))
        }
    });

    DeviationAssessment {
        gaze,
        head_turn,
        vertical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(gaze_x: f64, head_x: f64, head_y: f64) -> CalibrationSample {
        CalibrationSample { gaze_x, head_x, head_y }
    }

    #[test]
    fn test_neutral_position_is_clean() {
        let result = assess(
            &sample(0.5, 0.5, 0.5),
            &CalibrationProfile::default(),
            &ThresholdConfig::default(),
        );
        assert_eq!(result, DeviationAssessment::default());
        assert!(result.alerts().is_empty());
    }

    #[test]
    fn test_gaze_bands() {
        let base = CalibrationProfile::default();
        let config = ThresholdConfig::default();

        // Below the 0.05 gate
        assert_eq!(assess(&sample(0.54, 0.5, 0.5), &base, &config).gaze, None);
        assert_eq!(assess(&sample(0.57, 0.5, 0.5), &base, &config).gaze, Some(Grade::Mild));
        assert_eq!(assess(&sample(0.35, 0.5, 0.5), &base, &config).gaze, Some(Grade::Moderate));
        assert_eq!(assess(&sample(0.75, 0.5, 0.5), &base, &config).gaze, Some(Grade::Severe));
    }

    #[test]
    fn test_head_turn_bands() {
        let base = CalibrationProfile::default();
        let config = ThresholdConfig::default();

        assert_eq!(assess(&sample(0.5, 0.57, 0.5), &base, &config).head_turn, None);
        assert_eq!(assess(&sample(0.5, 0.59, 0.5), &base, &config).head_turn, Some(Grade::Mild));
        assert_eq!(
            assess(&sample(0.5, 0.35, 0.5), &base, &config).head_turn,
            Some(Grade::Moderate)
        );
        assert_eq!(assess(&sample(0.5, 0.25, 0.5), &base, &config).head_turn, Some(Grade::Severe));
    }

    #[test]
    fn test_vertical_direction_and_bands() {
        let base = CalibrationProfile::default();
        let config = ThresholdConfig::default();

        let up = assess(&sample(0.5, 0.5, 0.41), &base, &config);
        assert_eq!(up.vertical, Some(VerticalDeviation::LookingUp(Grade::Moderate)));
        assert_eq!(up.head_tilt(), Some(Grade::Moderate));
        assert_eq!(up.head_droop(), None);

        let droop = assess(&sample(0.5, 0.5, 0.59), &base, &config);
        assert_eq!(droop.vertical, Some(VerticalDeviation::Drooping(Grade::Moderate)));

        let drooped = assess(&sample(0.5, 0.5, 0.65), &base, &config);
        assert_eq!(drooped.head_droop(), Some(Grade::Severe));
        assert_eq!(drooped.alerts(), vec![DmsAlert::HeadDroop(Grade::Severe)]);
    }

    #[test]
    fn test_mild_droop_reachable_with_low_gate() {
        let config = ThresholdConfig {
            head_turn_threshold: 0.02,
            ..Default::default()
        };
        let result = assess(&sample(0.5, 0.5, 0.55), &CalibrationProfile::default(), &config);
        assert_eq!(result.head_droop(), Some(Grade::Mild));
    }

    #[test]
    fn test_alert_order() {
        let result = assess(
            &sample(0.8, 0.8, 0.3),
            &CalibrationProfile::default(),
            &ThresholdConfig::default(),
        );
        assert_eq!(
            result.alerts(),
            vec![
                DmsAlert::GazeDeviation(Grade::Severe),
                DmsAlert::HeadTurn(Grade::Severe),
                DmsAlert::LookingUp(Grade::Severe),
            ]
        );
    }
}

//! Compound drowsiness and distraction grading

use crate::analysis::{DmsAlert, Grade};
use crate::state::EyeClosure;

/// Primitive signals gathered during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSignals {
    pub eye_closure: EyeClosure,
    pub yawning: bool,
    pub head_turn: Option<Grade>,
    pub head_tilt: Option<Grade>,
    pub head_droop: Option<Grade>,
    /// Any hand interaction (phone, near face, texting)
    pub hands_busy: bool,
}

/// Compound grades for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundAssessment {
    pub drowsiness: Option<Grade>,
    /// Last distraction grade raised this frame
    pub distraction: Option<Grade>,
    /// Alerts in raise order
    pub alerts: Vec<DmsAlert>,
}

fn at_least(value: Option<Grade>, min: Grade) -> bool {
    value.is_some_and(|g| g >= min)
}

/// Combine primitive signals
///
/// Severe drowsiness excludes moderate. The two distraction grades are
/// checked independently, moderate first, so both can be raised together.
pub fn assess(signals: &FrameSignals) -> CompoundAssessment {
    let mut result = CompoundAssessment::default();

    let drowsy_cue = signals.head_droop.is_some() || signals.yawning;
    let drowsiness = match signals.eye_closure {
        EyeClosure::Severe if drowsy_cue => Some(Grade::Severe),
        EyeClosure::Warning if drowsy_cue => Some(Grade::Moderate),
        _ => None,
    };
    if let Some(grade) = drowsiness {
        result.alerts.push(DmsAlert::Drowsiness(grade));
        result.drowsiness = Some(grade);
    }

    let head_away_at = |min: Grade| {
        at_least(signals.head_turn, min) || at_least(signals.head_tilt, min)
    };

    if signals.hands_busy && head_away_at(Grade::Mild) {
        result.alerts.push(DmsAlert::Distraction(Grade::Moderate));
        result.distraction = Some(Grade::Moderate);
    }
    if signals.hands_busy && head_away_at(Grade::Moderate) {
        result.alerts.push(DmsAlert::Distraction(Grade::Severe));
        result.distraction = Some(Grade::Severe);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severe_drowsiness_truth_table() {
        for droop in [false, true] {
            for yawning in [false, true] {
                let signals = FrameSignals {
                    eye_closure: EyeClosure::Severe,
                    yawning,
                    head_droop: droop.then_some(Grade::Mild),
                    ..Default::default()
                };
                let expected = (droop || yawning).then_some(Grade::Severe);
                assert_eq!(
                    assess(&signals).drowsiness,
                    expected,
                    "droop={droop} yawning={yawning}"
                );
            }
        }
    }

    #[test]
    fn test_moderate_drowsiness() {
        let signals = FrameSignals {
            eye_closure: EyeClosure::Warning,
            yawning: true,
            ..Default::default()
        };
        let result = assess(&signals);
        assert_eq!(result.drowsiness, Some(Grade::Moderate));
        assert_eq!(result.alerts, vec![DmsAlert::Drowsiness(Grade::Moderate)]);
    }

    #[test]
    fn test_no_drowsiness_with_open_eyes() {
        let signals = FrameSignals {
            yawning: true,
            head_droop: Some(Grade::Severe),
            ..Default::default()
        };
        assert_eq!(assess(&signals).drowsiness, None);
    }

    #[test]
    fn test_distraction_needs_hands() {
        let signals = FrameSignals {
            head_turn: Some(Grade::Severe),
            ..Default::default()
        };
        assert!(assess(&signals).alerts.is_empty());
    }

    #[test]
    fn test_mild_turn_with_hands_is_moderate_only() {
        let signals = FrameSignals {
            head_turn: Some(Grade::Mild),
            hands_busy: true,
            ..Default::default()
        };
        let result = assess(&signals);
        assert_eq!(result.alerts, vec![DmsAlert::Distraction(Grade::Moderate)]);
        assert_eq!(result.distraction, Some(Grade::Moderate));
    }

    #[test]
    fn test_moderate_tilt_with_hands_raises_both() {
        let signals = FrameSignals {
            head_tilt: Some(Grade::Moderate),
            hands_busy: true,
            ..Default::default()
        };
        let result = assess(&signals);
        assert_eq!(
            result.alerts,
            vec![
                DmsAlert::Distraction(Grade::Moderate),
                DmsAlert::Distraction(Grade::Severe),
            ]
        );
        assert_eq!(result.distraction, Some(Grade::Severe));
    }
}

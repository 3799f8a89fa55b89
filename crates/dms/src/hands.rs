//! Hand interaction: phone call, hand near face, texting

use crate::geometry;
use crate::landmarks::{FaceLandmarks, HandLandmarks};

/// Maximum distance between the two hands' mean positions (normalized)
pub const TEXTING_MAX_HAND_DISTANCE: f64 = 0.35;
/// Both hands' mean y must be below this line (normalized)
pub const TEXTING_MIN_HAND_Y: f64 = 0.6;

/// How a single hand interacts with the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceContact {
    /// Hand held at an ear
    PhoneCall,
    NearFace,
}

/// Classify one hand against the face; the ear check takes precedence
pub fn face_contact(
    face: &FaceLandmarks,
    hand: &HandLandmarks,
    width: u32,
    height: u32,
    near_face_px: f64,
) -> Option<FaceContact> {
    if geometry::hand_near_ear(face, hand, width, height) {
        Some(FaceContact::PhoneCall)
    } else if geometry::hand_near_face(face, hand, width, height, near_face_px) {
        Some(FaceContact::NearFace)
    } else {
        None
    }
}

/// Two hands held close together in the lower part of the frame
///
/// Only defined for exactly two hands.
pub fn is_texting(hands: &[&HandLandmarks]) -> bool {
    let [a, b] = hands else {
        return false;
    };
    let (Some((x1, y1)), Some((x2, y2))) = (a.mean_position(), b.mean_position()) else {
        return false;
    };

    let distance = (x2 - x1).hypot(y2 - y1);
    let both_low = y1 > TEXTING_MIN_HAND_Y && y2 > TEXTING_MIN_HAND_Y;

    distance < TEXTING_MAX_HAND_DISTANCE && both_low
}

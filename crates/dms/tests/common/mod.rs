//! Synthetic landmark frames for engine tests

#![allow(dead_code)]

use dms::landmarks::indices;
use dms::{FaceLandmarks, HandLandmarks, LandmarkFrame, Point};

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 1000;

/// Eye half-width (normalized)
const EYE_HALF_WIDTH: f64 = 0.03;
/// Mouth width (normalized)
const MOUTH_WIDTH: f64 = 0.1;

/// Builds a face mesh with controllable EAR, MAR, head and gaze position
pub struct FaceBuilder {
    ear: f64,
    mar: f64,
    head: (f64, f64),
    gaze_x: f64,
}

impl FaceBuilder {
    /// Neutral face: eyes open, mouth closed, head and gaze centered
    pub fn new() -> Self {
        Self {
            ear: 0.3,
            mar: 0.2,
            head: (0.5, 0.5),
            gaze_x: 0.5,
        }
    }

    pub fn ear(mut self, ear: f64) -> Self {
        self.ear = ear;
        self
    }

    pub fn mar(mut self, mar: f64) -> Self {
        self.mar = mar;
        self
    }

    pub fn head(mut self, x: f64, y: f64) -> Self {
        self.head = (x, y);
        self
    }

    pub fn gaze_x(mut self, x: f64) -> Self {
        self.gaze_x = x;
        self
    }

    pub fn build(self) -> FaceLandmarks {
        let mut points = vec![Point::new(0.5, 0.3); indices::FACE_MESH_POINTS];

        let gap = self.ear * 2.0 * EYE_HALF_WIDTH;
        for (eye, cx) in [(indices::LEFT_EYE, 0.4), (indices::RIGHT_EYE, 0.6)] {
            let cy = 0.4;
            let d = EYE_HALF_WIDTH;
            points[eye[0]] = Point::new(cx - d, cy);
            points[eye[3]] = Point::new(cx + d, cy);
            points[eye[1]] = Point::new(cx - d / 3.0, cy - gap / 2.0);
            points[eye[5]] = Point::new(cx - d / 3.0, cy + gap / 2.0);
            points[eye[2]] = Point::new(cx + d / 3.0, cy - gap / 2.0);
            points[eye[4]] = Point::new(cx + d / 3.0, cy + gap / 2.0);
        }

        // Iris points carry no visibility score, so the iris gate is open
        for &i in indices::LEFT_IRIS.iter().chain(indices::RIGHT_IRIS.iter()) {
            points[i] = Point::new(self.gaze_x, 0.5);
        }

        let [top, bottom, left, right] = indices::MOUTH;
        points[top] = Point::new(0.5, 0.70);
        points[bottom] = Point::new(0.5, 0.70 + self.mar * MOUTH_WIDTH);
        points[left] = Point::new(0.5 - MOUTH_WIDTH / 2.0, 0.71);
        points[right] = Point::new(0.5 + MOUTH_WIDTH / 2.0, 0.71);

        points[indices::NOSE_TIP] = Point::new(self.head.0, self.head.1);
        points[indices::LEFT_EAR_TIP] = Point::new(0.2, 0.5);
        points[indices::RIGHT_EAR_TIP] = Point::new(0.8, 0.5);

        FaceLandmarks::new(points).expect("full mesh")
    }
}

/// A small cluster of hand landmarks around (x, y)
pub fn hand_at(x: f64, y: f64) -> HandLandmarks {
    HandLandmarks::new(vec![
        Point::new(x - 0.01, y),
        Point::new(x, y),
        Point::new(x + 0.01, y),
        Point::new(x, y + 0.01),
    ])
}

/// Hand held at the left ear
pub fn hand_at_ear() -> HandLandmarks {
    hand_at(0.2, 0.55)
}

pub fn face_frame(face: FaceLandmarks, timestamp_ms: u64) -> LandmarkFrame {
    LandmarkFrame::new(WIDTH, HEIGHT, timestamp_ms).with_face(face)
}

pub fn neutral_frame(timestamp_ms: u64) -> LandmarkFrame {
    face_frame(FaceBuilder::new().build(), timestamp_ms)
}

/// ~30fps frame timestamp
pub fn ts(frame_index: usize) -> u64 {
    frame_index as u64 * 33
}

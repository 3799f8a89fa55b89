//! Landmark frame types consumed by the engine

use crate::DmsError;
use serde::{Deserialize, Serialize};

/// Face mesh landmark indices (478-point refined mesh)
pub mod indices {
    /// Number of points in a refined face mesh
    pub const FACE_MESH_POINTS: usize = 478;

    /// Left eye: outer corner, top x2, inner corner, bottom x2
    pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
    /// Right eye, same ordering as `LEFT_EYE`
    pub const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];
    /// Mouth: top lip, bottom lip, left corner, right corner
    pub const MOUTH: [usize; 4] = [13, 14, 78, 308];
    pub const LEFT_IRIS: [usize; 4] = [474, 475, 476, 477];
    pub const RIGHT_IRIS: [usize; 4] = [469, 470, 471, 472];
    pub const NOSE_TIP: usize = 1;
    pub const LEFT_EAR_TIP: usize = 234;
    pub const RIGHT_EAR_TIP: usize = 454;
}

/// Normalized landmark point ([0,1] in both axes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Detector visibility score, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, visibility: None }
    }

    /// Same point with a visibility score
    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// De-normalize to pixel coordinates
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelPoint {
        PixelPoint {
            x: self.x * f64::from(width),
            y: self.y * f64::from(height),
        }
    }
}

/// Point in pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Face landmark set, guaranteed to cover the full mesh index space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct FaceLandmarks {
    points: Vec<Point>,
}

impl FaceLandmarks {
    /// Build from an ordered point list
    pub fn new(points: Vec<Point>) -> Result<Self, DmsError> {
        if points.len() < indices::FACE_MESH_POINTS {
            return Err(DmsError::KeypointsMissing {
                expected: indices::FACE_MESH_POINTS,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Landmark at a mesh index
    ///
    /// Indices from [`indices`] are always in range.
    pub fn point(&self, index: usize) -> Point {
        self.points.get(index).copied().unwrap_or_default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Nose tip, used as face center and head position
    pub fn nose_tip(&self) -> Point {
        self.point(indices::NOSE_TIP)
    }
}

impl TryFrom<Vec<Point>> for FaceLandmarks {
    type Error = DmsError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<FaceLandmarks> for Vec<Point> {
    fn from(face: FaceLandmarks) -> Self {
        face.points
    }
}

/// Landmarks of one detected hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks {
    points: Vec<Point>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean normalized position of the hand's landmarks
    pub fn mean_position(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some((sx / n, sy / n))
    }
}

/// One frame of landmark geometry from the extraction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Face landmarks (absent if no face detected)
    #[serde(default)]
    pub face: Option<FaceLandmarks>,
    /// Zero or more hands
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Capture timestamp (milliseconds, caller clock)
    pub timestamp_ms: u64,
}

impl LandmarkFrame {
    pub fn new(width: u32, height: u32, timestamp_ms: u64) -> Self {
        Self {
            face: None,
            hands: Vec::new(),
            width,
            height,
            timestamp_ms,
        }
    }

    pub fn with_face(mut self, face: FaceLandmarks) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_hand(mut self, hand: HandLandmarks) -> Self {
        self.hands.push(hand);
        self
    }
}

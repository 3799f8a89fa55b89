//! Landmark geometry: aspect ratios, iris position, hand proximity
//!
//! Pure functions, no retained state. Aspect ratios are computed in pixel
//! space so that non-square frames are handled correctly.

use crate::landmarks::{indices, FaceLandmarks, HandLandmarks, PixelPoint, Point};

/// Ear proximity box, horizontal half-width (pixels)
pub const EAR_BOX_DX_PX: f64 = 40.0;
/// Ear proximity box, vertical half-height (pixels)
pub const EAR_BOX_DY_PX: f64 = 90.0;
/// Minimum iris visibility score for a point to count as visible
pub const IRIS_VISIBILITY_MIN: f64 = 0.1;
/// Visible iris points needed to consider the iris visible
pub const IRIS_VISIBLE_POINTS_MIN: usize = 4;
/// Normalized frame midline
pub const FRAME_MIDLINE: f64 = 0.5;

/// Eye aspect ratio for one eye
///
/// `(|p1-p5| + |p2-p4|) / (2 * |p0-p3|)`, or 0 when the horizontal
/// distance is 0.
pub fn eye_aspect_ratio(face: &FaceLandmarks, eye: &[usize; 6], width: u32, height: u32) -> f64 {
    let p = |i: usize| face.point(eye[i]).to_pixels(width, height);

    let a = p(1).distance(&p(5));
    let b = p(2).distance(&p(4));
    let c = p(0).distance(&p(3));

    if c > 0.0 {
        (a + b) / (2.0 * c)
    } else {
        0.0
    }
}

/// Mean EAR of both eyes
pub fn average_ear(face: &FaceLandmarks, width: u32, height: u32) -> f64 {
    let left = eye_aspect_ratio(face, &indices::LEFT_EYE, width, height);
    let right = eye_aspect_ratio(face, &indices::RIGHT_EYE, width, height);
    (left + right) / 2.0
}

/// Mouth aspect ratio: lip gap over mouth width, or 0 when width is 0
pub fn mouth_aspect_ratio(face: &FaceLandmarks, width: u32, height: u32) -> f64 {
    let p = |i: usize| face.point(indices::MOUTH[i]).to_pixels(width, height);

    let vertical = p(0).distance(&p(1));
    let horizontal = p(2).distance(&p(3));

    if horizontal > 0.0 {
        vertical / horizontal
    } else {
        0.0
    }
}

/// Mean normalized position of a set of iris landmarks
pub fn iris_center(face: &FaceLandmarks, iris: &[usize; 4]) -> Point {
    let n = iris.len() as f64;
    let (sx, sy) = iris
        .iter()
        .map(|&i| face.point(i))
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Combined gaze point: mean of both iris centers (normalized)
pub fn gaze_point(face: &FaceLandmarks) -> Point {
    let left = iris_center(face, &indices::LEFT_IRIS);
    let right = iris_center(face, &indices::RIGHT_IRIS);
    Point::new((left.x + right.x) / 2.0, (left.y + right.y) / 2.0)
}

/// Whether enough iris landmarks report visibility
pub fn iris_visible(face: &FaceLandmarks) -> bool {
    indices::LEFT_IRIS
        .iter()
        .chain(indices::RIGHT_IRIS.iter())
        .filter(|&&i| {
            face.point(i)
                .visibility
                .is_some_and(|v| v > IRIS_VISIBILITY_MIN)
        })
        .count()
        >= IRIS_VISIBLE_POINTS_MIN
}

/// Iris gate for eye closure: iris not visible, or sitting below the midline
///
/// Separates a real closed eye from an EAR dip caused by looking down.
pub fn iris_missing_or_low(face: &FaceLandmarks) -> bool {
    !iris_visible(face) || gaze_point(face).y > FRAME_MIDLINE
}

/// Whether any hand landmark falls inside either ear's proximity box
pub fn hand_near_ear(face: &FaceLandmarks, hand: &HandLandmarks, width: u32, height: u32) -> bool {
    let ear_l = face.point(indices::LEFT_EAR_TIP).to_pixels(width, height);
    let ear_r = face.point(indices::RIGHT_EAR_TIP).to_pixels(width, height);

    let in_box = |h: &PixelPoint, ear: &PixelPoint| {
        (h.x - ear.x).abs() < EAR_BOX_DX_PX && (h.y - ear.y).abs() < EAR_BOX_DY_PX
    };

    hand.points().iter().any(|lm| {
        let h = lm.to_pixels(width, height);
        in_box(&h, &ear_l) || in_box(&h, &ear_r)
    })
}

/// Whether any hand landmark lies within `radius_px` of the face center
///
/// Coordinates are truncated to whole pixels before measuring.
pub fn hand_near_face(
    face: &FaceLandmarks,
    hand: &HandLandmarks,
    width: u32,
    height: u32,
    radius_px: f64,
) -> bool {
    let truncate = |p: PixelPoint| PixelPoint {
        x: p.x.trunc(),
        y: p.y.trunc(),
    };
    let center = truncate(face.nose_tip().to_pixels(width, height));

    hand.points()
        .iter()
        .any(|lm| center.distance(&truncate(lm.to_pixels(width, height))) < radius_px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blank_face() -> Vec<Point> {
        vec![Point::new(0.5, 0.5); indices::FACE_MESH_POINTS]
    }

    /// Place one eye centered at (cx, cy) with half-width `d` and lid gap `gap`
    fn place_eye(points: &mut [Point], eye: &[usize; 6], cx: f64, cy: f64, d: f64, gap: f64) {
        points[eye[0]] = Point::new(cx - d, cy);
        points[eye[3]] = Point::new(cx + d, cy);
        points[eye[1]] = Point::new(cx - d / 3.0, cy - gap / 2.0);
        points[eye[5]] = Point::new(cx - d / 3.0, cy + gap / 2.0);
        points[eye[2]] = Point::new(cx + d / 3.0, cy - gap / 2.0);
        points[eye[4]] = Point::new(cx + d / 3.0, cy + gap / 2.0);
    }

    #[test]
    fn test_ear_formula() {
        let mut points = blank_face();
        place_eye(&mut points, &indices::LEFT_EYE, 0.4, 0.4, 0.03, 0.018);
        place_eye(&mut points, &indices::RIGHT_EYE, 0.6, 0.4, 0.03, 0.018);
        let face = FaceLandmarks::new(points).unwrap();

        // gap / (2 * d) = 0.018 / 0.06
        let ear = average_ear(&face, 1000, 1000);
        assert!((ear - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_geometry_is_zero() {
        let face = FaceLandmarks::new(blank_face()).unwrap();
        assert_eq!(average_ear(&face, 640, 480), 0.0);
        assert_eq!(mouth_aspect_ratio(&face, 640, 480), 0.0);
        assert_eq!(average_ear(&face, 0, 0), 0.0);
    }

    #[test]
    fn test_mouth_aspect_ratio() {
        let mut points = blank_face();
        points[indices::MOUTH[0]] = Point::new(0.5, 0.70);
        points[indices::MOUTH[1]] = Point::new(0.5, 0.78);
        points[indices::MOUTH[2]] = Point::new(0.45, 0.74);
        points[indices::MOUTH[3]] = Point::new(0.55, 0.74);
        let face = FaceLandmarks::new(points).unwrap();

        let mar = mouth_aspect_ratio(&face, 1000, 1000);
        assert!((mar - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_iris_gate() {
        let mut points = blank_face();
        for &i in indices::LEFT_IRIS.iter().chain(indices::RIGHT_IRIS.iter()) {
            points[i] = Point::new(0.5, 0.4).with_visibility(0.9);
        }
        let face = FaceLandmarks::new(points.clone()).unwrap();
        assert!(iris_visible(&face));
        assert!(!iris_missing_or_low(&face));

        // Looking down: iris visible but below midline
        for &i in indices::LEFT_IRIS.iter().chain(indices::RIGHT_IRIS.iter()) {
            points[i].y = 0.6;
        }
        let face = FaceLandmarks::new(points.clone()).unwrap();
        assert!(iris_missing_or_low(&face));

        // Only three visible points
        for &i in indices::LEFT_IRIS.iter().chain(indices::RIGHT_IRIS.iter()).skip(3) {
            points[i] = Point::new(0.5, 0.4).with_visibility(0.05);
        }
        let face = FaceLandmarks::new(points).unwrap();
        assert!(!iris_visible(&face));
    }

    #[test]
    fn test_gaze_point_averages_both_irises() {
        let mut points = blank_face();
        for &i in &indices::LEFT_IRIS {
            points[i] = Point::new(0.30, 0.40);
        }
        for &i in &indices::RIGHT_IRIS {
            points[i] = Point::new(0.50, 0.44);
        }
        let face = FaceLandmarks::new(points).unwrap();
        let gaze = gaze_point(&face);
        assert!((gaze.x - 0.40).abs() < 1e-9);
        assert!((gaze.y - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_hand_near_ear_box_is_asymmetric() {
        let mut points = blank_face();
        points[indices::LEFT_EAR_TIP] = Point::new(0.2, 0.5);
        points[indices::RIGHT_EAR_TIP] = Point::new(0.8, 0.5);
        let face = FaceLandmarks::new(points).unwrap();

        // 80px below the left ear: inside the 90px vertical reach
        let below = HandLandmarks::new(vec![Point::new(0.2, 0.58)]);
        assert!(hand_near_ear(&face, &below, 1000, 1000));

        // 80px beside the left ear: outside the 40px horizontal reach
        let beside = HandLandmarks::new(vec![Point::new(0.28, 0.5)]);
        assert!(!hand_near_ear(&face, &beside, 1000, 1000));
    }

    #[test]
    fn test_hand_near_face_radius() {
        let mut points = blank_face();
        points[indices::NOSE_TIP] = Point::new(0.5, 0.5);
        let face = FaceLandmarks::new(points).unwrap();

        let close = HandLandmarks::new(vec![Point::new(0.5, 0.69)]);
        let far = HandLandmarks::new(vec![Point::new(0.5, 0.71)]);
        assert!(hand_near_face(&face, &close, 1000, 1000, 200.0));
        assert!(!hand_near_face(&face, &far, 1000, 1000, 200.0));
        assert!(!hand_near_face(&face, &HandLandmarks::default(), 1000, 1000, 200.0));
    }

    proptest! {
        #[test]
        fn prop_ear_monotonic_in_lid_gap(
            half_width in 0.01f64..0.1,
            gap_a in 0.0f64..0.1,
            gap_b in 0.0f64..0.1,
        ) {
            let (small, large) = if gap_a <= gap_b { (gap_a, gap_b) } else { (gap_b, gap_a) };

            let ear_for = |gap: f64| {
                let mut points = blank_face();
                place_eye(&mut points, &indices::LEFT_EYE, 0.4, 0.4, half_width, gap);
                place_eye(&mut points, &indices::RIGHT_EYE, 0.6, 0.4, half_width, gap);
                average_ear(&FaceLandmarks::new(points).unwrap(), 1280, 720)
            };

            prop_assert!(ear_for(small) <= ear_for(large) + 1e-12);
        }
    }
}

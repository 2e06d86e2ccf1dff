// ABOUTME: Vertex angle between three pixel-space points using the dot product
// ABOUTME: Cosine clamped to [-1, 1] so rounding noise never leaves acos's domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_form_core::constants::geometry::MAGNITUDE_EPSILON;
use pierre_form_core::models::Point;

/// Angle at `b` formed by `a-b-c`, in degrees
///
/// Uses `cos(θ) = (ba · bc) / (|ba| × |bc| + ε)`. Coincident points give a
/// cosine of zero and therefore 90°, never NaN.
#[must_use]
pub fn angle_between(a: Point, b: Point, c: Point) -> f64 {
    let ba = (a.x - b.x, a.y - b.y);
    let bc = (c.x - b.x, c.y - b.y);

    let dot = ba.0.mul_add(bc.0, ba.1 * bc.1);
    let magnitudes = ba.0.hypot(ba.1) * bc.0.hypot(bc.1);

    let cos_angle = (dot / (magnitudes + MAGNITUDE_EPSILON)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn p(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = angle_between(p(0.0, 0.0), p(50.0, 0.0), p(100.0, 0.0));
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_between(p(0.0, 0.0), p(50.0, 0.0), p(50.0, 50.0));
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_coincident_points_do_not_produce_nan() {
        let angle = angle_between(p(10.0, 10.0), p(10.0, 10.0), p(20.0, 10.0));
        assert!(angle.is_finite());
    }
}

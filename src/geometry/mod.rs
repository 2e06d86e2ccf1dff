// ABOUTME: Converts one pose frame into named angles and a flat evaluation context
// ABOUTME: Pixel denormalization, vertex angles, optional smoothing, and joint coordinate keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Angle and Context Builder
//!
//! For every angle in a definition the three joints are denormalized to
//! pixels and the vertex angle computed. With smoothing enabled the
//! reported value is the moving average of that angle's recent raw values.
//!
//! The resulting [`EvaluationContext`] holds:
//! - `<name>_angle` for every computed angle
//! - `angle` aliasing the angle named `primary`
//! - `<joint>_x` / `<joint>_y` for every joint present in the frame
//!
//! An angle whose joints are missing from the frame is left out of this
//! frame's maps; conditions referencing it fail and count as false.
//! Non-finite angles from corrupt landmarks are treated the same way, so
//! they never enter the smoothing history.
//! Unknown angle and joint names never reach this point: angle specs hold
//! typed [`Joint`]s and the loader rejects unknown names as `ConfigInvalid`.

/// Vertex angle computation
pub mod angles;
/// Moving-average smoothing
pub mod smoothing;

pub use angles::angle_between;
pub use smoothing::AngleSmoother;

use std::collections::BTreeMap;

use pierre_form_core::constants::geometry::{ANGLE_ALIAS, ANGLE_SUFFIX, PRIMARY_ANGLE};
use pierre_form_core::models::{Joint, PoseFrame};

use crate::conditions::EvaluationContext;
use crate::definition::{AngleSpec, ExerciseDefinition};

/// Geometry derived from one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameGeometry {
    /// Reported angles (smoothed when smoothing is enabled)
    pub angles: BTreeMap<String, f64>,
    /// Angles before smoothing
    pub raw_angles: BTreeMap<String, f64>,
    /// Flat context for condition evaluation
    pub context: EvaluationContext,
}

impl FrameGeometry {
    /// Reported value of one angle, if it was computable this frame
    #[must_use]
    pub fn angle(&self, name: &str) -> Option<f64> {
        self.angles.get(name).copied()
    }

    /// Reported primary angle
    #[must_use]
    pub fn primary_angle(&self) -> Option<f64> {
        self.angle(PRIMARY_ANGLE)
    }
}

/// Raw vertex angle for one spec, `None` when a joint is absent
#[must_use]
pub fn compute_angle(frame: &PoseFrame, spec: &AngleSpec) -> Option<f64> {
    let [a, b, c] = spec.joints;
    Some(angle_between(
        frame.pixel(a)?,
        frame.pixel(b)?,
        frame.pixel(c)?,
    ))
}

/// Compute every angle and build the evaluation context for one frame
///
/// `smoother` is only consulted when the definition enables smoothing.
pub fn build_frame_geometry(
    definition: &ExerciseDefinition,
    frame: &PoseFrame,
    smoother: &mut AngleSmoother,
) -> FrameGeometry {
    let mut geometry = FrameGeometry::default();

    for spec in &definition.angles {
        let Some(raw) = compute_angle(frame, spec).filter(|raw| raw.is_finite()) else {
            continue;
        };
        let reported = if definition.smoothing.enabled {
            smoother.push(&spec.name, raw)
        } else {
            raw
        };
        geometry.raw_angles.insert(spec.name.clone(), raw);
        geometry.angles.insert(spec.name.clone(), reported);
    }

    for (name, value) in &geometry.angles {
        geometry.context.insert(format!("{name}{ANGLE_SUFFIX}"), *value);
        if name == PRIMARY_ANGLE {
            geometry.context.insert(ANGLE_ALIAS, *value);
        }
    }

    for joint in Joint::ALL {
        if let Some(point) = frame.pixel(joint) {
            geometry.context.insert(format!("{joint}_x"), point.x);
            geometry.context.insert(format!("{joint}_y"), point.y);
        }
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DefinitionLoader;
    use pierre_form_core::models::Landmark;

    const KNEE_AND_HIP: &str = r#"
name: knee_and_hip
angles:
  primary: { points: [left_hip, left_knee, left_ankle] }
  hip: { points: [left_shoulder, left_hip, left_knee] }
states:
  up: { condition: "angle > 120" }
counter: { trigger_state: up }
smoothing: { enabled: true, window: 2 }
"#;

    fn definition() -> ExerciseDefinition {
        DefinitionLoader::new("definitions")
            .parse_definition(KNEE_AND_HIP, "inline")
            .unwrap()
    }

    /// Straight left leg with the knee bent to a right angle when `bent`
    fn frame(bent: bool) -> PoseFrame {
        let mut landmarks = vec![Landmark::new(0.5, 0.9); 33];
        landmarks[Joint::LeftShoulder.landmark_index()] = Landmark::new(0.5, 0.1);
        landmarks[Joint::LeftHip.landmark_index()] = Landmark::new(0.5, 0.3);
        landmarks[Joint::LeftKnee.landmark_index()] = Landmark::new(0.5, 0.5);
        landmarks[Joint::LeftAnkle.landmark_index()] = if bent {
            Landmark::new(0.7, 0.5)
        } else {
            Landmark::new(0.5, 0.7)
        };
        PoseFrame::new(landmarks, 100, 200)
    }

    #[test]
    fn test_context_exposes_angles_alias_and_pixels() {
        let definition = definition();
        let mut smoother = AngleSmoother::new(1);
        let geometry = build_frame_geometry(&definition, &frame(true), &mut smoother);

        let knee = geometry.primary_angle().unwrap();
        assert!((knee - 90.0).abs() < 1e-3);
        assert_eq!(geometry.context.get("angle"), Some(knee));
        assert_eq!(geometry.context.get("primary_angle"), Some(knee));
        assert!(geometry.context.get("hip_angle").is_some());
        assert_eq!(geometry.context.get("left_knee_x"), Some(50.0));
        assert_eq!(geometry.context.get("left_knee_y"), Some(100.0));
    }

    #[test]
    fn test_missing_joint_drops_only_its_angle() {
        let definition = definition();
        let mut bare = frame(false);
        bare.landmarks.truncate(Joint::LeftKnee.landmark_index());
        let mut smoother = AngleSmoother::new(1);
        let geometry = build_frame_geometry(&definition, &bare, &mut smoother);

        assert!(geometry.angles.is_empty());
        assert!(geometry.context.get("angle").is_none());
        assert!(geometry.context.get("left_hip_x").is_some());
        assert!(geometry.context.get("left_knee_x").is_none());
    }

    #[test]
    fn test_non_finite_angle_is_dropped_before_smoothing() {
        let definition = definition();
        let mut smoother = AngleSmoother::new(definition.smoothing.window);
        let mut corrupt = frame(true);
        corrupt.landmarks[Joint::LeftKnee.landmark_index()] = Landmark::new(f64::NAN, 0.5);

        let geometry = build_frame_geometry(&definition, &corrupt, &mut smoother);
        assert!(geometry.primary_angle().is_none());
        assert!(smoother.history("primary").is_empty());

        let geometry = build_frame_geometry(&definition, &frame(true), &mut smoother);
        assert!((geometry.primary_angle().unwrap() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_smoothing_reports_mean_and_keeps_raw() {
        let definition = definition();
        let mut smoother = AngleSmoother::new(definition.smoothing.window);
        build_frame_geometry(&definition, &frame(false), &mut smoother);
        let geometry = build_frame_geometry(&definition, &frame(true), &mut smoother);

        let raw = geometry.raw_angles["primary"];
        assert!((raw - 90.0).abs() < 1e-3);
        assert!((geometry.angles["primary"] - 135.0).abs() < 0.01);
    }
}

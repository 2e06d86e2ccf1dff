// ABOUTME: Pose input model: anatomical joint scheme, landmarks, and per-frame pose data
// ABOUTME: Maps joint names to the 33-point landmark indices produced by pose detectors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Body joints the engine can reference in angle definitions and conditions
///
/// Mapped onto the 33-point landmark layout used by `MediaPipe` Pose. Only
/// the joints relevant to exercise tracking are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    /// Nose tip
    Nose,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

impl Joint {
    /// Every joint in landmark-index order
    pub const ALL: [Self; 13] = [
        Self::Nose,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Index of this joint in a 33-point landmark list
    #[must_use]
    pub const fn landmark_index(self) -> usize {
        match self {
            Self::Nose => 0,
            Self::LeftShoulder => 11,
            Self::RightShoulder => 12,
            Self::LeftElbow => 13,
            Self::RightElbow => 14,
            Self::LeftWrist => 15,
            Self::RightWrist => 16,
            Self::LeftHip => 23,
            Self::RightHip => 24,
            Self::LeftKnee => 25,
            Self::RightKnee => 26,
            Self::LeftAnkle => 27,
            Self::RightAnkle => 28,
        }
    }

    /// Name used in definitions and context keys
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Parse a joint name, `None` when it is not part of the scheme
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|joint| joint.as_str() == name)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Joint {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AppError::config_invalid(format!("Unknown landmark: {s}")))
    }
}

/// A single detected landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0.0 (left edge) to 1.0 (right edge)
    pub x: f64,
    /// Vertical position, 0.0 (top edge) to 1.0 (bottom edge)
    pub y: f64,
    /// Detector confidence that the landmark is visible
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

const fn default_visibility() -> f64 {
    1.0
}

impl Landmark {
    /// Create a fully visible landmark
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: 1.0,
        }
    }
}

/// Pixel-space point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal pixel coordinate
    pub x: f64,
    /// Vertical pixel coordinate
    pub y: f64,
}

/// One frame of pose detector output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Landmarks indexed by the 33-point scheme; may be shorter or empty
    pub landmarks: Vec<Landmark>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl PoseFrame {
    /// Create a frame from landmarks and pixel dimensions
    #[must_use]
    pub const fn new(landmarks: Vec<Landmark>, width: u32, height: u32) -> Self {
        Self {
            landmarks,
            width,
            height,
        }
    }

    /// True when the detector produced no landmarks this frame
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Pixel coordinates of a joint, `None` when the detector omitted it
    #[must_use]
    pub fn pixel(&self, joint: Joint) -> Option<Point> {
        self.landmarks
            .get(joint.landmark_index())
            .map(|landmark| Point {
                x: landmark.x * f64::from(self.width),
                y: landmark.y * f64::from(self.height),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_names_round_trip_through_parse() {
        for joint in Joint::ALL {
            assert_eq!(Joint::parse(joint.as_str()), Some(joint));
        }
        assert_eq!(Joint::parse("left_toe"), None);
    }

    #[test]
    fn test_pixel_denormalizes_and_tolerates_short_lists() {
        let mut landmarks = vec![Landmark::new(0.0, 0.0); 12];
        landmarks[11] = Landmark::new(0.5, 0.25);
        let frame = PoseFrame::new(landmarks, 640, 480);

        let shoulder = frame.pixel(Joint::LeftShoulder);
        assert_eq!(shoulder, Some(Point { x: 320.0, y: 120.0 }));
        assert_eq!(frame.pixel(Joint::LeftKnee), None);
    }
}

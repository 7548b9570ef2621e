//! Hand frame and gesture data types
//!
//! Landmark indices follow the MediaPipe Hands convention (21 points).

use crate::error::GameError;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of landmarks in one hand skeleton
pub const LANDMARK_COUNT: usize = 21;

/// Length of the flat x/y/z array handed over from JavaScript
pub const FLAT_LANDMARK_LEN: usize = LANDMARK_COUNT * 3;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 3D landmark point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32, // 0-1 normalized
    pub y: f32, // 0-1 normalized
    pub z: f32, // Relative depth
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

/// One camera frame worth of hand tracking output
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub handedness: Handedness,
    /// Detection confidence (0-1)
    pub confidence: f32,
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT], handedness: Handedness, confidence: f32) -> Self {
        Self {
            landmarks,
            handedness,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Build a frame from a flat array of 63 values (21 landmarks × x, y, z)
    pub fn from_flat(data: &[f32], handedness: Handedness, confidence: f32) -> Result<Self, GameError> {
        if data.len() != FLAT_LANDMARK_LEN {
            return Err(GameError::InvalidLandmarkData(data.len()));
        }

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, chunk) in data.chunks_exact(3).enumerate() {
            landmarks[i] = Landmark::new(chunk[0], chunk[1], chunk[2]);
        }

        Ok(Self::new(landmarks, handedness, confidence))
    }

    pub fn wrist(&self) -> Landmark {
        self.landmarks[WRIST]
    }
}

/// Hand velocity in normalized units per second
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub speed: f32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { vx: 0.0, vy: 0.0, vz: 0.0, speed: 0.0 };

    pub fn new(vx: f32, vy: f32, vz: f32) -> Self {
        Self {
            vx,
            vy,
            vz,
            speed: (vx * vx + vy * vy + vz * vz).sqrt(),
        }
    }
}

/// Closed set of recognized gestures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureType {
    Gun,
    Shoot,
    Throw,
    Whip,
    OneFinger,
    TwoFingers,
    ThreeFingers,
    None,
}

impl GestureType {
    pub const ALL: [GestureType; 8] = [
        GestureType::Gun,
        GestureType::Shoot,
        GestureType::Throw,
        GestureType::Whip,
        GestureType::OneFinger,
        GestureType::TwoFingers,
        GestureType::ThreeFingers,
        GestureType::None,
    ];

    /// Dense index, used by the stabilizer's vote table
    pub fn index(&self) -> usize {
        match self {
            GestureType::Gun => 0,
            GestureType::Shoot => 1,
            GestureType::Throw => 2,
            GestureType::Whip => 3,
            GestureType::OneFinger => 4,
            GestureType::TwoFingers => 5,
            GestureType::ThreeFingers => 6,
            GestureType::None => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureType::Gun => "gun",
            GestureType::Shoot => "shoot",
            GestureType::Throw => "throw",
            GestureType::Whip => "whip",
            GestureType::OneFinger => "one",
            GestureType::TwoFingers => "two",
            GestureType::ThreeFingers => "three",
            GestureType::None => "none",
        }
    }

    /// Pointing gestures report the fingertip instead of the hand center
    pub fn is_pointing(&self) -> bool {
        matches!(self, GestureType::Gun | GestureType::Shoot)
    }
}

/// Stabilized gesture for one recognition cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub gesture: GestureType,
    pub confidence: f32,
    /// Index fingertip for pointing gestures, middle-finger base otherwise
    pub position: Landmark,
    pub velocity: Velocity,
}

impl GestureEvent {
    pub fn new(gesture: GestureType, confidence: f32, position: Landmark, velocity: Velocity) -> Self {
        Self {
            gesture,
            confidence,
            position,
            velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flat_rejects_wrong_length() {
        let err = HandFrame::from_flat(&[0.0; 10], Handedness::Right, 0.9).unwrap_err();
        assert!(matches!(err, GameError::InvalidLandmarkData(10)));
    }

    #[test]
    fn from_flat_reads_xyz_triples() {
        let mut data = [0.0f32; FLAT_LANDMARK_LEN];
        data[INDEX_TIP * 3] = 0.25;
        data[INDEX_TIP * 3 + 1] = 0.5;
        data[INDEX_TIP * 3 + 2] = -0.1;

        let frame = HandFrame::from_flat(&data, Handedness::Left, 1.4).unwrap();
        assert_eq!(frame.landmarks[INDEX_TIP], Landmark::new(0.25, 0.5, -0.1));
        assert_eq!(frame.confidence, 1.0);
    }

    #[test]
    fn velocity_speed_is_norm() {
        let v = Velocity::new(3.0, 4.0, 0.0);
        assert!((v.speed - 5.0).abs() < 1e-6);
    }
}

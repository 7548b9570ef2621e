//! Gesture module - hand landmarks to stable gesture events
//!
//! Re-exports only. All logic in submodules.

mod classify;
mod fingers;
mod recognizer;
mod stabilizer;
mod types;
mod velocity;

pub use classify::{classify_gesture, SHOOT_SPEED, STILL_SPEED, WHIP_AXIS_SPEED};
pub use fingers::{classify_fingers, straightness_ratio, Finger, FingerPose, STRAIGHT_RATIO};
pub use recognizer::GestureRecognizer;
pub use stabilizer::{GestureStabilizer, HISTORY_SIZE};
pub use types::{
    GestureEvent, GestureType, HandFrame, Handedness, Landmark, Velocity, FLAT_LANDMARK_LEN,
    INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, WRIST,
};
pub use velocity::{estimate_velocity, VelocityEstimator};

#[cfg(test)]
pub(crate) use fingers::test_hands;

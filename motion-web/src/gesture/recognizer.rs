//! Gesture recognizer - frame in, stable gesture event out
//!
//! velocity + finger pose -> raw label -> majority vote -> GestureEvent

use super::classify::classify_gesture;
use super::fingers::classify_fingers;
use super::stabilizer::GestureStabilizer;
use super::types::{GestureEvent, GestureType, HandFrame, INDEX_TIP, MIDDLE_MCP};
use super::velocity::VelocityEstimator;
use crate::config::PlatformProfile;

pub struct GestureRecognizer {
    profile: PlatformProfile,
    velocity: VelocityEstimator,
    stabilizer: GestureStabilizer,
    /// Raw (unsmoothed) label of the most recent frame
    last_raw: GestureType,
}

impl GestureRecognizer {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            profile,
            velocity: VelocityEstimator::new(),
            stabilizer: GestureStabilizer::new(),
            last_raw: GestureType::None,
        }
    }

    /// Run one recognition cycle
    ///
    /// `now` is wall-clock seconds. With no frame, no event is produced and
    /// the velocity history is dropped so a tracking gap never reads as a
    /// fast motion.
    pub fn recognize(&mut self, frame: Option<&HandFrame>, now: f64) -> Option<GestureEvent> {
        let Some(frame) = frame else {
            self.velocity.clear();
            return None;
        };

        let velocity = self.velocity.update(frame, now);
        let pose = classify_fingers(frame);
        let raw = classify_gesture(&pose, &velocity, &self.profile);
        self.last_raw = raw;

        let gesture = self.stabilizer.push(raw);
        let anchor = if gesture.is_pointing() { INDEX_TIP } else { MIDDLE_MCP };

        Some(GestureEvent::new(gesture, frame.confidence, frame.landmarks[anchor], velocity))
    }

    pub fn last_raw(&self) -> GestureType {
        self.last_raw
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    pub fn reset(&mut self) {
        self.velocity.clear();
        self.stabilizer.clear();
        self.last_raw = GestureType::None;
    }
}

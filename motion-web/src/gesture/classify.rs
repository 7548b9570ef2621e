//! Rule-based gesture classification
//!
//! Priority order, first match wins:
//! 1. Slow hand with 1/2/3 straight fingers -> finger count
//! 2. Index only -> SHOOT when fast, GUN otherwise
//! 3. Enough fingers and upward flick -> THROW (thresholds per platform)
//! 4. Fast lateral or vertical motion -> WHIP
//! 5. NONE
//!
//! Rule 2 runs before rule 3, so an index-only hand is never a THROW.

use tracing::debug;

use super::fingers::FingerPose;
use super::types::{GestureType, Velocity};
use crate::config::PlatformProfile;

/// Below this speed finger counts are reported
pub const STILL_SPEED: f32 = 0.5;

/// Index-only hand faster than this fires
pub const SHOOT_SPEED: f32 = 0.8;

/// Per-axis speed for a whip
pub const WHIP_AXIS_SPEED: f32 = 0.8;

/// Classify one frame from its finger pose and wrist velocity
pub fn classify_gesture(pose: &FingerPose, velocity: &Velocity, profile: &PlatformProfile) -> GestureType {
    let straight = pose.count();

    if velocity.speed < STILL_SPEED {
        match straight {
            1 => return GestureType::OneFinger,
            2 => return GestureType::TwoFingers,
            3 => return GestureType::ThreeFingers,
            _ => {}
        }
    }

    if pose.index_only() {
        if velocity.speed > SHOOT_SPEED {
            debug!(speed = velocity.speed, "shoot detected");
            return GestureType::Shoot;
        }
        return GestureType::Gun;
    }

    if straight >= profile.throw_min_fingers && velocity.vy < profile.throw_max_vy {
        debug!(
            vy = velocity.vy,
            fingers = straight,
            platform = profile.platform.as_str(),
            "throw detected"
        );
        return GestureType::Throw;
    }

    if velocity.vx.abs() > WHIP_AXIS_SPEED || velocity.vy.abs() > WHIP_AXIS_SPEED {
        debug!(vx = velocity.vx, vy = velocity.vy, "whip detected");
        return GestureType::Whip;
    }

    GestureType::None
}

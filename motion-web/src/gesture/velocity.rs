//! Wrist velocity from consecutive hand frames
//!
//! Finite difference of landmark 0 over wall-clock time. The estimator keeps
//! only the single most recent frame; the difference itself is a pure function.

use super::types::{HandFrame, Velocity};

/// Finite-difference velocity of the wrist between two frames
///
/// Returns zero when there is no previous frame or no time has elapsed,
/// so the first tracked frame never produces a spike.
pub fn estimate_velocity(current: &HandFrame, previous: Option<&HandFrame>, elapsed: f64) -> Velocity {
    let Some(previous) = previous else {
        return Velocity::ZERO;
    };

    // Non-positive elapsed covers a clock that did not advance (or stepped back)
    if elapsed <= 0.0 {
        return Velocity::ZERO;
    }

    let dt = elapsed as f32;
    let now = current.wrist();
    let before = previous.wrist();

    Velocity::new(
        (now.x - before.x) / dt,
        (now.y - before.y) / dt,
        (now.z - before.z) / dt,
    )
}

/// Velocity estimator holding the previous frame across cycles
pub struct VelocityEstimator {
    previous: Option<HandFrame>,
    previous_time: f64,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        Self {
            previous: None,
            previous_time: 0.0,
        }
    }

    /// Estimate velocity for `frame` observed at `now` (seconds) and retain it
    pub fn update(&mut self, frame: &HandFrame, now: f64) -> Velocity {
        let velocity = estimate_velocity(frame, self.previous.as_ref(), now - self.previous_time);
        self.previous = Some(frame.clone());
        self.previous_time = now;
        velocity
    }

    /// Forget the previous frame (tracking gap)
    pub fn clear(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::types::{Handedness, Landmark, LANDMARK_COUNT};
    use proptest::prelude::*;

    fn frame_with_wrist(x: f32, y: f32, z: f32) -> HandFrame {
        let mut landmarks = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        landmarks[0] = Landmark::new(x, y, z);
        HandFrame::new(landmarks, Handedness::Right, 0.9)
    }

    #[test]
    fn first_frame_has_zero_velocity() {
        let frame = frame_with_wrist(0.2, 0.3, 0.0);
        assert_eq!(estimate_velocity(&frame, None, 0.033), Velocity::ZERO);
    }

    #[test]
    fn finite_difference_over_elapsed_seconds() {
        let prev = frame_with_wrist(0.5, 0.5, 0.0);
        let cur = frame_with_wrist(0.6, 0.4, 0.0);
        let v = estimate_velocity(&cur, Some(&prev), 0.1);
        assert!((v.vx - 1.0).abs() < 1e-4);
        assert!((v.vy + 1.0).abs() < 1e-4);
        assert!((v.speed - 2.0f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn cleared_estimator_restarts_from_zero() {
        let mut estimator = VelocityEstimator::new();
        estimator.update(&frame_with_wrist(0.1, 0.1, 0.0), 1.0);
        estimator.clear();
        assert!(!estimator.has_previous());

        let v = estimator.update(&frame_with_wrist(0.9, 0.9, 0.0), 1.1);
        assert_eq!(v, Velocity::ZERO);
    }

    proptest! {
        #[test]
        fn zero_elapsed_is_always_zero(
            ax in 0.0f32..1.0, ay in 0.0f32..1.0, az in -1.0f32..1.0,
            bx in 0.0f32..1.0, by in 0.0f32..1.0, bz in -1.0f32..1.0,
        ) {
            let prev = frame_with_wrist(ax, ay, az);
            let cur = frame_with_wrist(bx, by, bz);
            prop_assert_eq!(estimate_velocity(&cur, Some(&prev), 0.0), Velocity::ZERO);
        }
    }
}

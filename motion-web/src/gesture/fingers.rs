//! Finger pose - which non-thumb fingers are extended
//!
//! A finger is straight when the direct base-to-tip distance is close to the
//! summed length of its three segments.

use super::types::{
    HandFrame, Landmark, INDEX_DIP, INDEX_MCP, INDEX_PIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_DIP,
    MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, PINKY_DIP, PINKY_MCP, PINKY_PIP, PINKY_TIP, RING_DIP,
    RING_MCP, RING_PIP, RING_TIP,
};

/// Ratio above which a finger counts as straight
pub const STRAIGHT_RATIO: f32 = 0.85;

/// Joint path shorter than this is treated as a collapsed finger
const MIN_PATH_LENGTH: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Base, two joints, tip
    pub fn joints(&self) -> [usize; 4] {
        match self {
            Finger::Index => [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP],
            Finger::Middle => [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring => [RING_MCP, RING_PIP, RING_DIP, RING_TIP],
            Finger::Pinky => [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP],
        }
    }

    fn slot(&self) -> usize {
        match self {
            Finger::Index => 0,
            Finger::Middle => 1,
            Finger::Ring => 2,
            Finger::Pinky => 3,
        }
    }
}

/// Direct distance over joint path length, in (0, 1] for a real finger
///
/// Returns 0.0 for a degenerate finger whose joints all coincide.
pub fn straightness_ratio(landmarks: &[Landmark; LANDMARK_COUNT], finger: Finger) -> f32 {
    let [base, joint1, joint2, tip] = finger.joints().map(|i| landmarks[i]);

    let path = base.distance(&joint1) + joint1.distance(&joint2) + joint2.distance(&tip);
    if path < MIN_PATH_LENGTH {
        return 0.0;
    }

    // Triangle inequality holds up to float rounding
    (base.distance(&tip) / path).min(1.0)
}

/// Straight/curled state of the four non-thumb fingers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerPose {
    straight: [bool; 4],
}

impl FingerPose {
    pub fn from_straight(index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self {
            straight: [index, middle, ring, pinky],
        }
    }

    pub fn is_straight(&self, finger: Finger) -> bool {
        self.straight[finger.slot()]
    }

    /// Number of straight fingers (0-4)
    pub fn count(&self) -> usize {
        self.straight.iter().filter(|s| **s).count()
    }

    /// Index extended, all others curled
    pub fn index_only(&self) -> bool {
        self.straight == [true, false, false, false]
    }
}

/// Classify every finger of a frame
pub fn classify_fingers(frame: &HandFrame) -> FingerPose {
    let mut pose = FingerPose::default();
    for finger in Finger::ALL {
        pose.straight[finger.slot()] = straightness_ratio(&frame.landmarks, finger) > STRAIGHT_RATIO;
    }
    pose
}


#[cfg(test)]
mod tests {
    use super::test_hands::hand;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn straight_finger_ratio_is_one() {
        let frame = hand(true, false, false, false, (0.5, 0.9));
        let ratio = straightness_ratio(&frame.landmarks, Finger::Index);
        assert!((ratio - 1.0).abs() < 1e-5);
    }

    #[test]
    fn curled_finger_is_not_straight() {
        let frame = hand(true, false, false, false, (0.5, 0.9));
        assert!(straightness_ratio(&frame.landmarks, Finger::Middle) < STRAIGHT_RATIO);
    }

    #[test]
    fn pose_counts_and_identifies_fingers() {
        let pose = classify_fingers(&hand(true, true, false, false, (0.5, 0.9)));
        assert_eq!(pose.count(), 2);
        assert!(pose.is_straight(Finger::Index));
        assert!(pose.is_straight(Finger::Middle));
        assert!(!pose.index_only());

        let pose = classify_fingers(&hand(true, false, false, false, (0.5, 0.9)));
        assert!(pose.index_only());
    }

    #[test]
    fn collapsed_finger_is_zero() {
        let landmarks = [Landmark::new(0.3, 0.3, 0.0); LANDMARK_COUNT];
        assert_eq!(straightness_ratio(&landmarks, Finger::Ring), 0.0);
    }

    fn point() -> impl Strategy<Value = Landmark> {
        (0.0f32..1.0, 0.0f32..1.0, -0.5f32..0.5).prop_map(|(x, y, z)| Landmark::new(x, y, z))
    }

    proptest! {
        #[test]
        fn ratio_stays_in_unit_interval(base in point(), j1 in point(), j2 in point(), tip in point()) {
            let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
            let [b, p, d, t] = Finger::Pinky.joints();
            landmarks[b] = base;
            landmarks[p] = j1;
            landmarks[d] = j2;
            landmarks[t] = tip;

            let ratio = straightness_ratio(&landmarks, Finger::Pinky);
            prop_assert!(ratio <= 1.0);
            prop_assert!(ratio >= 0.0);
            if base.distance(&tip) > 1e-3 {
                prop_assert!(ratio > 0.0);
            }
        }
    }
}

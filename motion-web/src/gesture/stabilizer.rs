//! Majority-vote smoothing over the last few raw gestures
//!
//! Fixed-size ring buffer; suppresses single-frame misclassification.

use super::types::GestureType;

/// Number of raw classifications in the voting window
pub const HISTORY_SIZE: usize = 5;

/// Rolling gesture history with majority output
pub struct GestureStabilizer {
    /// Circular buffer of raw gestures
    history: [GestureType; HISTORY_SIZE],

    /// Current write position (points to next slot to write)
    write_index: usize,

    /// Number of valid entries (saturates at HISTORY_SIZE)
    len: usize,
}

impl GestureStabilizer {
    pub fn new() -> Self {
        Self {
            history: [GestureType::None; HISTORY_SIZE],
            write_index: 0,
            len: 0,
        }
    }

    /// Push a raw gesture and return the stable one
    pub fn push(&mut self, raw: GestureType) -> GestureType {
        self.history[self.write_index] = raw;
        self.write_index = (self.write_index + 1) % HISTORY_SIZE;
        self.len = (self.len + 1).min(HISTORY_SIZE);
        self.most_frequent()
    }

    /// Most frequent gesture in the window
    ///
    /// Ties go to the gesture whose first occurrence (oldest to newest) comes
    /// first.
    pub fn most_frequent(&self) -> GestureType {
        if self.len == 0 {
            return GestureType::None;
        }

        let mut counts = [0u8; GestureType::ALL.len()];
        let mut order = [GestureType::None; HISTORY_SIZE];
        let mut distinct = 0;

        for gesture in self.chronological() {
            let slot = &mut counts[gesture.index()];
            if *slot == 0 {
                order[distinct] = gesture;
                distinct += 1;
            }
            *slot += 1;
        }

        let mut best = GestureType::None;
        let mut best_count = 0;
        for gesture in &order[..distinct] {
            let count = counts[gesture.index()];
            if count > best_count {
                best_count = count;
                best = *gesture;
            }
        }
        best
    }

    /// Entries from oldest to newest
    fn chronological(&self) -> impl Iterator<Item = GestureType> + '_ {
        let start = if self.len < HISTORY_SIZE { 0 } else { self.write_index };
        (0..self.len).map(move |i| self.history[(start + i) % HISTORY_SIZE])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.history = [GestureType::None; HISTORY_SIZE];
        self.write_index = 0;
        self.len = 0;
    }
}

impl Default for GestureStabilizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_none() {
        assert_eq!(GestureStabilizer::new().most_frequent(), GestureType::None);
    }

    #[test]
    fn identical_history_returns_that_gesture() {
        for gesture in GestureType::ALL {
            let mut stabilizer = GestureStabilizer::new();
            let mut out = GestureType::None;
            for _ in 0..HISTORY_SIZE {
                out = stabilizer.push(gesture);
            }
            assert_eq!(out, gesture);
        }
    }

    #[test]
    fn single_glitch_is_suppressed() {
        let mut stabilizer = GestureStabilizer::new();
        for _ in 0..4 {
            stabilizer.push(GestureType::Gun);
        }
        assert_eq!(stabilizer.push(GestureType::Whip), GestureType::Gun);
    }

    #[test]
    fn tie_goes_to_first_seen() {
        let mut stabilizer = GestureStabilizer::new();
        stabilizer.push(GestureType::Throw);
        assert_eq!(stabilizer.push(GestureType::Gun), GestureType::Throw);

        stabilizer.push(GestureType::Gun);
        assert_eq!(stabilizer.push(GestureType::Throw), GestureType::Throw);
    }

    #[test]
    fn oldest_entry_is_evicted() {
        let mut stabilizer = GestureStabilizer::new();
        // Window after six pushes: [Gun, Gun, Whip, Whip, Whip] -> first Shoot dropped
        for g in [
            GestureType::Shoot,
            GestureType::Gun,
            GestureType::Gun,
            GestureType::Whip,
            GestureType::Whip,
        ] {
            stabilizer.push(g);
        }
        assert_eq!(stabilizer.len(), HISTORY_SIZE);
        assert_eq!(stabilizer.push(GestureType::Whip), GestureType::Whip);

        // [Gun, Whip, Whip, Whip, Gun]: order of first appearance is Gun then Whip
        assert_eq!(stabilizer.push(GestureType::Gun), GestureType::Whip);
    }
}

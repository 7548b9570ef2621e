//! Mode contract shared by every game mode

use std::fmt;
use std::str::FromStr;

use super::scene::ModeOutput;
use crate::error::GameError;
use crate::gesture::GestureEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Shooting,
    Basketball,
    Whip,
}

impl ModeKind {
    pub const ALL: [ModeKind; 3] = [ModeKind::Shooting, ModeKind::Basketball, ModeKind::Whip];

    pub fn index(&self) -> usize {
        match self {
            ModeKind::Shooting => 0,
            ModeKind::Basketball => 1,
            ModeKind::Whip => 2,
        }
    }

    /// Identifier used by the UI buttons
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Shooting => "gun",
            ModeKind::Basketball => "basketball",
            ModeKind::Whip => "whip",
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GameError::UnknownMode(s.to_string()))
    }
}

/// A game mode: owns its entities, consumes one gesture per tick
///
/// Lifecycle is `Inactive -> Active` on `activate` and back on `deactivate`.
/// `deactivate` cancels every pending task and removes every entity, so
/// calling it twice is harmless. `dispose` does the same regardless of state.
pub trait Mode {
    fn kind(&self) -> ModeKind;

    fn activate(&mut self, out: &mut ModeOutput);

    fn deactivate(&mut self, out: &mut ModeOutput);

    /// Advance by `dt` seconds with this tick's stable gesture, if any
    fn update(&mut self, dt: f32, gesture: Option<&GestureEvent>, out: &mut ModeOutput);

    fn dispose(&mut self, out: &mut ModeOutput) {
        self.deactivate(out);
    }

    fn is_active(&self) -> bool;

    /// Entities currently spawned in the scene
    fn entity_count(&self) -> usize;

    fn pending_tasks(&self) -> usize;
}

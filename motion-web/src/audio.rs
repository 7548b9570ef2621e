//! Sound cues and load tracking
//!
//! Playback happens in JavaScript. Rust only names the cue and drops it
//! (with a warning) while the sample is still loading.

use std::collections::HashSet;
use std::str::FromStr;

use tracing::warn;

use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    GunShot,
    BallThrow,
    Swish,
    Applause,
    WhipCrack,
}

impl SoundCue {
    pub const ALL: [SoundCue; 5] = [
        SoundCue::GunShot,
        SoundCue::BallThrow,
        SoundCue::Swish,
        SoundCue::Applause,
        SoundCue::WhipCrack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::GunShot => "gun-shot",
            SoundCue::BallThrow => "ball-throw",
            SoundCue::Swish => "swish",
            SoundCue::Applause => "applause",
            SoundCue::WhipCrack => "whip-crack",
        }
    }
}

impl FromStr for SoundCue {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundCue::ALL
            .into_iter()
            .find(|cue| cue.as_str() == s)
            .ok_or_else(|| GameError::UnknownSound(s.to_string()))
    }
}

/// Tracks which samples the sound engine has finished loading
#[derive(Default)]
pub struct SoundBank {
    loaded: HashSet<SoundCue>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loaded(&mut self, cue: SoundCue) {
        self.loaded.insert(cue);
    }

    pub fn is_loaded(&self, cue: SoundCue) -> bool {
        self.loaded.contains(&cue)
    }

    /// Whether a play request should reach the sound engine
    pub fn play(&self, cue: SoundCue) -> bool {
        if !self.is_loaded(cue) {
            warn!(cue = cue.as_str(), "sound not loaded yet");
            return false;
        }
        true
    }
}

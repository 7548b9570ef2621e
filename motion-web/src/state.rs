//! App-level state shared with the UI
//!
//! Tracks the current mode, whether a hand is in view and the last stable
//! gesture. Changes are queued as `AppEvent`s for the bridge to drain.

use crate::gesture::GestureType;
use crate::modes::ModeKind;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AppEvent {
    ModeChange(ModeKind),
    GestureChange(GestureType),
    HandDetectionChange(bool),
}

impl AppEvent {
    /// Event name the UI listens for
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::ModeChange(_) => "modeChange",
            AppEvent::GestureChange(_) => "gestureChange",
            AppEvent::HandDetectionChange(_) => "handDetectionChange",
        }
    }

    pub fn value(&self) -> String {
        match self {
            AppEvent::ModeChange(kind) => kind.as_str().to_string(),
            AppEvent::GestureChange(gesture) => gesture.as_str().to_string(),
            AppEvent::HandDetectionChange(detected) => detected.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppState {
    pub current_mode: ModeKind,
    pub hand_detected: bool,
    pub last_gesture: GestureType,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_mode: ModeKind::Shooting,
            hand_detected: false,
            last_gesture: GestureType::None,
        }
    }
}

#[derive(Default)]
pub struct StateManager {
    state: AppState,
    pending: Vec<AppEvent>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// Always emits, even when the mode is unchanged
    pub fn set_mode(&mut self, mode: ModeKind) {
        self.state.current_mode = mode;
        self.pending.push(AppEvent::ModeChange(mode));
    }

    pub fn set_hand_detected(&mut self, detected: bool) {
        if self.state.hand_detected != detected {
            self.state.hand_detected = detected;
            self.pending.push(AppEvent::HandDetectionChange(detected));
        }
    }

    pub fn set_last_gesture(&mut self, gesture: GestureType) {
        if self.state.last_gesture != gesture {
            self.state.last_gesture = gesture;
            self.pending.push(AppEvent::GestureChange(gesture));
        }
    }

    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.pending)
    }
}

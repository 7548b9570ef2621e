//! Error types surfaced to callers
//!
//! Nothing here is fatal: the worst outcome is a dropped cue or a missed
//! action for one tick.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::modes::ModeKind;

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("mode `{}` is not registered", .0.as_str())]
    ModeNotRegistered(ModeKind),

    #[error("unknown mode identifier `{0}`")]
    UnknownMode(String),

    #[error("invalid landmark data length: {0} (expected 63)")]
    InvalidLandmarkData(usize),

    #[error("unknown sound cue `{0}`")]
    UnknownSound(String),

    #[error("game not initialized")]
    NotInitialized,
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

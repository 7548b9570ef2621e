//! Motion Web - hand-gesture motion game
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod audio;
mod bridge;
pub mod config;
pub mod error;
pub mod game;
pub mod gesture;
pub mod modes;
pub mod state;

use tracing_subscriber::filter::LevelFilter;
use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    current_mode, detect_platform, dispose, drain_cues, drain_game_events, drain_scene_commands, drain_sounds,
    drain_ui_events, init, mark_sound_loaded, score, set_mode, tick,
};
pub use bridge::{
    encode_cues, encode_scene, init_logging, ConsoleLayer, CUE_BURST, CUE_HOOP_PULSE, CUE_STRIDE, OP_CAMERA,
    OP_REMOVE, OP_SPAWN, OP_TRAIL, OP_UPDATE, SCENE_STRIDE,
};
pub use error::GameError;
pub use game::Game;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    init_logging(level);
}

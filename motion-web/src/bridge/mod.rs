//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console;
mod game_loop;
mod platform;

pub use console::{init_logging, ConsoleLayer};
pub use game_loop::{
    // WASM entry points
    current_mode,
    dispose,
    drain_cues,
    drain_game_events,
    drain_scene_commands,
    drain_sounds,
    drain_ui_events,
    init,
    mark_sound_loaded,
    score,
    set_mode,
    tick,
    // Wire format
    encode_cues,
    encode_scene,
    CUE_BURST,
    CUE_HOOP_PULSE,
    CUE_STRIDE,
    OP_CAMERA,
    OP_REMOVE,
    OP_SPAWN,
    OP_TRAIL,
    OP_UPDATE,
    SCENE_STRIDE,
};
pub use platform::detect_platform;

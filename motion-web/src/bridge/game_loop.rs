//! Game loop bridge - per-frame entry points for JavaScript
//!
//! JS calls `tick` once per animation frame with the latest hand landmarks,
//! then drains scene commands, cues, sounds and UI events and applies them
//! to the renderer, sound engine and DOM.

use std::cell::RefCell;

use tracing::warn;
use wasm_bindgen::prelude::*;

use super::platform::detect_platform;
use crate::audio::SoundCue;
use crate::config::PlatformProfile;
use crate::error::GameError;
use crate::game::Game;
use crate::gesture::{HandFrame, Handedness};
use crate::modes::{Cue, ModeKind, SceneCommand, Transform};

// ============================================================================
// WIRE FORMAT
// ============================================================================

/// Scene opcodes (first value of each record)
pub const OP_SPAWN: f64 = 0.0;
pub const OP_UPDATE: f64 = 1.0;
pub const OP_REMOVE: f64 = 2.0;
pub const OP_CAMERA: f64 = 3.0;
pub const OP_TRAIL: f64 = 4.0;

/// Values per fixed-size scene record:
/// `[op, id, kind, visible, opacity, px, py, pz, rx, ry, rz]`
pub const SCENE_STRIDE: usize = 11;

/// Values per cue record: `[type, effect, slot, x, y, z, speed]`
pub const CUE_STRIDE: usize = 7;
pub const CUE_BURST: f64 = 0.0;
pub const CUE_HOOP_PULSE: f64 = 1.0;

fn push_record(buf: &mut Vec<f64>, op: f64, id: u32, kind: f64, visible: bool, opacity: f32, t: &Transform) {
    buf.extend_from_slice(&[
        op,
        f64::from(id),
        kind,
        if visible { 1.0 } else { 0.0 },
        f64::from(opacity),
    ]);
    buf.extend(t.position.iter().chain(t.rotation.iter()).map(|&v| f64::from(v)));
}

/// Flatten scene commands for JS
///
/// Spawn, update, remove and camera records are `SCENE_STRIDE` long.
/// Trail records are `[OP_TRAIL, id, n, x0, y0, z0, ...]` with `n` points.
pub fn encode_scene(commands: &[SceneCommand]) -> Vec<f64> {
    let mut buf = Vec::with_capacity(commands.len() * SCENE_STRIDE);
    for command in commands {
        match command {
            SceneCommand::Spawn {
                id,
                kind,
                transform,
                visible,
            } => push_record(&mut buf, OP_SPAWN, id.0, f64::from(kind.code()), *visible, 1.0, transform),
            SceneCommand::Update {
                id,
                transform,
                visible,
                opacity,
            } => push_record(&mut buf, OP_UPDATE, id.0, 0.0, *visible, *opacity, transform),
            SceneCommand::Remove { id } => {
                push_record(&mut buf, OP_REMOVE, id.0, 0.0, false, 0.0, &Transform::at(Default::default()))
            }
            SceneCommand::CameraOffset(offset) => {
                push_record(&mut buf, OP_CAMERA, 0, 0.0, true, 1.0, &Transform::at(*offset))
            }
            SceneCommand::Trail { id, points } => {
                buf.extend_from_slice(&[OP_TRAIL, f64::from(id.0), points.len() as f64]);
                buf.extend(points.iter().flat_map(|p| p.iter()).map(|&v| f64::from(v)));
            }
        }
    }
    buf
}

/// Flatten visual cues for JS, `CUE_STRIDE` values each
pub fn encode_cues(cues: &[Cue]) -> Vec<f64> {
    let mut buf = Vec::with_capacity(cues.len() * CUE_STRIDE);
    for cue in cues {
        match cue {
            Cue::Burst {
                effect,
                slot,
                position,
                speed,
            } => buf.extend_from_slice(&[
                CUE_BURST,
                f64::from(effect.code()),
                *slot as f64,
                f64::from(position.x),
                f64::from(position.y),
                f64::from(position.z),
                f64::from(*speed),
            ]),
            Cue::HoopPulse => buf.extend_from_slice(&[CUE_HOOP_PULSE, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Cue::Sound(_) => {}
        }
    }
    buf
}

// ============================================================================
// STATE
// ============================================================================

thread_local! {
    static GAME: RefCell<Option<Game>> = RefCell::new(None);
}

fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Result<R, GameError> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f).ok_or(GameError::NotInitialized))
}

// ============================================================================
// WASM API
// ============================================================================

/// Detect the platform, build the game and activate the first mode
#[wasm_bindgen]
pub fn init() -> Result<(), JsValue> {
    let profile = PlatformProfile::for_platform(detect_platform());
    let mut game = Game::new(profile, js_sys::Date::now() as u64);
    game.start()?;

    GAME.with(|cell| {
        let mut slot = cell.borrow_mut();
        if let Some(previous) = slot.take() {
            game.take_over(previous);
        }
        *slot = Some(game);
    });
    Ok(())
}

/// Advance one frame
///
/// `landmarks` is a flat `Float32Array` of 63 values, or empty when no hand
/// is in view. Returns the stable gesture name, if any.
#[wasm_bindgen]
pub fn tick(landmarks: &[f32], confidence: f32, is_right_hand: bool, dt: f32) -> Result<Option<String>, JsValue> {
    let handedness = if is_right_hand { Handedness::Right } else { Handedness::Left };
    let frame = if landmarks.is_empty() {
        None
    } else {
        match HandFrame::from_flat(landmarks, handedness, confidence) {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!(%err, "dropping hand frame");
                None
            }
        }
    };

    let now = js_sys::Date::now() / 1000.0;
    let gesture = with_game(|game| game.tick(frame.as_ref(), now, dt))?;
    Ok(gesture.map(|g| g.gesture.as_str().to_string()))
}

/// Switch mode by UI name (`gun`, `basketball`, `whip`)
#[wasm_bindgen]
pub fn set_mode(name: &str) -> Result<(), JsValue> {
    let kind: ModeKind = name.parse()?;
    with_game(|game| game.switch_mode(kind))??;
    Ok(())
}

#[wasm_bindgen]
pub fn current_mode() -> Option<String> {
    with_game(|game| game.current_mode())
        .ok()
        .flatten()
        .map(|kind| kind.as_str().to_string())
}

/// Called by the sound engine once a sample has decoded
#[wasm_bindgen]
pub fn mark_sound_loaded(name: &str) -> Result<(), JsValue> {
    let cue: SoundCue = name.parse()?;
    with_game(|game| game.mark_sound_loaded(cue))?;
    Ok(())
}

#[wasm_bindgen]
pub fn drain_scene_commands() -> Result<Vec<f64>, JsValue> {
    let commands = with_game(|game| game.drain_scene())?;
    Ok(encode_scene(&commands))
}

#[wasm_bindgen]
pub fn drain_cues() -> Result<Vec<f64>, JsValue> {
    let cues = with_game(|game| game.drain_cues())?;
    Ok(encode_cues(&cues))
}

/// Sound cue names to play this frame
#[wasm_bindgen]
pub fn drain_sounds() -> Result<js_sys::Array, JsValue> {
    let sounds = with_game(|game| game.drain_sounds())?;
    Ok(sounds.iter().map(|s| JsValue::from_str(s.as_str())).collect())
}

/// `[name, value]` pairs for the UI
#[wasm_bindgen]
pub fn drain_ui_events() -> Result<js_sys::Array, JsValue> {
    let events = with_game(|game| game.drain_ui_events())?;
    Ok(events
        .iter()
        .map(|e| js_sys::Array::of2(&JsValue::from_str(e.name()), &JsValue::from_str(&e.value())))
        .collect())
}

/// Gameplay event names (`shotFired`, `targetHit`, ...)
#[wasm_bindgen]
pub fn drain_game_events() -> Result<js_sys::Array, JsValue> {
    let events = with_game(|game| game.drain_events())?;
    Ok(events.iter().map(|e| JsValue::from_str(e.name())).collect())
}

#[wasm_bindgen]
pub fn score() -> u32 {
    with_game(|game| game.score()).unwrap_or(0)
}

/// Tear down every mode; removal commands stay drainable
#[wasm_bindgen]
pub fn dispose() {
    if with_game(|game| game.dispose()).is_err() {
        warn!("dispose called before init");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{EffectKind, EntityId, EntityKind, Vec3};

    #[test]
    fn fixed_records_use_scene_stride() {
        let commands = vec![
            SceneCommand::Spawn {
                id: EntityId(7),
                kind: EntityKind::Hoop,
                transform: Transform::at(Vec3::new(0.0, 2.2, -6.0)),
                visible: true,
            },
            SceneCommand::Remove { id: EntityId(7) },
            SceneCommand::CameraOffset(Vec3::new(0.01, -0.02, 0.0)),
        ];
        let buf = encode_scene(&commands);
        assert_eq!(buf.len(), 3 * SCENE_STRIDE);
        assert_eq!(buf[0], OP_SPAWN);
        assert_eq!(buf[1], 7.0);
        assert_eq!(buf[2], f64::from(EntityKind::Hoop.code()));
        assert_eq!(buf[3], 1.0);
        assert_eq!(buf[SCENE_STRIDE], OP_REMOVE);
        assert_eq!(buf[2 * SCENE_STRIDE], OP_CAMERA);
    }

    #[test]
    fn trail_records_carry_point_count() {
        let commands = vec![SceneCommand::Trail {
            id: EntityId(3),
            points: vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)],
        }];
        assert_eq!(
            encode_scene(&commands),
            vec![OP_TRAIL, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn sound_cues_are_not_encoded_as_visuals() {
        let cues = vec![
            Cue::Sound(SoundCue::Swish),
            Cue::HoopPulse,
            Cue::Burst {
                effect: EffectKind::Score,
                slot: 2,
                position: Vec3::new(0.7, 2.2, -6.0),
                speed: 25.0,
            },
        ];
        let buf = encode_cues(&cues);
        assert_eq!(buf.len(), 2 * CUE_STRIDE);
        assert_eq!(buf[0], CUE_HOOP_PULSE);
        assert_eq!(buf[CUE_STRIDE], CUE_BURST);
        assert_eq!(buf[CUE_STRIDE + 2], 2.0);
    }
}

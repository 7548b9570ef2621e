//! Scene output - what a mode tells the renderer, sound engine and UI
//!
//! Modes never touch the renderer directly. Each tick they append commands
//! and cues to a `ModeOutput` which the bridge drains for JavaScript.

use nalgebra::Vector3;

use super::mode::ModeKind;
use crate::audio::SoundCue;

pub type Vec3 = Vector3<f32>;

/// Camera position in world space
pub fn camera_position() -> Vec3 {
    Vec3::new(0.0, 1.6, 3.0)
}

/// Renderer-facing entity id, unique across modes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

impl EntityId {
    const SERIAL_BITS: u32 = 24;

    pub fn new(mode: ModeKind, serial: u32) -> Self {
        EntityId(((mode.index() as u32) << Self::SERIAL_BITS) | (serial & ((1 << Self::SERIAL_BITS) - 1)))
    }
}

/// Allocates ids within one mode's namespace
pub struct EntityIds {
    mode: ModeKind,
    next: u32,
}

impl EntityIds {
    pub fn new(mode: ModeKind) -> Self {
        Self { mode, next: 0 }
    }

    pub fn next(&mut self) -> EntityId {
        let id = EntityId::new(self.mode, self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Bullet,
    RingTarget,
    HumanoidTarget,
    Ball,
    Hoop,
    WhipTrail,
}

impl EntityKind {
    pub fn code(&self) -> u32 {
        match self {
            EntityKind::Bullet => 0,
            EntityKind::RingTarget => 1,
            EntityKind::HumanoidTarget => 2,
            EntityKind::Ball => 3,
            EntityKind::Hoop => 4,
            EntityKind::WhipTrail => 5,
        }
    }
}

/// Position plus Euler rotation (radians)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::zeros(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    Spawn {
        id: EntityId,
        kind: EntityKind,
        transform: Transform,
        visible: bool,
    },
    Update {
        id: EntityId,
        transform: Transform,
        visible: bool,
        opacity: f32,
    },
    Remove {
        id: EntityId,
    },
    /// Full replacement of a trail polyline
    Trail {
        id: EntityId,
        points: Vec<Vec3>,
    },
    /// Offset added to the base camera position
    CameraOffset(Vec3),
}

/// Which particle palette a burst uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Explosion,
    Electric,
    Score,
    BallTrail,
}

impl EffectKind {
    pub fn code(&self) -> u32 {
        match self {
            EffectKind::Explosion => 0,
            EffectKind::Electric => 1,
            EffectKind::Score => 2,
            EffectKind::BallTrail => 3,
        }
    }
}

/// One-shot audio/visual cue
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    Sound(SoundCue),
    Burst {
        effect: EffectKind,
        /// Particle system index within the mode's budget
        slot: usize,
        position: Vec3,
        speed: f32,
    },
    HoopPulse,
}

/// Gameplay outcomes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    ShotFired { id: EntityId },
    TargetHit { id: EntityId, position: Vec3 },
    TargetsSpawned { count: usize },
    BallThrown { power: f32 },
    Scored { total: u32 },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::ShotFired { .. } => "shotFired",
            GameEvent::TargetHit { .. } => "targetHit",
            GameEvent::TargetsSpawned { .. } => "targetsSpawned",
            GameEvent::BallThrown { .. } => "ballThrown",
            GameEvent::Scored { .. } => "scored",
        }
    }
}

/// Everything produced during one tick
#[derive(Debug, Default)]
pub struct ModeOutput {
    pub scene: Vec<SceneCommand>,
    pub cues: Vec<Cue>,
    pub events: Vec<GameEvent>,
}

impl ModeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.cues.push(Cue::Sound(cue));
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty() && self.cues.is_empty() && self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.scene.clear();
        self.cues.clear();
        self.events.clear();
    }

    /// Move everything out, leaving this output empty
    pub fn take(&mut self) -> ModeOutput {
        std::mem::take(self)
    }

    pub fn sounds(&self) -> impl Iterator<Item = SoundCue> + '_ {
        self.cues.iter().filter_map(|cue| match cue {
            Cue::Sound(sound) => Some(*sound),
            _ => None,
        })
    }

    pub fn bursts(&self) -> impl Iterator<Item = (EffectKind, usize, Vec3)> + '_ {
        self.cues.iter().filter_map(|cue| match cue {
            Cue::Burst { effect, slot, position, .. } => Some((*effect, *slot, *position)),
            _ => None,
        })
    }
}

/// Camera-to-target helper: normalized landmark to world position
///
/// x spans ±5 units, y spans 0..5 (minus `y_offset`), z is scaled relative depth.
pub fn landmark_to_world(x: f32, y: f32, z: f32, y_offset: f32) -> Vec3 {
    Vec3::new((x - 0.5) * 10.0, (1.0 - y) * 5.0 - y_offset, z * -5.0)
}

/// Horizontal row of `count` positions centered on x = 0
pub fn row_positions(count: usize, spacing: f32, y: f32, z: f32) -> Vec<Vec3> {
    let start_x = -((count as f32 - 1.0) * spacing) / 2.0;
    (0..count)
        .map(|i| Vec3::new(start_x + i as f32 * spacing, y, z))
        .collect()
}

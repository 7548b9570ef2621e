//! Modes module - per-mode interaction state machines
//!
//! Re-exports only. All logic in submodules.

mod basketball;
mod effects;
mod mode;
mod pool;
mod registry;
pub mod scene;
mod scheduler;
mod shooting;
mod targets;
mod whip;

pub use basketball::{hoop_position, passes_through_rim, BasketballMode};
pub use effects::{BurstSpec, BurstStage, CameraShake, ELECTRIC_STAGES, EXPLOSION_STAGES, SCORE_STAGES};
pub use mode::{Mode, ModeKind};
pub use pool::{Projectile, ProjectilePool};
pub use registry::ModeRegistry;
pub use scene::{
    camera_position, Cue, EffectKind, EntityId, EntityKind, GameEvent, ModeOutput, SceneCommand, Transform, Vec3,
};
pub use scheduler::{Scheduler, TaskHandle};
pub use shooting::ShootingMode;
pub use targets::{Target, TargetShape};
pub use whip::{WhipMode, WhipTrail};

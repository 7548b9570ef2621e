//! Destructible targets and their teardown animation

use super::scene::{EntityId, EntityKind, SceneCommand, Transform, Vec3};

/// Added to the fall speed every teardown tick
pub const FALL_ACCELERATION: f32 = 0.02;
pub const FADE_STEP: f32 = 0.01;
/// Hidden once opacity drops to this
pub const FADE_FLOOR: f32 = 0.01;
/// Hidden once the target falls to this height
pub const FALL_FLOOR: f32 = -5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetShape {
    Ring,
    Humanoid,
}

impl TargetShape {
    /// Per-tick rotation (x, z) while tumbling down
    fn spin(&self) -> (f32, f32) {
        match self {
            TargetShape::Ring => (0.1, 0.05),
            TargetShape::Humanoid => (0.15, 0.105),
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            TargetShape::Ring => EntityKind::RingTarget,
            TargetShape::Humanoid => EntityKind::HumanoidTarget,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Target {
    pub id: EntityId,
    pub shape: TargetShape,
    pub position: Vec3,
    pub rotation: Vec3,
    pub opacity: f32,
    fall_speed: f32,
    /// Lateral drift per tick (humanoids only)
    drift: Vec3,
    destroyed: bool,
    visible: bool,
}

impl Target {
    pub fn new(id: EntityId, shape: TargetShape, position: Vec3) -> Self {
        Self {
            id,
            shape,
            position,
            rotation: Vec3::zeros(),
            opacity: 1.0,
            fall_speed: 0.0,
            drift: Vec3::zeros(),
            destroyed: false,
            visible: true,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mark destroyed and start tearing down. False if it was already hit.
    pub fn hit(&mut self, drift: Vec3) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.drift = drift;
        true
    }

    /// Advance the teardown by one tick; returns whether anything moved
    pub fn step_teardown(&mut self) -> bool {
        if !self.destroyed || !self.visible {
            return false;
        }

        let (spin_x, spin_z) = self.shape.spin();
        self.fall_speed += FALL_ACCELERATION;
        self.position.y -= self.fall_speed;
        self.position.x += self.drift.x;
        self.position.z += self.drift.z;
        self.rotation.x += spin_x;
        self.rotation.z += spin_z;
        self.opacity = (self.opacity - FADE_STEP).max(0.0);

        if self.position.y <= FALL_FLOOR || self.opacity <= FADE_FLOOR {
            self.visible = false;
        }
        true
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
        }
    }

    pub fn spawn_command(&self) -> SceneCommand {
        SceneCommand::Spawn {
            id: self.id,
            kind: self.shape.entity_kind(),
            transform: self.transform(),
            visible: self.visible,
        }
    }

    pub fn update_command(&self) -> SceneCommand {
        SceneCommand::Update {
            id: self.id,
            transform: self.transform(),
            visible: self.visible,
            opacity: self.opacity,
        }
    }
}

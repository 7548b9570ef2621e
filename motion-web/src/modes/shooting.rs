//! Target shooting: aim with the index finger, fire with a flick
//!
//! Bullets fly straight from the camera toward the fingertip and knock over
//! the first ring they pass within `HIT_RADIUS` of. A new row appears once
//! every ring of the previous row has been cleared away.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::effects::{emit_stage, play_staged, CameraShake, EXPLOSION_STAGES};
use super::mode::{Mode, ModeKind};
use super::pool::{Projectile, ProjectilePool};
use super::scene::{
    camera_position, landmark_to_world, row_positions, EffectKind, EntityId, EntityIds, EntityKind, GameEvent,
    ModeOutput, SceneCommand, Vec3,
};
use super::scheduler::Scheduler;
use super::targets::{Target, TargetShape};
use crate::audio::SoundCue;
use crate::config::PlatformProfile;
use crate::gesture::{GestureEvent, GestureType};

// ============================================================================
// TUNING
// ============================================================================

pub const BULLET_COUNT: usize = 10;
pub const BULLET_SPEED: f32 = 20.0;
/// Bullets further than this from the origin return to the pool
pub const MAX_RANGE: f32 = 50.0;
pub const HIT_RADIUS: f32 = 1.0;

pub const TARGET_SPACING: f32 = 3.0;
pub const TARGET_Y: f32 = 0.8;
pub const TARGET_Z: f32 = -6.0;
/// Aim sits slightly below the raw fingertip mapping
pub const AIM_Y_OFFSET: f32 = 0.8;

pub const TARGET_REMOVE_DELAY: f64 = 3.0;
pub const SHAKE_INTENSITY: f32 = 0.15;
pub const SHAKE_DURATION: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Task {
    Burst { stage: usize, origin: Vec3 },
    RemoveTarget(EntityId),
}

pub struct ShootingMode {
    profile: PlatformProfile,
    ids: EntityIds,
    bullets: ProjectilePool,
    targets: Vec<Target>,
    aim: Vec3,
    last_shot: Option<f64>,
    scheduler: Scheduler<Task>,
    shake: CameraShake,
    rng: StdRng,
    active: bool,
}

impl ShootingMode {
    pub fn new(profile: PlatformProfile, seed: u64) -> Self {
        let mut ids = EntityIds::new(ModeKind::Shooting);
        let bullets = ProjectilePool::new(BULLET_COUNT, &mut ids);
        Self {
            profile,
            ids,
            bullets,
            targets: Vec::new(),
            aim: Vec3::new(0.0, TARGET_Y, TARGET_Z),
            last_shot: None,
            scheduler: Scheduler::new(),
            shake: CameraShake::new(),
            rng: StdRng::seed_from_u64(seed),
            active: false,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn bullets(&self) -> &ProjectilePool {
        &self.bullets
    }

    /// World point the next bullet is aimed at
    pub fn aim(&self) -> Vec3 {
        self.aim
    }

    fn spawn_targets(&mut self, out: &mut ModeOutput) {
        if !self.active {
            return;
        }

        let positions = row_positions(self.profile.target_count, TARGET_SPACING, TARGET_Y, TARGET_Z);
        let count = positions.len();
        for position in positions {
            let target = Target::new(self.ids.next(), TargetShape::Ring, position);
            out.scene.push(target.spawn_command());
            self.targets.push(target);
        }
        out.events.push(GameEvent::TargetsSpawned { count });
        debug!(count, "ring targets spawned");
    }

    fn can_shoot(&self, now: f64) -> bool {
        match self.last_shot {
            Some(last) => now - last > f64::from(self.profile.shot_cooldown),
            None => true,
        }
    }

    fn shoot(&mut self, out: &mut ModeOutput) {
        let camera = camera_position();
        let direction = (self.aim - camera).try_normalize(f32::EPSILON).unwrap_or(-Vec3::z());

        let Some(bullet) = self.bullets.fire(camera, direction * BULLET_SPEED) else {
            debug!("bullet pool exhausted, shot ignored");
            return;
        };

        out.scene.push(bullet_command(bullet, true));
        out.events.push(GameEvent::ShotFired { id: bullet.id });
        out.sound(SoundCue::GunShot);
    }

    fn update_bullets(&mut self, dt: f32, out: &mut ModeOutput) {
        let mut spent = Vec::new();
        let mut hits = Vec::new();

        for bullet in self.bullets.flying_mut() {
            bullet.integrate(dt, 0.0);

            if bullet.position.norm() > MAX_RANGE {
                spent.push(bullet.id);
                continue;
            }

            // One target per bullet
            let struck = self
                .targets
                .iter_mut()
                .find(|t| !t.is_destroyed() && (bullet.position - t.position).norm() < HIT_RADIUS);

            match struck {
                Some(target) => {
                    target.hit(Vec3::zeros());
                    hits.push((target.id, target.position));
                    spent.push(bullet.id);
                }
                None => out.scene.push(bullet_command(bullet, true)),
            }
        }

        for id in spent {
            if self.bullets.release(id) {
                if let Some(bullet) = self.bullets.get(id) {
                    out.scene.push(bullet_command(bullet, false));
                }
            }
        }

        for (id, position) in hits {
            self.on_target_hit(id, position, out);
        }
    }

    fn on_target_hit(&mut self, id: EntityId, position: Vec3, out: &mut ModeOutput) {
        debug!(entity = id.0, "ring target hit");
        out.events.push(GameEvent::TargetHit { id, position });

        play_staged(
            &EXPLOSION_STAGES,
            EffectKind::Explosion,
            position,
            self.profile.explosion_slots,
            &mut self.scheduler,
            |stage, origin| Task::Burst { stage, origin },
            out,
        );
        self.shake.start(SHAKE_INTENSITY, SHAKE_DURATION);
        self.scheduler.schedule(TARGET_REMOVE_DELAY, Task::RemoveTarget(id));
    }

    fn run_task(&mut self, task: Task, out: &mut ModeOutput) {
        match task {
            Task::Burst { stage, origin } => {
                if let Some(stage) = EXPLOSION_STAGES.get(stage) {
                    emit_stage(stage, EffectKind::Explosion, origin, self.profile.explosion_slots, out);
                }
            }
            Task::RemoveTarget(id) => {
                if let Some(i) = self.targets.iter().position(|t| t.id == id) {
                    self.targets.remove(i);
                    out.scene.push(SceneCommand::Remove { id });
                }
                if self.targets.is_empty() {
                    self.spawn_targets(out);
                }
            }
        }
    }
}

fn bullet_command(bullet: &Projectile, visible: bool) -> SceneCommand {
    SceneCommand::Update {
        id: bullet.id,
        transform: bullet.transform(),
        visible,
        opacity: 1.0,
    }
}

impl Mode for ShootingMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Shooting
    }

    fn activate(&mut self, out: &mut ModeOutput) {
        if self.active {
            return;
        }
        self.active = true;

        for bullet in self.bullets.all() {
            out.scene.push(SceneCommand::Spawn {
                id: bullet.id,
                kind: EntityKind::Bullet,
                transform: bullet.transform(),
                visible: false,
            });
        }
        self.spawn_targets(out);
        info!(mode = %self.kind(), targets = self.targets.len(), "mode activated");
    }

    fn deactivate(&mut self, out: &mut ModeOutput) {
        let cancelled = self.scheduler.cancel_all();
        self.shake.stop(out);
        self.bullets.release_all();

        if self.active {
            for bullet in self.bullets.all() {
                out.scene.push(SceneCommand::Remove { id: bullet.id });
            }
        }
        for target in self.targets.drain(..) {
            out.scene.push(SceneCommand::Remove { id: target.id });
        }

        if self.active {
            info!(mode = %self.kind(), cancelled, "mode deactivated");
        }
        self.active = false;
    }

    fn update(&mut self, dt: f32, gesture: Option<&GestureEvent>, out: &mut ModeOutput) {
        if !self.active {
            return;
        }

        for task in self.scheduler.advance(f64::from(dt)) {
            self.run_task(task, out);
        }

        if let Some(event) = gesture.filter(|g| g.gesture.is_pointing()) {
            let p = event.position;
            self.aim = landmark_to_world(p.x, p.y, p.z, AIM_Y_OFFSET);
        }

        self.update_bullets(dt, out);

        for target in &mut self.targets {
            if target.step_teardown() {
                out.scene.push(target.update_command());
            }
        }

        let fires = gesture.is_some_and(|g| {
            g.gesture == GestureType::Shoot || (self.profile.gun_fires && g.gesture == GestureType::Gun)
        });
        if fires {
            let now = self.scheduler.now();
            if self.can_shoot(now) {
                self.shoot(out);
                self.last_shot = Some(now);
            }
        }

        self.shake.update(dt, &mut self.rng, out);
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn entity_count(&self) -> usize {
        let bullets = if self.active { self.bullets.capacity() } else { 0 };
        bullets + self.targets.len()
    }

    fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}

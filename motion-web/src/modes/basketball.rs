//! Basketball free throw
//!
//! An open-hand upward flick launches the ball from just below the camera
//! toward the hoop, lofted and scaled by hand speed. The ball follows
//! constant-gravity ballistics and scores when it drops through the rim
//! from above.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::effects::{emit_stage, play_staged, CameraShake, SCORE_STAGES};
use super::mode::{Mode, ModeKind};
use super::pool::{Projectile, ProjectilePool};
use super::scene::{
    camera_position, Cue, EffectKind, EntityId, EntityIds, EntityKind, GameEvent, ModeOutput, SceneCommand,
    Transform, Vec3,
};
use super::scheduler::Scheduler;
use crate::audio::SoundCue;
use crate::config::PlatformProfile;
use crate::gesture::{GestureEvent, GestureType};

// ============================================================================
// TUNING
// ============================================================================

pub const RIM_RADIUS: f32 = 0.5;
/// Fraction of the rim radius the ball center must pass within
pub const SCORE_RADIUS_FACTOR: f32 = 0.9;
pub const GRAVITY: f32 = -9.8;
/// Release point sits this far below the camera
pub const RELEASE_DROP: f32 = 0.3;
/// Added to the aim direction's y before renormalizing
pub const LOFT: f32 = 0.5;
/// Spin per tick around x and y
pub const BALL_SPIN: (f32, f32) = (0.1, 0.05);
pub const TRAIL_SPEED: f32 = 8.0;

pub const BALL_RESET_DELAY: f64 = 0.5;
pub const SHAKE_INTENSITY: f32 = 0.2;
pub const SHAKE_DURATION: f32 = 0.5;

pub fn hoop_position() -> Vec3 {
    Vec3::new(0.0, 2.2, -6.0)
}

/// Whether a ball moving from `previous` to `current` dropped through the rim
pub fn passes_through_rim(previous: Vec3, current: Vec3) -> bool {
    let rim = hoop_position();
    if previous.y <= rim.y || current.y > rim.y {
        return false;
    }
    let dx = current.x - rim.x;
    let dz = current.z - rim.z;
    (dx * dx + dz * dz).sqrt() < RIM_RADIUS * SCORE_RADIUS_FACTOR
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Task {
    Burst { stage: usize, origin: Vec3 },
    /// Reset the ball if it is still the same throw
    ResetBall(u32),
}

pub struct BasketballMode {
    profile: PlatformProfile,
    hoop: EntityId,
    ball: ProjectilePool,
    /// Incremented per throw so a late reset can't hit the next ball
    throws: u32,
    score: u32,
    scheduler: Scheduler<Task>,
    shake: CameraShake,
    rng: StdRng,
    active: bool,
}

impl BasketballMode {
    pub fn new(profile: PlatformProfile, seed: u64) -> Self {
        let mut ids = EntityIds::new(ModeKind::Basketball);
        let hoop = ids.next();
        let ball = ProjectilePool::new(1, &mut ids);
        Self {
            profile,
            hoop,
            ball,
            throws: 0,
            score: 0,
            scheduler: Scheduler::new(),
            shake: CameraShake::new(),
            rng: StdRng::seed_from_u64(seed),
            active: false,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ball_in_flight(&self) -> bool {
        self.ball.in_flight() > 0
    }

    pub fn ball(&self) -> Option<&Projectile> {
        self.ball.flying().next()
    }

    fn throw(&mut self, gesture: &GestureEvent, out: &mut ModeOutput) {
        let start = camera_position() - Vec3::new(0.0, RELEASE_DROP, 0.0);
        let mut direction = (hoop_position() - start).normalize();
        direction.y += LOFT;
        let direction = direction.normalize();

        let velocity = gesture.velocity;
        let hand_speed = velocity.vy.abs() + velocity.speed;
        let power = self.profile.launch_power.power(hand_speed);

        let Some(ball) = self.ball.fire(start, direction * power) else {
            return;
        };
        out.scene.push(ball_command(ball, true));

        self.throws = self.throws.wrapping_add(1);
        out.events.push(GameEvent::BallThrown { power });
        out.sound(SoundCue::BallThrow);
        debug!(hand_speed, power, "ball thrown");
    }

    fn update_ball(&mut self, dt: f32, out: &mut ModeOutput) {
        let Some(ball) = self.ball.flying_mut().next() else {
            return;
        };

        let previous = ball.position;
        ball.integrate(dt, GRAVITY);
        ball.rotation.x += BALL_SPIN.0;
        ball.rotation.y += BALL_SPIN.1;

        let current = ball.position;
        let id = ball.id;
        out.cues.push(Cue::Burst {
            effect: EffectKind::BallTrail,
            slot: 0,
            position: current,
            speed: TRAIL_SPEED,
        });

        if current.y < 0.0 {
            self.release_ball(id, out);
        } else {
            out.scene.push(ball_command(ball, true));
        }

        if passes_through_rim(previous, current) {
            self.on_score(out);
        }
    }

    fn release_ball(&mut self, id: EntityId, out: &mut ModeOutput) {
        if self.ball.release(id) {
            if let Some(ball) = self.ball.get(id) {
                out.scene.push(ball_command(ball, false));
            }
        }
    }

    fn on_score(&mut self, out: &mut ModeOutput) {
        self.score += 1;
        info!(score = self.score, "basket scored");

        out.events.push(GameEvent::Scored { total: self.score });
        out.sound(SoundCue::Swish);
        out.sound(SoundCue::Applause);
        out.cues.push(Cue::HoopPulse);

        play_staged(
            &SCORE_STAGES,
            EffectKind::Score,
            hoop_position(),
            self.score_budget(),
            &mut self.scheduler,
            |stage, origin| Task::Burst { stage, origin },
            out,
        );
        self.shake.start(SHAKE_INTENSITY, SHAKE_DURATION);
        self.scheduler.schedule(BALL_RESET_DELAY, Task::ResetBall(self.throws));
    }

    /// Main score effect plus the platform's extra bursts
    fn score_budget(&self) -> usize {
        self.profile.score_slots + 1
    }

    fn run_task(&mut self, task: Task, out: &mut ModeOutput) {
        match task {
            Task::Burst { stage, origin } => {
                if let Some(stage) = SCORE_STAGES.get(stage) {
                    emit_stage(stage, EffectKind::Score, origin, self.score_budget(), out);
                }
            }
            Task::ResetBall(throw) if throw == self.throws => {
                if let Some(id) = self.ball().map(|b| b.id) {
                    self.release_ball(id, out);
                }
            }
            Task::ResetBall(_) => {}
        }
    }
}

fn ball_command(ball: &Projectile, visible: bool) -> SceneCommand {
    SceneCommand::Update {
        id: ball.id,
        transform: ball.transform(),
        visible,
        opacity: 1.0,
    }
}

impl Mode for BasketballMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Basketball
    }

    fn activate(&mut self, out: &mut ModeOutput) {
        if self.active {
            return;
        }
        self.active = true;

        out.scene.push(SceneCommand::Spawn {
            id: self.hoop,
            kind: EntityKind::Hoop,
            transform: Transform::at(hoop_position()),
            visible: true,
        });
        for ball in self.ball.all() {
            out.scene.push(SceneCommand::Spawn {
                id: ball.id,
                kind: EntityKind::Ball,
                transform: ball.transform(),
                visible: false,
            });
        }
        info!(mode = %self.kind(), "mode activated");
    }

    fn deactivate(&mut self, out: &mut ModeOutput) {
        let cancelled = self.scheduler.cancel_all();
        self.shake.stop(out);
        self.ball.release_all();

        if !self.active {
            return;
        }
        out.scene.push(SceneCommand::Remove { id: self.hoop });
        for ball in self.ball.all() {
            out.scene.push(SceneCommand::Remove { id: ball.id });
        }
        self.active = false;
        info!(mode = %self.kind(), cancelled, "mode deactivated");
    }

    fn update(&mut self, dt: f32, gesture: Option<&GestureEvent>, out: &mut ModeOutput) {
        if !self.active {
            return;
        }

        for task in self.scheduler.advance(f64::from(dt)) {
            self.run_task(task, out);
        }

        self.update_ball(dt, out);

        if let Some(event) = gesture.filter(|g| g.gesture == GestureType::Throw) {
            if !self.ball_in_flight() {
                self.throw(event, out);
            }
        }

        self.shake.update(dt, &mut self.rng, out);
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn entity_count(&self) -> usize {
        if self.active {
            1 + self.ball.capacity()
        } else {
            0
        }
    }

    fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}

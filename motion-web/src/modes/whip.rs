//! Whip combat
//!
//! The moving hand leaves a trail of world points. A clenched fist swung
//! sideways (or an explicit WHIP flick) cracks the whip: the trail is
//! extended forward to target depth and the first humanoid within reach
//! takes the hit.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::effects::{emit_stage, play_staged, CameraShake, ELECTRIC_STAGES};
use super::mode::{Mode, ModeKind};
use super::scene::{
    landmark_to_world, row_positions, EffectKind, EntityId, EntityIds, EntityKind, GameEvent, ModeOutput,
    SceneCommand, Transform, Vec3,
};
use super::scheduler::Scheduler;
use super::targets::{Target, TargetShape};
use crate::audio::SoundCue;
use crate::config::PlatformProfile;
use crate::gesture::{GestureEvent, GestureType};

// ============================================================================
// TUNING
// ============================================================================

pub const TRAIL_MAX_POINTS: usize = 25;
/// Hand speed needed to extend the trail; slower hands fade it
pub const TRAIL_MIN_SPEED: f32 = 0.2;

pub const FIST_MIN_SPEED: f32 = 0.3;
pub const FIST_MIN_VX: f32 = 0.4;
/// Fist whips need strictly more trail points than this
pub const FIST_MIN_TRAIL: usize = 3;

pub const WHIP_COOLDOWN: f64 = 0.3;
pub const STRIKE_RANGE: f32 = 2.5;
pub const EXTENSION_STEPS: usize = 8;
pub const STRIKE_DEPTH: f32 = -6.0;

pub const TARGET_SPACING: f32 = 3.0;
pub const TARGET_Y: f32 = 0.0;
pub const TARGET_Z: f32 = -6.0;
/// Max lateral drift per tick for a falling humanoid
pub const DRIFT: f32 = 0.05;

pub const TARGET_REMOVE_DELAY: f64 = 1.0;
pub const SHAKE_INTENSITY: f32 = 0.25;
pub const SHAKE_DURATION: f32 = 0.5;

// ============================================================================
// TRAIL
// ============================================================================

/// Bounded polyline of recent hand positions, oldest first
#[derive(Default)]
pub struct WhipTrail {
    points: VecDeque<Vec3>,
}

impl WhipTrail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_MAX_POINTS + 1),
        }
    }

    pub fn push(&mut self, point: Vec3) {
        self.points.push_back(point);
        if self.points.len() > TRAIL_MAX_POINTS {
            self.points.pop_front();
        }
    }

    /// Drop the oldest point
    pub fn fade(&mut self) -> bool {
        self.points.pop_front().is_some()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> Vec<Vec3> {
        self.points.iter().copied().collect()
    }

    /// Trail plus synthetic points reaching from its tip to target depth
    pub fn strike_points(&self) -> Vec<Vec3> {
        let mut points = self.points();
        if let Some(&tip) = self.points.back() {
            let depth = STRIKE_DEPTH - tip.z;
            for step in 1..=EXTENSION_STEPS {
                let progress = step as f32 / EXTENSION_STEPS as f32;
                points.push(Vec3::new(tip.x, tip.y, tip.z + depth * progress));
            }
        }
        points
    }
}

// ============================================================================
// MODE
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
enum Task {
    Burst { stage: usize, origin: Vec3 },
    RemoveTarget(EntityId),
}

pub struct WhipMode {
    profile: PlatformProfile,
    ids: EntityIds,
    trail_id: EntityId,
    trail: WhipTrail,
    targets: Vec<Target>,
    last_whip: Option<f64>,
    scheduler: Scheduler<Task>,
    shake: CameraShake,
    rng: StdRng,
    active: bool,
}

impl WhipMode {
    pub fn new(profile: PlatformProfile, seed: u64) -> Self {
        let mut ids = EntityIds::new(ModeKind::Whip);
        let trail_id = ids.next();
        Self {
            profile,
            ids,
            trail_id,
            trail: WhipTrail::new(),
            targets: Vec::new(),
            last_whip: None,
            scheduler: Scheduler::new(),
            shake: CameraShake::new(),
            rng: StdRng::seed_from_u64(seed),
            active: false,
        }
    }

    pub fn trail(&self) -> &WhipTrail {
        &self.trail
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn spawn_targets(&mut self, out: &mut ModeOutput) {
        if !self.active {
            return;
        }

        let positions = row_positions(self.profile.target_count, TARGET_SPACING, TARGET_Y, TARGET_Z);
        let count = positions.len();
        for position in positions {
            let target = Target::new(self.ids.next(), TargetShape::Humanoid, position);
            out.scene.push(target.spawn_command());
            self.targets.push(target);
        }
        out.events.push(GameEvent::TargetsSpawned { count });
        debug!(count, "humanoid targets spawned");
    }

    fn can_whip(&self, now: f64) -> bool {
        match self.last_whip {
            Some(last) => now - last > WHIP_COOLDOWN,
            None => true,
        }
    }

    /// Extend the trail to target depth and hit the first target in reach
    fn strike(&mut self, now: f64, out: &mut ModeOutput) -> bool {
        if !self.can_whip(now) {
            return false;
        }

        let points = self.trail.strike_points();
        let struck = self.targets.iter().position(|t| {
            !t.is_destroyed() && points.iter().any(|p| (p - t.position).norm() < STRIKE_RANGE)
        });
        let Some(index) = struck else {
            return false;
        };

        self.last_whip = Some(now);
        self.on_target_hit(index, out);
        true
    }

    fn on_target_hit(&mut self, index: usize, out: &mut ModeOutput) {
        let drift = Vec3::new(self.rng.gen_range(-DRIFT..DRIFT), 0.0, self.rng.gen_range(-DRIFT..DRIFT));
        let target = &mut self.targets[index];
        if !target.hit(drift) {
            return;
        }
        let (id, position) = (target.id, target.position);
        debug!(entity = id.0, "humanoid target hit");

        out.sound(SoundCue::WhipCrack);
        out.events.push(GameEvent::TargetHit { id, position });

        play_staged(
            &ELECTRIC_STAGES,
            EffectKind::Electric,
            position,
            self.profile.electric_slots,
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
                if let Some(stage) = ELECTRIC_STAGES.get(stage) {
                    emit_stage(stage, EffectKind::Electric, origin, self.profile.electric_slots, out);
                }
            }
            Task::RemoveTarget(id) => {
                if let Some(i) = self.targets.iter().position(|t| t.id == id) {
                    self.targets.remove(i);
                    out.scene.push(SceneCommand::Remove { id });
                }
                if self.targets.iter().all(Target::is_destroyed) {
                    self.spawn_targets(out);
                }
            }
        }
    }
}

impl Mode for WhipMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Whip
    }

    fn activate(&mut self, out: &mut ModeOutput) {
        if self.active {
            return;
        }
        self.active = true;

        out.scene.push(SceneCommand::Spawn {
            id: self.trail_id,
            kind: EntityKind::WhipTrail,
            transform: Transform::at(Vec3::zeros()),
            visible: true,
        });
        self.spawn_targets(out);
        info!(mode = %self.kind(), targets = self.targets.len(), "mode activated");
    }

    fn deactivate(&mut self, out: &mut ModeOutput) {
        let cancelled = self.scheduler.cancel_all();
        self.shake.stop(out);
        self.trail.clear();

        if self.active {
            out.scene.push(SceneCommand::Remove { id: self.trail_id });
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
        let now = self.scheduler.now();

        let trail_changed = match gesture {
            Some(event) => {
                let p = event.position;
                let velocity = event.velocity;

                let changed = if velocity.speed > TRAIL_MIN_SPEED {
                    self.trail.push(landmark_to_world(p.x, p.y, p.z, 0.0));
                    true
                } else {
                    // Not short-circuited: a slow hand fades twice as fast
                    let first = self.trail.fade();
                    let second = self.trail.fade();
                    first || second
                };

                let fist_whip = event.gesture == GestureType::None
                    && velocity.speed > FIST_MIN_SPEED
                    && velocity.vx.abs() > FIST_MIN_VX
                    && self.trail.len() > FIST_MIN_TRAIL;
                if fist_whip || event.gesture == GestureType::Whip {
                    self.strike(now, out);
                }
                changed
            }
            None => self.trail.fade(),
        };

        if trail_changed {
            out.scene.push(SceneCommand::Trail {
                id: self.trail_id,
                points: self.trail.points(),
            });
        }

        for target in &mut self.targets {
            if target.step_teardown() {
                out.scene.push(target.update_command());
            }
        }

        self.shake.update(dt, &mut self.rng, out);
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn entity_count(&self) -> usize {
        let trail = usize::from(self.active);
        trail + self.targets.len()
    }

    fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Landmark, Velocity};

    const FRAME: f32 = 1.0 / 60.0;

    fn active(profile: PlatformProfile) -> WhipMode {
        let mut mode = WhipMode::new(profile, 5);
        mode.activate(&mut ModeOutput::new());
        mode
    }

    fn moving(kind: GestureType, px: f32, vx: f32) -> GestureEvent {
        // py = 1.0 puts the hand at y = 0, level with the humanoids
        GestureEvent::new(kind, 1.0, Landmark::new(px, 1.0, 0.0), Velocity::new(vx, 0.0, 0.0))
    }

    fn hits(out: &ModeOutput) -> usize {
        out.events.iter().filter(|e| matches!(e, GameEvent::TargetHit { .. })).count()
    }

    #[test]
    fn activation_spawns_humanoid_row() {
        let mode = active(PlatformProfile::desktop());
        let positions: Vec<Vec3> = mode.targets().iter().map(|t| t.position).collect();
        assert_eq!(
            positions,
            vec![Vec3::new(-3.0, 0.0, -6.0), Vec3::new(0.0, 0.0, -6.0), Vec3::new(3.0, 0.0, -6.0)]
        );
        assert_eq!(mode.entity_count(), 4);
    }

    #[test]
    fn trail_append_and_fade_cadence() {
        let mut mode = active(PlatformProfile::desktop());
        let mut out = ModeOutput::new();

        for i in 0..30 {
            let px = 0.3 + i as f32 * 0.01;
            mode.update(FRAME, Some(&moving(GestureType::OneFinger, px, 0.5)), &mut out);
        }
        assert_eq!(mode.trail().len(), TRAIL_MAX_POINTS);

        // Slow hand: two evictions
        mode.update(FRAME, Some(&moving(GestureType::OneFinger, 0.5, 0.1)), &mut out);
        assert_eq!(mode.trail().len(), TRAIL_MAX_POINTS - 2);

        // No hand: one eviction
        mode.update(FRAME, None, &mut out);
        assert_eq!(mode.trail().len(), TRAIL_MAX_POINTS - 3);

        out.clear();
        mode.update(FRAME, None, &mut out);
        let Some(SceneCommand::Trail { points, .. }) = out.scene.first() else {
            panic!("expected trail update");
        };
        assert_eq!(points.len(), TRAIL_MAX_POINTS - 4);
    }

    #[test]
    fn strike_extends_to_target_depth() {
        let mut trail = WhipTrail::new();
        assert!(trail.strike_points().is_empty());

        trail.push(Vec3::new(1.0, 2.0, 0.0));
        let points = trail.strike_points();
        assert_eq!(points.len(), 1 + EXTENSION_STEPS);
        assert_eq!(points[4], Vec3::new(1.0, 2.0, -3.0));
        assert_eq!(points.last(), Some(&Vec3::new(1.0, 2.0, STRIKE_DEPTH)));
    }

    #[test]
    fn fist_whip_needs_trail_length() {
        let mut mode = active(PlatformProfile::desktop());
        let mut out = ModeOutput::new();
        // px = 0.2 lines the hand up with the left humanoid
        let swing = moving(GestureType::None, 0.2, 0.5);

        for _ in 0..3 {
            mode.update(FRAME, Some(&swing), &mut out);
        }
        assert_eq!(hits(&out), 0);

        mode.update(FRAME, Some(&swing), &mut out);
        assert_eq!(hits(&out), 1);
        assert!(mode.targets()[0].is_destroyed());
        assert!(!mode.targets()[1].is_destroyed());
        assert!(out.sounds().any(|s| s == SoundCue::WhipCrack));
        assert_eq!(out.bursts().count(), 2);
    }

    #[test]
    fn vertical_fist_motion_extends_trail_without_striking() {
        let mut mode = active(PlatformProfile::desktop());
        let mut out = ModeOutput::new();
        for _ in 0..4 {
            mode.update(FRAME, Some(&moving(GestureType::OneFinger, 0.2, 0.5)), &mut out);
        }
        assert_eq!(mode.trail().len(), 4);

        let lift = GestureEvent::new(
            GestureType::None,
            1.0,
            Landmark::new(0.2, 1.0, 0.0),
            Velocity::new(0.0, 0.35, 0.0),
        );
        mode.update(FRAME, Some(&lift), &mut out);
        assert_eq!(mode.trail().len(), 5);
        assert_eq!(hits(&out), 0);

        mode.update(FRAME, None, &mut out);
        assert_eq!(mode.trail().len(), 4);
    }

    #[test]
    fn fist_whip_needs_speed_and_sideways_motion() {
        let mut mode = active(PlatformProfile::desktop());
        let mut out = ModeOutput::new();
        for _ in 0..4 {
            mode.update(FRAME, Some(&moving(GestureType::OneFinger, 0.2, 0.5)), &mut out);
        }

        // Sideways but under the strike speed
        let slow = GestureEvent {
            gesture: GestureType::None,
            confidence: 1.0,
            position: Landmark::new(0.2, 1.0, 0.0),
            velocity: Velocity {
                vx: 0.5,
                vy: 0.0,
                vz: 0.0,
                speed: 0.25,
            },
        };
        mode.update(FRAME, Some(&slow), &mut out);
        // Fast but too little sideways component
        mode.update(FRAME, Some(&moving(GestureType::None, 0.2, 0.35)), &mut out);
        assert_eq!(hits(&out), 0);

        // Leftward swing counts too
        mode.update(FRAME, Some(&moving(GestureType::None, 0.2, -0.5)), &mut out);
        assert_eq!(hits(&out), 1);
    }

    #[test]
    fn strikes_respect_cooldown() {
        let mut mode = active(PlatformProfile::desktop());
        let mut out = ModeOutput::new();

        for _ in 0..4 {
            mode.update(FRAME, Some(&moving(GestureType::None, 0.2, 0.5)), &mut out);
        }
        assert_eq!(hits(&out), 1);

        // Swing at the middle target straight away
        for _ in 0..5 {
            mode.update(FRAME, Some(&moving(GestureType::None, 0.5, 0.5)), &mut out);
        }
        assert_eq!(hits(&out), 1);

        mode.update(0.3, Some(&moving(GestureType::None, 0.5, 0.5)), &mut out);
        assert_eq!(hits(&out), 2);
        assert!(mode.targets()[1].is_destroyed());
    }

    #[test]
    fn explicit_whip_gesture_strikes() {
        let mut mode = active(PlatformProfile::desktop());
        let mut out = ModeOutput::new();
        mode.update(FRAME, Some(&moving(GestureType::Whip, 0.8, 1.0)), &mut out);
        assert_eq!(hits(&out), 1);
        assert!(mode.targets()[2].is_destroyed());
    }

    #[test]
    fn humanoid_respawns_after_removal() {
        let mut mode = active(PlatformProfile::mobile());
        let mut out = ModeOutput::new();
        let first = mode.targets()[0].id;

        mode.update(FRAME, Some(&moving(GestureType::Whip, 0.5, 1.0)), &mut out);
        assert_eq!(hits(&out), 1);
        // Mobile budget keeps both immediate electric bursts
        assert_eq!(out.bursts().count(), 2);

        out.clear();
        mode.update(TARGET_REMOVE_DELAY as f32, None, &mut out);
        assert!(out.scene.contains(&SceneCommand::Remove { id: first }));
        assert_eq!(mode.targets().len(), 1);
        assert!(!mode.targets()[0].is_destroyed());
        // Stages 1-3 ran, slots 5+ are past the mobile budget
        assert_eq!(out.bursts().count(), 2 + 1);
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut mode = active(PlatformProfile::desktop());
        let mut out = ModeOutput::new();
        mode.update(FRAME, Some(&moving(GestureType::Whip, 0.5, 1.0)), &mut out);
        assert!(mode.pending_tasks() > 0);

        out.clear();
        mode.deactivate(&mut out);
        assert_eq!(mode.entity_count(), 0);
        assert_eq!(mode.pending_tasks(), 0);
        assert!(mode.trail().is_empty());

        out.clear();
        mode.deactivate(&mut out);
        assert!(out.is_empty());
    }
}

//! Staged particle bursts and camera shake
//!
//! Burst tables describe where each particle system fires relative to an
//! impact point and after which delay. Stage 0 fires immediately; later
//! stages go through the owning mode's scheduler.

use rand::Rng;

use super::scheduler::Scheduler;
use super::scene::{Cue, EffectKind, ModeOutput, SceneCommand, Vec3};

/// One particle system firing at an offset from the impact point
#[derive(Clone, Copy, Debug)]
pub struct BurstSpec {
    /// Particle system index; skipped when outside the platform budget
    pub slot: usize,
    pub offset: [f32; 3],
    pub speed: f32,
}

const fn burst(slot: usize, dx: f32, dy: f32, speed: f32) -> BurstSpec {
    BurstSpec {
        slot,
        offset: [dx, dy, 0.0],
        speed,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BurstStage {
    /// Seconds after the impact
    pub delay: f64,
    pub bursts: &'static [BurstSpec],
}

/// Target hit in shooting mode: center and sides, vertical, diagonal, outer
pub const EXPLOSION_STAGES: [BurstStage; 4] = [
    BurstStage {
        delay: 0.0,
        bursts: &[burst(0, 0.0, 0.0, 20.0), burst(1, -0.5, 0.0, 16.0), burst(2, 0.5, 0.0, 16.0)],
    },
    BurstStage {
        delay: 0.05,
        bursts: &[burst(3, 0.0, 0.6, 18.0), burst(4, 0.0, -0.6, 18.0)],
    },
    BurstStage {
        delay: 0.10,
        bursts: &[burst(5, -0.7, 0.4, 14.0), burst(6, 0.7, 0.4, 14.0)],
    },
    BurstStage {
        delay: 0.15,
        bursts: &[burst(7, 0.0, 0.8, 22.0)],
    },
];

/// Basket scored: slot 0 is the main score effect, slots 1.. the extra bursts
pub const SCORE_STAGES: [BurstStage; 4] = [
    BurstStage {
        delay: 0.0,
        bursts: &[burst(0, 0.0, 0.0, 30.0), burst(1, -0.7, 0.0, 25.0), burst(2, 0.7, 0.0, 25.0)],
    },
    BurstStage {
        delay: 0.05,
        bursts: &[burst(3, 0.0, 0.8, 28.0), burst(4, 0.0, -0.8, 28.0)],
    },
    BurstStage {
        delay: 0.10,
        bursts: &[
            burst(5, -1.0, 0.6, 22.0),
            burst(6, 1.0, 0.6, 22.0),
            burst(7, -1.0, -0.6, 22.0),
            burst(8, 1.0, -0.6, 22.0),
        ],
    },
    BurstStage {
        delay: 0.15,
        bursts: &[
            burst(9, 0.0, 1.2, 35.0),
            burst(10, -1.5, 0.0, 30.0),
            burst(11, 1.5, 0.0, 30.0),
            burst(12, 0.0, -1.2, 32.0),
            burst(0, 0.0, 0.0, 28.0),
        ],
    },
];

/// Whip hit on a humanoid: chest and head, arms, waist and legs, ground
pub const ELECTRIC_STAGES: [BurstStage; 4] = [
    BurstStage {
        delay: 0.0,
        bursts: &[burst(0, 0.0, 0.7, 15.0), burst(1, 0.0, 1.4, 12.0)],
    },
    BurstStage {
        delay: 0.05,
        bursts: &[burst(2, -0.45, 0.5, 10.0), burst(3, 0.45, 0.5, 10.0)],
    },
    BurstStage {
        delay: 0.10,
        bursts: &[burst(4, 0.0, 0.2, 11.0), burst(5, -0.2, -0.5, 9.0), burst(6, 0.2, -0.5, 9.0)],
    },
    BurstStage {
        delay: 0.15,
        bursts: &[burst(7, 0.0, -1.0, 18.0), burst(8, -0.8, -1.0, 14.0), burst(9, 0.8, -1.0, 14.0)],
    },
];

/// Emit the bursts of one stage that fit within `budget` particle systems
pub fn emit_stage(stage: &BurstStage, effect: EffectKind, origin: Vec3, budget: usize, out: &mut ModeOutput) {
    for spec in stage.bursts.iter().filter(|b| b.slot < budget) {
        let [dx, dy, dz] = spec.offset;
        out.cues.push(Cue::Burst {
            effect,
            slot: spec.slot,
            position: origin + Vec3::new(dx, dy, dz),
            speed: spec.speed,
        });
    }
}

/// Fire stage 0 now and schedule the rest
///
/// `task` builds the mode's deferred task from a stage index and the origin.
pub fn play_staged<T>(
    stages: &[BurstStage],
    effect: EffectKind,
    origin: Vec3,
    budget: usize,
    scheduler: &mut Scheduler<T>,
    task: impl Fn(usize, Vec3) -> T,
    out: &mut ModeOutput,
) {
    for (i, stage) in stages.iter().enumerate() {
        if stage.delay <= 0.0 {
            emit_stage(stage, effect, origin, budget, out);
        } else {
            scheduler.schedule(stage.delay, task(i, origin));
        }
    }
}

/// Random camera jitter whose amplitude decays linearly to zero
pub struct CameraShake {
    intensity: f32,
    duration: f32,
    elapsed: f32,
    active: bool,
}

impl CameraShake {
    pub fn new() -> Self {
        Self {
            intensity: 0.0,
            duration: 0.0,
            elapsed: 0.0,
            active: false,
        }
    }

    /// Restart the shake; a new impact replaces any running one
    pub fn start(&mut self, intensity: f32, duration: f32) {
        self.intensity = intensity;
        self.duration = duration;
        self.elapsed = 0.0;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Amplitude at the current point of the shake
    pub fn amplitude(&self) -> f32 {
        if !self.active || self.duration <= 0.0 {
            return 0.0;
        }
        self.intensity * (1.0 - self.elapsed / self.duration).max(0.0)
    }

    /// Emit this tick's camera offset, then advance by `dt`
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng, out: &mut ModeOutput) {
        if !self.active {
            return;
        }

        if self.elapsed >= self.duration {
            self.active = false;
            out.scene.push(SceneCommand::CameraOffset(Vec3::zeros()));
            return;
        }

        let amplitude = self.amplitude();
        let offset = Vec3::new(
            rng.gen_range(-0.5..0.5) * amplitude,
            rng.gen_range(-0.5..0.5) * amplitude,
            rng.gen_range(-0.5..0.5) * amplitude,
        );
        out.scene.push(SceneCommand::CameraOffset(offset));
        self.elapsed += dt;
    }

    /// Cut the shake short and put the camera back
    pub fn stop(&mut self, out: &mut ModeOutput) {
        if self.active {
            self.active = false;
            out.scene.push(SceneCommand::CameraOffset(Vec3::zeros()));
        }
    }
}

impl Default for CameraShake {
    fn default() -> Self {
        Self::new()
    }
}

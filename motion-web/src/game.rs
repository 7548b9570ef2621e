//! Game orchestrator
//!
//! Owns the recognizer, the mode registry, app state and sound bank. One
//! `tick` runs recognition on the latest frame and feeds the stable gesture
//! to the active mode. Everything the tick produces accumulates in a single
//! `ModeOutput` until the bridge drains it.

use tracing::info;

use crate::audio::{SoundBank, SoundCue};
use crate::config::PlatformProfile;
use crate::error::GameError;
use crate::gesture::{GestureEvent, GestureRecognizer, HandFrame};
use crate::modes::{
    BasketballMode, Cue, GameEvent, ModeKind, ModeOutput, ModeRegistry, SceneCommand, ShootingMode, WhipMode,
};
use crate::state::{AppEvent, AppState, StateManager};

pub struct Game {
    profile: PlatformProfile,
    recognizer: GestureRecognizer,
    registry: ModeRegistry,
    state: StateManager,
    sounds: SoundBank,
    output: ModeOutput,
    baskets: u32,
    targets_hit: u32,
}

impl Game {
    /// `seed` drives camera shake and hit drift in every mode
    pub fn new(profile: PlatformProfile, seed: u64) -> Self {
        let mut registry = ModeRegistry::new();
        let mut output = ModeOutput::new();
        registry.register(Box::new(ShootingMode::new(profile, seed)), &mut output);
        registry.register(Box::new(BasketballMode::new(profile, seed.wrapping_add(1))), &mut output);
        registry.register(Box::new(WhipMode::new(profile, seed.wrapping_add(2))), &mut output);

        Self {
            profile,
            recognizer: GestureRecognizer::new(profile),
            registry,
            state: StateManager::new(),
            sounds: SoundBank::new(),
            output,
            baskets: 0,
            targets_hit: 0,
        }
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// Activate the initial mode
    pub fn start(&mut self) -> Result<(), GameError> {
        info!(platform = self.profile.platform.as_str(), "game starting");
        self.switch_mode(ModeKind::Shooting)
    }

    pub fn switch_mode(&mut self, kind: ModeKind) -> Result<(), GameError> {
        self.registry.switch_to(kind, &mut self.output)?;
        self.state.set_mode(kind);
        Ok(())
    }

    pub fn current_mode(&self) -> Option<ModeKind> {
        self.registry.active_kind()
    }

    /// Run one frame: recognize, then advance the active mode by `dt`
    ///
    /// `now` is wall-clock seconds (velocity), `dt` the frame delta (mode clock).
    pub fn tick(&mut self, frame: Option<&HandFrame>, now: f64, dt: f32) -> Option<GestureEvent> {
        self.state.set_hand_detected(frame.is_some());
        let gesture = self.recognizer.recognize(frame, now);
        if let Some(event) = &gesture {
            self.state.set_last_gesture(event.gesture);
        }

        let cues_before = self.output.cues.len();
        let events_before = self.output.events.len();

        if let Some(mode) = self.registry.active_mut() {
            mode.update(dt, gesture.as_ref(), &mut self.output);
        }

        // Drop cues for samples that are still loading
        let fresh = self.output.cues.split_off(cues_before);
        let sounds = &self.sounds;
        self.output.cues.extend(fresh.into_iter().filter(|cue| match cue {
            Cue::Sound(sound) => sounds.play(*sound),
            _ => true,
        }));

        for event in &self.output.events[events_before..] {
            match event {
                GameEvent::Scored { total } => self.baskets = *total,
                GameEvent::TargetHit { .. } => self.targets_hit += 1,
                _ => {}
            }
        }

        gesture
    }

    pub fn mark_sound_loaded(&mut self, cue: SoundCue) {
        self.sounds.mark_loaded(cue);
    }

    pub fn sounds(&self) -> &SoundBank {
        &self.sounds
    }

    /// Everything produced since the last drain
    pub fn drain_output(&mut self) -> ModeOutput {
        self.output.take()
    }

    pub fn drain_scene(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.output.scene)
    }

    /// Visual cues only; sound cues stay queued for `drain_sounds`
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        let (sounds, visual): (Vec<Cue>, Vec<Cue>) = std::mem::take(&mut self.output.cues)
            .into_iter()
            .partition(|cue| matches!(cue, Cue::Sound(_)));
        self.output.cues = sounds;
        visual
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundCue> {
        let mut sounds = Vec::new();
        self.output.cues.retain(|cue| match cue {
            Cue::Sound(sound) => {
                sounds.push(*sound);
                false
            }
            _ => true,
        });
        sounds
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.output.events)
    }

    pub fn drain_ui_events(&mut self) -> Vec<AppEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> AppState {
        self.state.state()
    }

    /// Baskets scored
    pub fn score(&self) -> u32 {
        self.baskets
    }

    pub fn targets_hit(&self) -> u32 {
        self.targets_hit
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    /// Replace a running game with this one
    ///
    /// `previous` is disposed and its pending scene commands are queued ahead
    /// of ours, so its entities are removed before any id is spawned again.
    pub fn take_over(&mut self, mut previous: Game) {
        previous.dispose();
        let mut scene = previous.drain_scene();
        scene.append(&mut self.output.scene);
        self.output.scene = scene;
    }

    /// Tear down every mode; safe to call more than once
    pub fn dispose(&mut self) {
        self.registry.dispose_all(&mut self.output);
        self.recognizer.reset();
        info!("game disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::test_hands::hand;
    use crate::gesture::GestureType;

    fn started() -> Game {
        let mut game = Game::new(PlatformProfile::desktop(), 42);
        game.start().unwrap();
        game
    }

    /// Index finger out, wrist sweeping right at 1 unit/s
    fn run_trigger_pull(game: &mut Game, ticks: usize) -> Vec<GestureType> {
        (0..ticks)
            .map(|i| {
                let frame = hand(true, false, false, false, (0.1 * i as f32, 0.9));
                game.tick(Some(&frame), 0.1 * i as f64, 0.1).map(|g| g.gesture).unwrap()
            })
            .collect()
    }

    #[test]
    fn start_activates_shooting() {
        let mut game = started();
        assert_eq!(game.current_mode(), Some(ModeKind::Shooting));
        assert_eq!(game.drain_ui_events(), vec![AppEvent::ModeChange(ModeKind::Shooting)]);

        let output = game.drain_output();
        let spawns = output.scene.iter().filter(|c| matches!(c, SceneCommand::Spawn { .. })).count();
        assert_eq!(spawns, 10 + 3);
        assert!(game.drain_output().is_empty());
    }

    #[test]
    fn hand_presence_drives_ui_events() {
        let mut game = started();
        game.drain_ui_events();

        assert!(game.tick(None, 0.0, 0.016).is_none());
        assert!(game.drain_ui_events().is_empty());

        let frame = hand(true, true, false, false, (0.5, 0.9));
        let event = game.tick(Some(&frame), 0.016, 0.016).unwrap();
        assert_eq!(event.gesture, GestureType::TwoFingers);
        assert_eq!(
            game.drain_ui_events(),
            vec![
                AppEvent::HandDetectionChange(true),
                AppEvent::GestureChange(GestureType::TwoFingers),
            ]
        );

        game.tick(None, 0.032, 0.016);
        assert_eq!(game.drain_ui_events(), vec![AppEvent::HandDetectionChange(false)]);
    }

    #[test]
    fn stable_shoot_fires_once_sound_is_loaded() {
        let mut game = started();
        game.mark_sound_loaded(SoundCue::GunShot);
        game.drain_output();

        let gestures = run_trigger_pull(&mut game, 3);
        assert_eq!(
            gestures,
            vec![GestureType::OneFinger, GestureType::OneFinger, GestureType::Shoot]
        );
        let output = game.drain_output();
        assert_eq!(output.sounds().collect::<Vec<_>>(), vec![SoundCue::GunShot]);
        assert!(output.events.iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
    }

    #[test]
    fn unloaded_sound_is_dropped() {
        let mut game = started();
        game.drain_output();

        run_trigger_pull(&mut game, 3);
        let output = game.drain_output();
        assert_eq!(output.sounds().count(), 0);
        // The shot itself still happens
        assert!(output.events.iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
    }

    #[test]
    fn partial_drains_split_the_output() {
        let mut game = started();
        game.mark_sound_loaded(SoundCue::GunShot);
        game.drain_output();

        run_trigger_pull(&mut game, 3);
        assert!(game.drain_cues().iter().all(|c| !matches!(c, Cue::Sound(_))));
        assert_eq!(game.drain_sounds(), vec![SoundCue::GunShot]);
        assert!(game.drain_sounds().is_empty());
        assert!(!game.drain_scene().is_empty());
        assert!(game.drain_events().iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
        assert!(game.drain_output().is_empty());
    }

    #[test]
    fn switching_modes_swaps_entities() {
        let mut game = started();
        game.switch_mode(ModeKind::Basketball).unwrap();

        let registry = game.registry();
        assert_eq!(registry.get(ModeKind::Shooting).unwrap().entity_count(), 0);
        assert_eq!(registry.get(ModeKind::Basketball).unwrap().entity_count(), 2);
        assert_eq!(game.state().current_mode, ModeKind::Basketball);
    }

    #[test]
    fn replacement_game_removes_old_entities_first() {
        let mut old = started();
        old.switch_mode(ModeKind::Whip).unwrap();
        old.drain_output();

        let mut game = Game::new(PlatformProfile::desktop(), 7);
        game.start().unwrap();
        let fresh_spawns = game
            .drain_scene()
            .into_iter()
            .filter(|c| matches!(c, SceneCommand::Spawn { .. }))
            .count();

        let mut game = Game::new(PlatformProfile::desktop(), 7);
        game.start().unwrap();
        game.take_over(old);

        let scene = game.drain_scene();
        let removes: Vec<usize> = scene
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, SceneCommand::Remove { .. }))
            .map(|(i, _)| i)
            .collect();
        let first_spawn = scene
            .iter()
            .position(|c| matches!(c, SceneCommand::Spawn { .. }))
            .unwrap();

        assert_eq!(removes.len(), 1 + 3);
        assert!(removes.iter().all(|&i| i < first_spawn));
        let spawns = scene.iter().filter(|c| matches!(c, SceneCommand::Spawn { .. })).count();
        assert_eq!(spawns, fresh_spawns);
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut game = started();
        game.dispose();
        assert_eq!(game.current_mode(), None);
        game.drain_output();

        game.dispose();
        assert!(game.drain_output().is_empty());

        // Ticking a disposed game is a no-op for the scene
        game.tick(None, 0.0, 0.016);
        assert!(game.drain_output().is_empty());
    }
}

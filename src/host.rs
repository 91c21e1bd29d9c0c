//! Host integration
//!
//! The simulation records [`GameEvent`]s; this module defines the narrow
//! collaborator interfaces a host implements and a [`SessionDriver`] that
//! forwards each event to the matching collaborator after every operation.
//! Any collaborator may be absent: motion falls back to direct movement,
//! sinks simply drop their events, and stats default to a fresh record.

use glam::Vec2;

use crate::highscores::BestStats;
use crate::settings::SessionConfig;
use crate::sim::{AudioCue, EffectKind, EntityId, GameEvent, GameSession, MotionMode, TickInput};

/// Navigation collaborator ("move toward point")
pub trait MotionDriver {
    fn request_move_to(&mut self, enemy: EntityId, target: Vec2);
}

/// Visual effects collaborator
pub trait EffectSink {
    fn emit_effect(&mut self, kind: EffectKind, pos: Vec2, lifetime: f32);
}

/// Audio collaborator
pub trait AudioSink {
    fn emit_audio_cue(&mut self, cue: AudioCue, pos: Vec2);
}

/// Best stats persistence collaborator
pub trait StatsStore {
    fn load_best_stats(&mut self) -> BestStats;
    fn save_best_stats(&mut self, stats: BestStats);
}

impl<F: FnMut(EntityId, Vec2)> MotionDriver for F {
    fn request_move_to(&mut self, enemy: EntityId, target: Vec2) {
        self(enemy, target)
    }
}

impl<F: FnMut(EffectKind, Vec2, f32)> EffectSink for F {
    fn emit_effect(&mut self, kind: EffectKind, pos: Vec2, lifetime: f32) {
        self(kind, pos, lifetime)
    }
}

impl<F: FnMut(AudioCue, Vec2)> AudioSink for F {
    fn emit_audio_cue(&mut self, cue: AudioCue, pos: Vec2) {
        self(cue, pos)
    }
}

/// The collaborators available to one session
#[derive(Default)]
pub struct Collaborators {
    pub motion: Option<Box<dyn MotionDriver>>,
    pub effects: Option<Box<dyn EffectSink>>,
    pub audio: Option<Box<dyn AudioSink>>,
    pub stats: Option<Box<dyn StatsStore>>,
}

impl Collaborators {
    /// No collaborators at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_motion(mut self, motion: impl MotionDriver + 'static) -> Self {
        self.motion = Some(Box::new(motion));
        self
    }

    pub fn with_effects(mut self, effects: impl EffectSink + 'static) -> Self {
        self.effects = Some(Box::new(effects));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_stats(mut self, stats: impl StatsStore + 'static) -> Self {
        self.stats = Some(Box::new(stats));
        self
    }

    /// Stored best stats, or a fresh record without a store
    pub fn load_best_stats(&mut self) -> BestStats {
        self.stats
            .as_mut()
            .map(|s| s.load_best_stats())
            .unwrap_or_default()
    }

    /// Forward collaborator-facing events; the rest are left to the host
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Effect { kind, pos, lifetime } => {
                    if let Some(effects) = self.effects.as_mut() {
                        effects.emit_effect(kind, pos, lifetime);
                    }
                }
                GameEvent::Audio { cue, pos } => {
                    if let Some(audio) = self.audio.as_mut() {
                        audio.emit_audio_cue(cue, pos);
                    }
                }
                GameEvent::MoveRequested { enemy, target } => {
                    if let Some(motion) = self.motion.as_mut() {
                        motion.request_move_to(enemy, target);
                    }
                }
                GameEvent::StatsSaved {
                    high_score,
                    max_level,
                } => {
                    if let Some(stats) = self.stats.as_mut() {
                        stats.save_best_stats(BestStats {
                            high_score,
                            max_level,
                        });
                    }
                }
                _ => {}
            }
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("motion", &self.motion.is_some())
            .field("effects", &self.effects.is_some())
            .field("audio", &self.audio.is_some())
            .field("stats", &self.stats.is_some())
            .finish()
    }
}

/// A session wired to its collaborators.
///
/// Every operation runs on the session, then routes the recorded events.
/// The events are also returned so the host can react to lifecycle changes.
#[derive(Debug)]
pub struct SessionDriver {
    session: GameSession,
    collaborators: Collaborators,
}

impl SessionDriver {
    pub fn new(config: SessionConfig, seed: u64, mut collaborators: Collaborators) -> Self {
        let best = collaborators.load_best_stats();
        let mut session = GameSession::new(config, seed, best);
        let motion = if collaborators.motion.is_some() {
            MotionMode::Delegated
        } else {
            MotionMode::Direct
        };
        session.set_motion_mode(motion);
        log::info!("Session ready ({:?}, {:?} motion)", collaborators, motion);
        Self {
            session,
            collaborators,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn start_game(&mut self) -> Vec<GameEvent> {
        self.session.start_game();
        self.flush()
    }

    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        self.session.tick(input, dt);
        self.flush()
    }

    pub fn activate_bomb(&mut self) -> bool {
        let fired = self.session.activate_bomb();
        self.flush();
        fired
    }

    pub fn complete_level(&mut self) -> Vec<GameEvent> {
        self.session.complete_level();
        self.flush()
    }

    pub fn game_over(&mut self) -> Vec<GameEvent> {
        self.session.game_over();
        self.flush()
    }

    pub fn next_level(&mut self) -> Vec<GameEvent> {
        self.session.next_level();
        self.flush()
    }

    pub fn show_main_menu(&mut self) {
        self.session.show_main_menu();
    }

    pub fn trigger_evasion(&mut self, enemy: EntityId) -> bool {
        let found = self.session.trigger_evasion(enemy);
        self.flush();
        found
    }

    /// Report a position produced by the motion collaborator
    pub fn sync_enemy_position(&mut self, enemy: EntityId, pos: Vec2) -> bool {
        self.session.sync_enemy_position(enemy, pos)
    }

    fn flush(&mut self) -> Vec<GameEvent> {
        let events = self.session.drain_events();
        self.collaborators.dispatch(&events);
        events
    }
}

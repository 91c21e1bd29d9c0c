//! Game session controller: lifecycle, level flow and the bomb
//!
//! The per-tick sequence lives in `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::behavior::{self, MotionMode};
use super::registry::EntityRegistry;
use super::state::{AudioCue, EffectKind, EntityId, GameEvent, GamePhase, Player};
use crate::consts::*;
use crate::highscores::BestStats;
use crate::settings::SessionConfig;

/// One play session. Owns all simulation state; collaborators only see the
/// events it records.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: SessionConfig,
    pub phase: GamePhase,
    pub player: Player,
    pub registry: EntityRegistry,
    pub score: u64,
    /// 1-based
    pub level: u32,
    /// Coins collected on the current level
    pub coins_collected: u32,
    pub best: BestStats,
    /// Simulated seconds spent Running
    pub elapsed: f64,
    pub(super) motion: MotionMode,
    pub(super) rng: Pcg32,
    /// Fractional engine trail puffs carried between ticks
    pub(super) trail_accumulator: f32,
    seed: u64,
    pub(super) events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session sitting in the main menu
    pub fn new(config: SessionConfig, seed: u64, best: BestStats) -> Self {
        let config = config.sanitized();
        let player = Player::new(config.arena.center(), config.player_speed);
        Self {
            config,
            phase: GamePhase::MainMenu,
            player,
            registry: EntityRegistry::new(),
            score: 0,
            level: 1,
            coins_collected: 0,
            best,
            elapsed: 0.0,
            motion: MotionMode::Direct,
            rng: Pcg32::seed_from_u64(seed),
            trail_accumulator: 0.0,
            seed,
            events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.motion
    }

    /// Select direct or delegated enemy movement
    pub fn set_motion_mode(&mut self, motion: MotionMode) {
        self.motion = motion;
    }

    /// Coins needed to clear the current level
    pub fn threshold(&self) -> u32 {
        self.config.threshold(self.level)
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset everything and begin level 1
    pub fn start_game(&mut self) {
        log::info!("Starting game (seed {}, {} rules)", self.seed, self.config.ruleset.as_str());

        self.score = 0;
        self.level = 1;
        self.coins_collected = 0;
        self.elapsed = 0.0;
        self.trail_accumulator = 0.0;
        self.player = Player::new(self.config.arena.center(), self.config.player_speed);
        self.registry.clear();
        self.generate_coins();

        self.phase = GamePhase::Running;
        self.emit_audio(AudioCue::BackgroundMusic, self.player.pos);
    }

    /// Detonate the bomb: clear all enemies and grant safe-time.
    ///
    /// Ignored (returns false) unless Running with the bomb off cooldown.
    pub fn activate_bomb(&mut self) -> bool {
        if self.phase != GamePhase::Running || !self.player.bomb_available() {
            log::debug!(
                "Bomb ignored (phase {:?}, cooldown {:.2}s)",
                self.phase,
                self.player.bomb_cooldown.remaining()
            );
            return false;
        }

        let destroyed = self.registry.drain_enemies();
        for enemy in &destroyed {
            self.emit_effect(EffectKind::Explosion, enemy.pos, EXPLOSION_LIFETIME);
        }

        self.player.bomb_cooldown.start(self.config.bomb_cooldown);
        self.player.safe_time.start(self.config.safe_time);

        let pos = self.player.pos;
        self.emit_effect(EffectKind::Warp, pos, self.config.safe_time);
        self.emit_audio(AudioCue::Bomb, pos);
        self.events.push(GameEvent::BombDetonated {
            destroyed: destroyed.len(),
        });
        log::info!("Bomb detonated, {} enemies destroyed", destroyed.len());
        true
    }

    /// Threshold reached: stop, persist best stats, advance the level counter
    pub fn complete_level(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::LevelComplete;
        self.commit_best_stats();

        let cleared = self.level;
        self.level += 1;
        log::info!("Level {} complete, score {}", cleared, self.score);
        self.events.push(GameEvent::LevelComplete {
            level: cleared,
            score: self.score,
        });
        self.emit_audio(AudioCue::LevelComplete, self.player.pos);
    }

    /// Resume play on the level set by `complete_level`
    pub fn next_level(&mut self) {
        if self.phase != GamePhase::LevelComplete {
            return;
        }
        self.coins_collected = 0;
        self.player.fuel = MAX_FUEL;
        self.generate_coins();
        self.phase = GamePhase::Running;
        log::info!(
            "Level {} started: {} coins, threshold {}",
            self.level,
            self.registry.coins.len(),
            self.threshold()
        );
    }

    /// Fuel exhausted: stop and persist best stats
    pub fn game_over(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.commit_best_stats();
        log::info!("Game over on level {} with score {}", self.level, self.score);
        self.events.push(GameEvent::GameOver {
            level: self.level,
            score: self.score,
        });
        self.emit_audio(AudioCue::GameOver, self.player.pos);
    }

    /// Leave a finished run for the main menu
    pub fn show_main_menu(&mut self) {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::LevelComplete) {
            self.phase = GamePhase::MainMenu;
        }
    }

    /// Force an enemy into Evading. Returns false if it does not exist.
    pub fn trigger_evasion(&mut self, enemy: EntityId) -> bool {
        let Some(e) = self.registry.enemy_mut(enemy) else {
            return false;
        };
        let (from, to) = behavior::trigger_evasion(e);
        if from != to {
            self.events.push(GameEvent::StateChanged { enemy, from, to });
        }
        true
    }

    /// Record where the motion collaborator moved an enemy
    pub fn sync_enemy_position(&mut self, enemy: EntityId, pos: Vec2) -> bool {
        match self.registry.enemy_mut(enemy) {
            Some(e) => {
                e.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Lay out this level's coins inside the arena
    pub(super) fn generate_coins(&mut self) {
        self.registry.coins.clear();
        let (lo, hi) = self.config.arena.inner();
        let count = self.config.coins_for_level(self.level);
        for _ in 0..count {
            let pos = Vec2::new(
                self.rng.random_range(lo.x..=hi.x),
                self.rng.random_range(lo.y..=hi.y),
            );
            self.registry.add_coin(pos, self.config.coin_value);
        }
    }

    fn commit_best_stats(&mut self) {
        self.best.merge(self.score, self.level);
        self.events.push(GameEvent::StatsSaved {
            high_score: self.best.high_score,
            max_level: self.best.max_level,
        });
    }

    pub(super) fn emit_effect(&mut self, kind: EffectKind, pos: Vec2, lifetime: f32) {
        self.registry.add_effect(kind, pos, lifetime);
        self.events.push(GameEvent::Effect { kind, pos, lifetime });
    }

    pub(super) fn emit_audio(&mut self, cue: AudioCue, pos: Vec2) {
        self.events.push(GameEvent::Audio { cue, pos });
    }
}

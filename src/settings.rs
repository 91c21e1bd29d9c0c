//! Game rules and spawn policy
//!
//! Everything the simulation treats as an input rather than something it
//! computes: radii, rewards, penalties, timers, the enemy roster and the
//! per-level coin threshold. Two presets reproduce the browser and the
//! 3D-engine flavours of the game.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::EnemyKind;

/// Rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Ruleset {
    /// Pixel-space canvas game (800x600 playfield)
    #[default]
    Canvas,
    /// World-unit tabletop arena (±10 units)
    Arena,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Canvas => "Canvas",
            Ruleset::Arena => "Arena",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "canvas" | "2d" => Some(Ruleset::Canvas),
            "arena" | "3d" => Some(Ruleset::Arena),
            _ => None,
        }
    }

    /// Multiplier from enemy-controller world units to this ruleset's units
    pub fn world_scale(&self) -> f32 {
        match self {
            Ruleset::Canvas => 20.0,
            Ruleset::Arena => 1.0,
        }
    }
}

/// Coins required to clear a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinThreshold {
    /// Same count on every level
    Fixed(u32),
    /// `base + per_level * level`
    Linear { base: u32, per_level: u32 },
}

impl CoinThreshold {
    /// Threshold for a 1-based level. Never decreases as `level` grows.
    pub fn for_level(&self, level: u32) -> u32 {
        match *self {
            CoinThreshold::Fixed(n) => n,
            CoinThreshold::Linear { base, per_level } => {
                base.saturating_add(per_level.saturating_mul(level))
            }
        }
    }
}

/// Playfield bounds for the player and coin placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub min: Vec2,
    pub max: Vec2,
    /// Inset kept clear along every edge
    pub margin: f32,
}

impl Arena {
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Usable rectangle after the margin (collapses to the center if too small)
    pub fn inner(&self) -> (Vec2, Vec2) {
        let lo = self.min + Vec2::splat(self.margin);
        let hi = self.max - Vec2::splat(self.margin);
        let c = self.center();
        (lo.min(c), hi.max(c))
    }

    /// Keep a point inside the usable rectangle
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        let (lo, hi) = self.inner();
        p.clamp(lo, hi)
    }
}

/// Enemy AI tuning, in enemy-controller world units (scaled by `world_scale`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub detection_range: f32,
    /// Heading slerp rate (fraction of the gap per second)
    pub rotation_speed: f32,
    /// Patrol points are picked within ±this around the enemy
    pub patrol_radius: f32,
    /// How far ahead an evading enemy aims, away from the player
    pub evade_offset: f32,
    /// Ram impulse magnitude before aggression scaling
    pub ram_force: f32,
    pub base_aggression: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            detection_range: 12.0,
            rotation_speed: 2.0,
            patrol_radius: 10.0,
            evade_offset: 5.0,
            ram_force: 500.0,
            base_aggression: 1.0,
        }
    }
}

/// Spawn policy (external configuration, never computed by the core)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPolicy {
    /// Kinds picked uniformly at spawn. Empty disables spawning.
    pub roster: Vec<EnemyKind>,
    /// Expected spawns per second while below the cap
    pub spawn_rate: f32,
    /// Concurrent enemy cap; spawns are skipped, never queued, at the cap
    pub max_enemies: usize,
    /// Spawn ring radius around the player (world units)
    pub spawn_distance: f32,
    pub coins_per_level: u32,
    pub threshold: CoinThreshold,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            roster: EnemyKind::ALL.to_vec(),
            spawn_rate: 3.0,
            max_enemies: 7,
            spawn_distance: 15.0,
            coins_per_level: 20,
            threshold: CoinThreshold::Fixed(20),
        }
    }
}

/// Full rule set for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ruleset: Ruleset,
    pub world_scale: f32,
    pub arena: Arena,
    /// Player travel per second at full joystick deflection
    pub player_speed: f32,

    // === Resources ===
    /// Passive fuel drain per second
    pub fuel_drain_per_sec: f32,
    pub coin_fuel_bonus: f32,
    pub enemy_fuel_penalty: f32,
    /// Seconds until the bomb can be used again
    pub bomb_cooldown: f32,
    /// Seconds of collision immunity granted by the bomb
    pub safe_time: f32,

    // === Collisions / scoring ===
    pub coin_radius: f32,
    pub enemy_radius: f32,
    /// Score unit per coin, multiplied by the level on collection
    pub coin_value: u32,

    pub enemy: EnemyTuning,
    pub spawn: SpawnPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_ruleset(Ruleset::default())
    }
}

impl SessionConfig {
    /// Build the preset for a ruleset
    pub fn for_ruleset(ruleset: Ruleset) -> Self {
        match ruleset {
            Ruleset::Canvas => Self {
                ruleset,
                world_scale: ruleset.world_scale(),
                arena: Arena {
                    min: Vec2::ZERO,
                    max: Vec2::new(800.0, 600.0),
                    margin: 30.0,
                },
                player_speed: 300.0,
                // 0.05 per 16 ms frame
                fuel_drain_per_sec: 3.125,
                coin_fuel_bonus: 10.0,
                enemy_fuel_penalty: 25.0,
                bomb_cooldown: 10.0,
                safe_time: 5.0,
                coin_radius: 40.0,
                enemy_radius: 35.0,
                coin_value: 100,
                enemy: EnemyTuning::default(),
                spawn: SpawnPolicy {
                    spawn_rate: 1.0,
                    threshold: CoinThreshold::Linear {
                        base: 10,
                        per_level: 2,
                    },
                    ..SpawnPolicy::default()
                },
            },
            Ruleset::Arena => Self {
                ruleset,
                world_scale: ruleset.world_scale(),
                arena: Arena {
                    min: Vec2::splat(-10.0),
                    max: Vec2::splat(10.0),
                    margin: 0.0,
                },
                player_speed: 15.0,
                fuel_drain_per_sec: 2.0,
                coin_fuel_bonus: 15.0,
                enemy_fuel_penalty: 30.0,
                bomb_cooldown: 10.0,
                safe_time: 5.0,
                coin_radius: 2.0,
                enemy_radius: 1.5,
                coin_value: 10,
                enemy: EnemyTuning::default(),
                spawn: SpawnPolicy::default(),
            },
        }
    }

    /// Parse a JSON config. Missing fields fall back to the Canvas preset.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Load a JSON config file, falling back to the preset on any failure
    pub fn load(path: impl AsRef<Path>, fallback: Ruleset) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded session config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Invalid session config {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read session config {}: {}", path.display(), e),
        }
        log::info!("Using {} preset", fallback.as_str());
        Self::for_ruleset(fallback)
    }

    /// Clamp every value into a range the simulation can run with.
    ///
    /// Bad values are pulled to the nearest boundary instead of rejected.
    pub fn sanitized(mut self) -> Self {
        let preset = Self::for_ruleset(self.ruleset);

        if !(self.world_scale > 0.0 && self.world_scale.is_finite()) {
            self.world_scale = preset.world_scale;
        }
        self.world_scale = self.world_scale.min(MAX_WORLD_SCALE);

        if !(self.arena.min.is_finite() && self.arena.max.is_finite()) {
            log::warn!("Non-finite arena bounds, using the {} arena", self.ruleset.as_str());
            self.arena = preset.arena;
        }
        let limit = Vec2::splat(CONFIG_LIMIT);
        let (a, b) = (
            self.arena.min.clamp(-limit, limit),
            self.arena.max.clamp(-limit, limit),
        );
        self.arena.min = a.min(b);
        self.arena.max = a.max(b);
        self.arena.margin = clamp_magnitude(self.arena.margin);

        for v in [
            &mut self.player_speed,
            &mut self.fuel_drain_per_sec,
            &mut self.coin_fuel_bonus,
            &mut self.enemy_fuel_penalty,
            &mut self.bomb_cooldown,
            &mut self.safe_time,
            &mut self.coin_radius,
            &mut self.enemy_radius,
            &mut self.enemy.detection_range,
            &mut self.enemy.rotation_speed,
            &mut self.enemy.patrol_radius,
            &mut self.enemy.evade_offset,
            &mut self.enemy.ram_force,
            &mut self.enemy.base_aggression,
            &mut self.spawn.spawn_rate,
            &mut self.spawn.spawn_distance,
        ] {
            *v = clamp_magnitude(*v);
        }
        self
    }

    /// Coins required on `level`
    pub fn threshold(&self, level: u32) -> u32 {
        self.spawn.threshold.for_level(level)
    }

    /// Coins laid out on `level`; never fewer than the threshold
    pub fn coins_for_level(&self, level: u32) -> u32 {
        self.spawn.coins_per_level.max(self.threshold(level))
    }

    /// Detection range in ruleset units
    pub fn detection_range(&self) -> f32 {
        self.enemy.detection_range * self.world_scale
    }

    /// Spawn ring radius in ruleset units
    pub fn spawn_distance(&self) -> f32 {
        self.spawn.spawn_distance * self.world_scale
    }
}

/// Largest distance, rate or bound a config may carry
const CONFIG_LIMIT: f32 = 1.0e6;
/// Keeps scaled ranges well inside f32
const MAX_WORLD_SCALE: f32 = 1.0e3;

/// Negative and NaN become 0, everything else is capped at `CONFIG_LIMIT`
fn clamp_magnitude(v: f32) -> f32 {
    if v >= 0.0 { v.min(CONFIG_LIMIT) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruleset_round_trip_names() {
        assert_eq!(Ruleset::from_str("ARENA"), Some(Ruleset::Arena));
        assert_eq!(Ruleset::from_str("2d"), Some(Ruleset::Canvas));
        assert_eq!(Ruleset::from_str("voxel"), None);
        assert_eq!(Ruleset::Arena.as_str(), "Arena");
    }

    #[test]
    fn test_canvas_threshold_grows_with_level() {
        let config = SessionConfig::for_ruleset(Ruleset::Canvas);
        assert_eq!(config.threshold(1), 12);
        assert_eq!(config.threshold(2), 14);
        // Later levels still lay out enough coins to finish
        assert!(config.coins_for_level(10) >= config.threshold(10));
    }

    #[test]
    fn test_fixed_threshold_is_flat() {
        let t = CoinThreshold::Fixed(20);
        assert_eq!(t.for_level(1), 20);
        assert_eq!(t.for_level(99), 20);
    }

    #[test]
    fn test_sanitized_clamps_negative_rates() {
        let mut config = SessionConfig::for_ruleset(Ruleset::Arena);
        config.fuel_drain_per_sec = -4.0;
        config.world_scale = 0.0;
        config.enemy_fuel_penalty = f32::NAN;
        let config = config.sanitized();
        assert_eq!(config.fuel_drain_per_sec, 0.0);
        assert_eq!(config.world_scale, 1.0);
        assert_eq!(config.enemy_fuel_penalty, 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SessionConfig::from_json(r#"{ "bomb_cooldown": 4.0 }"#).unwrap();
        assert_eq!(config.bomb_cooldown, 4.0);
        assert_eq!(config.ruleset, Ruleset::Canvas);
        assert_eq!(config.coin_radius, 40.0);
    }

    #[test]
    fn test_arena_clamp_respects_margin() {
        let config = SessionConfig::for_ruleset(Ruleset::Canvas);
        let p = config.arena.clamp(Vec2::new(-50.0, 900.0));
        assert_eq!(p, Vec2::new(30.0, 570.0));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = SessionConfig::load("/nonexistent/galaxy.json", Ruleset::Arena);
        assert_eq!(config.ruleset, Ruleset::Arena);
    }

    #[test]
    fn test_sanitized_replaces_infinite_values() {
        let mut config = SessionConfig::for_ruleset(Ruleset::Canvas);
        config.world_scale = f32::INFINITY;
        config.enemy.patrol_radius = f32::INFINITY;
        config.spawn.spawn_distance = 1.0e30;
        config.arena.min = Vec2::splat(f32::NEG_INFINITY);
        let config = config.sanitized();

        assert_eq!(config.world_scale, 20.0);
        assert_eq!(config.arena, SessionConfig::for_ruleset(Ruleset::Canvas).arena);
        assert_eq!(config.enemy.patrol_radius, CONFIG_LIMIT);
        assert!(config.spawn_distance().is_finite());
    }

    #[test]
    fn test_oversized_json_numbers_still_playable() {
        // 1e39 does not fit in f32 and parses as infinity
        let json = r#"{
            "arena": { "min": [0, 0], "max": [1e39, 600], "margin": 30 },
            "enemy": { "patrol_radius": 1e39 },
            "spawn": { "spawn_rate": 1000.0, "spawn_distance": 1e39 }
        }"#;
        let config = SessionConfig::from_json(json).unwrap();
        assert!(config.arena.max.is_finite());

        let mut session = crate::sim::GameSession::new(config, 7, crate::BestStats::default());
        session.start_game();
        for _ in 0..10 {
            session.tick(&crate::sim::TickInput::default(), 0.1);
        }
        assert!(session.player.pos.is_finite());
        assert!(session.registry.enemies.iter().all(|e| e.patrol_point.is_finite()));
    }
}

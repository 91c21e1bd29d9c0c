//! Galaxy Run - simulation core for a coin-collecting space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemy AI, resources, collisions, level flow)
//! - `settings`: Data-driven rules and spawn policy
//! - `highscores`: Best score / level persistence
//! - `host`: Collaborator traits and the event-routing session driver

pub mod highscores;
pub mod host;
pub mod settings;
pub mod sim;

pub use highscores::{BestStats, JsonStatsFile, MemoryStats};
pub use host::{AudioSink, Collaborators, EffectSink, MotionDriver, SessionDriver, StatsStore};
pub use settings::{Ruleset, SessionConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default host timestep (60 Hz). The simulation accepts any `dt`.
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Fuel is a percentage
    pub const MAX_FUEL: f32 = 100.0;

    /// Attack phase length before falling back to chase (seconds)
    pub const ATTACK_DURATION: f32 = 2.0;
    /// Cooldown armed when an attack phase ends (seconds)
    pub const ATTACK_COOLDOWN: f32 = 3.0;
    /// Evasion length before resuming chase (seconds)
    pub const EVADE_DURATION: f32 = 3.0;
    /// Continuous patrol time before a new patrol point is picked (seconds)
    pub const PATROL_REPICK_INTERVAL: f32 = 5.0;
    /// Chase is abandoned beyond this multiple of the detection range
    pub const CHASE_ESCAPE_FACTOR: f32 = 1.5;

    /// Per-level stat growth applied once at spawn
    pub const LEVEL_SPEED_GROWTH: f32 = 0.1;
    pub const LEVEL_AGGRESSION_GROWTH: f32 = 0.15;

    /// Effect lifetimes (seconds)
    pub const EXPLOSION_LIFETIME: f32 = 1.0;
    pub const COIN_COLLECT_LIFETIME: f32 = 0.8;
    pub const ENGINE_TRAIL_LIFETIME: f32 = 0.5;

    /// Engine trail puffs per second while the ship moves
    pub const ENGINE_TRAIL_RATE: f32 = 20.0;
    /// Distance behind the ship where puffs appear (enemy-controller units)
    pub const ENGINE_TRAIL_OFFSET: f32 = 1.2;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Bearing of a direction vector in radians
#[inline]
pub fn bearing(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Rotate `current` toward `target` by `fraction` of the shortest angular gap.
///
/// `fraction` is clamped to [0, 1], so 0 leaves the heading untouched and 1
/// snaps to the target.
#[inline]
pub fn turn_toward(current: f32, target: f32, fraction: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta * fraction.clamp(0.0, 1.0))
}

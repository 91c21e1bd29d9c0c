//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::Countdown;
use crate::consts::*;
use crate::settings::SessionConfig;

/// Identity shared by every entity kind (allocated from one counter)
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not playing; waiting for `start_game`
    MainMenu,
    /// Active gameplay, ticks advance the world
    Running,
    /// Threshold reached; waiting for `next_level`
    LevelComplete,
    /// Fuel ran out
    GameOver,
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Chaser,
    Shooter,
    Bomber,
    Defender,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Chaser,
        EnemyKind::Shooter,
        EnemyKind::Bomber,
        EnemyKind::Defender,
    ];

    /// Movement speed in world units per second, before level scaling
    pub fn base_speed(&self) -> f32 {
        match self {
            Self::Chaser => 4.0,
            Self::Shooter => 2.5,
            Self::Bomber => 3.0,
            Self::Defender => 2.0,
        }
    }

    /// Distance at which a chasing enemy starts attacking (world units)
    pub fn attack_range(&self) -> f32 {
        match self {
            Self::Chaser => 3.0,
            Self::Shooter => 10.0,
            Self::Bomber => 5.0,
            Self::Defender => 6.0,
        }
    }
}

/// Behavioral state of one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    Patrolling,
    Chasing,
    Attacking,
    /// Only entered through an external trigger
    Evading,
}

impl BehaviorState {
    /// Whether `self -> next` is an edge of the behavior table.
    ///
    /// Any state may be forced into Evading by an external trigger.
    pub fn can_transition_to(&self, next: BehaviorState) -> bool {
        use BehaviorState::*;
        matches!(
            (*self, next),
            (Patrolling, Chasing)
                | (Chasing, Attacking)
                | (Chasing, Patrolling)
                | (Attacking, Chasing)
                | (Evading, Chasing)
                | (_, Evading)
        )
    }
}

/// What an attacking enemy asks its collaborators to do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackIntent {
    /// Push the enemy toward the player
    Ram { impulse: Vec2 },
    /// Spawn a projectile
    FireProjectile { origin: Vec2, direction: Vec2 },
    /// Detonate in place
    SelfDestruct { position: Vec2 },
    /// Defensive posture marker, no physical effect
    Guard { position: Vec2 },
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Displacement per second over the last tick
    pub vel: Vec2,
    /// Facing in radians
    pub heading: f32,
    pub state: BehaviorState,
    /// Seconds since the last state transition
    pub state_timer: f32,
    pub attack_cooldown: Countdown,
    pub patrol_point: Vec2,
    /// Level the stats were scaled for
    pub level: u32,
    // Stats fixed at spawn
    pub speed: f32,
    pub aggression: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub rotation_speed: f32,
    pub patrol_radius: f32,
    pub evade_offset: f32,
    pub ram_force: f32,
}

impl Enemy {
    /// Build an enemy with level modifiers applied once
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, level: u32, config: &SessionConfig) -> Self {
        let scale = config.world_scale;
        let level_f = level as f32;
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            heading: 0.0,
            state: BehaviorState::Patrolling,
            state_timer: 0.0,
            attack_cooldown: Countdown::IDLE,
            patrol_point: pos,
            level,
            speed: kind.base_speed() * scale * (1.0 + LEVEL_SPEED_GROWTH * level_f),
            aggression: config.enemy.base_aggression * (1.0 + LEVEL_AGGRESSION_GROWTH * level_f),
            detection_range: config.detection_range(),
            attack_range: kind.attack_range() * scale,
            rotation_speed: config.enemy.rotation_speed,
            patrol_radius: config.enemy.patrol_radius * scale,
            evade_offset: config.enemy.evade_offset * scale,
            ram_force: config.enemy.ram_force,
        }
    }

    /// Switch state and restart the state timer
    pub fn enter(&mut self, next: BehaviorState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
        self.state_timer = 0.0;
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Facing in radians
    pub heading: f32,
    pub speed: f32,
    /// Percentage in [0, 100]
    pub fuel: f32,
    pub bomb_cooldown: Countdown,
    pub safe_time: Countdown,
}

impl Player {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            heading: 0.0,
            speed,
            fuel: MAX_FUEL,
            bomb_cooldown: Countdown::IDLE,
            safe_time: Countdown::IDLE,
        }
    }

    pub fn bomb_available(&self) -> bool {
        !self.bomb_cooldown.is_running()
    }

    pub fn in_safe_time(&self) -> bool {
        self.safe_time.is_running()
    }

    /// Add (or remove, if negative) fuel, clamped to [0, 100]
    pub fn add_fuel(&mut self, amount: f32) {
        let fuel = self.fuel + amount;
        self.fuel = if fuel.is_nan() { 0.0 } else { fuel.clamp(0.0, MAX_FUEL) };
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: EntityId,
    pub pos: Vec2,
    /// Score unit, multiplied by the level on pickup
    pub value: u32,
}

/// Transient visual marker kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Explosion,
    CoinCollect,
    /// Exhaust puff left behind the moving player ship
    EngineTrail,
    Warp,
}

/// A transient effect (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    /// Seconds left before removal
    pub life: f32,
}

/// Sound cues requested from the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// Session started
    BackgroundMusic,
    /// Coin collected
    CoinCollect,
    /// Enemy destroyed by collision
    Explosion,
    /// Bomb detonated
    Bomb,
    /// Level threshold reached
    LevelComplete,
    /// Fuel ran out
    GameOver,
}

/// Everything the core reports outward during a tick or operation.
///
/// Drained by the host; `host::SessionDriver` routes the collaborator-facing
/// variants to the matching sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Effect { kind: EffectKind, pos: Vec2, lifetime: f32 },
    Audio { cue: AudioCue, pos: Vec2 },
    MoveRequested { enemy: EntityId, target: Vec2 },
    Attack { enemy: EntityId, intent: AttackIntent },
    StateChanged { enemy: EntityId, from: BehaviorState, to: BehaviorState },
    /// `level` is the level the enemy's stats were scaled for
    EnemySpawned { enemy: EntityId, kind: EnemyKind, pos: Vec2, level: u32 },
    CoinCollected { coin: EntityId, score_gain: u64 },
    PlayerHit { enemy: EntityId, fuel_lost: f32 },
    BombDetonated { destroyed: usize },
    /// `level` is the level that was just cleared
    LevelComplete { level: u32, score: u64 },
    GameOver { level: u32, score: u64 },
    /// Best stats changed and should be persisted
    StatsSaved { high_score: u64, max_level: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Ruleset, SessionConfig};

    #[test]
    fn test_level_modifiers_applied_at_spawn() {
        let config = SessionConfig::for_ruleset(Ruleset::Arena);
        let e1 = Enemy::new(1, EnemyKind::Chaser, Vec2::ZERO, 0, &config);
        let e3 = Enemy::new(2, EnemyKind::Chaser, Vec2::ZERO, 3, &config);
        assert!((e1.speed - 4.0).abs() < 1e-5);
        assert!((e3.speed - 4.0 * 1.3).abs() < 1e-5);
        assert!((e3.aggression - 1.45).abs() < 1e-5);
    }

    #[test]
    fn test_world_scale_applies_to_ranges() {
        let config = SessionConfig::for_ruleset(Ruleset::Canvas);
        let e = Enemy::new(1, EnemyKind::Shooter, Vec2::ZERO, 0, &config);
        assert_eq!(e.detection_range, 240.0);
        assert_eq!(e.attack_range, 200.0);
    }

    #[test]
    fn test_transition_table() {
        use BehaviorState::*;
        assert!(Patrolling.can_transition_to(Chasing));
        assert!(!Patrolling.can_transition_to(Attacking));
        assert!(!Attacking.can_transition_to(Patrolling));
        assert!(!Evading.can_transition_to(Patrolling));
        assert!(Attacking.can_transition_to(Evading));
    }

    #[test]
    fn test_add_fuel_clamps_both_ends() {
        let mut player = Player::new(Vec2::ZERO, 1.0);
        player.add_fuel(50.0);
        assert_eq!(player.fuel, 100.0);
        player.add_fuel(-250.0);
        assert_eq!(player.fuel, 0.0);
    }
}

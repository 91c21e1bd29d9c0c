//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(dt)`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod behavior;
pub mod clock;
pub mod collision;
pub mod registry;
pub mod session;
pub mod state;
pub mod tick;

pub use behavior::{BehaviorOutput, MotionMode, attack_intent, trigger_evasion, update_enemy};
pub use clock::{ClockReport, Countdown};
pub use collision::{Contact, ContactRadii, detect};
pub use registry::EntityRegistry;
pub use session::GameSession;
pub use state::{
    AttackIntent, AudioCue, BehaviorState, Coin, Effect, EffectKind, Enemy, EnemyKind, EntityId,
    GameEvent, GamePhase, Player,
};
pub use tick::TickInput;

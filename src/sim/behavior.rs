//! Enemy behavior engine
//!
//! Per-enemy finite state machine:
//!
//! | State      | Per-tick action              | Exit                                          |
//! |------------|------------------------------|-----------------------------------------------|
//! | Patrolling | move to patrol point         | player within detection range -> Chasing      |
//! | Chasing    | move to player               | in attack range, cooldown done -> Attacking;  |
//! |            |                              | beyond 1.5x detection -> Patrolling           |
//! | Attacking  | kind-specific attack intent  | after 2 s -> Chasing (3 s cooldown)           |
//! | Evading    | move away from player        | after 3 s -> Chasing                          |
//!
//! Evading is only entered through [`trigger_evasion`].

use glam::Vec2;
use rand::Rng;

use super::state::{AttackIntent, BehaviorState, Enemy, EnemyKind};
use crate::consts::*;
use crate::{bearing, turn_toward};

/// How enemy movement is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// Integrate movement here
    #[default]
    Direct,
    /// Ask the motion collaborator; positions are reported back later
    Delegated,
}

/// Result of one enemy update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorOutput {
    /// `(from, to)` when the state changed this tick
    pub transition: Option<(BehaviorState, BehaviorState)>,
    pub attack: Option<AttackIntent>,
    /// Destination for the motion collaborator (delegated mode only)
    pub move_to: Option<Vec2>,
}

/// Advance one enemy by `dt` against the player's current position
pub fn update_enemy<R: Rng>(
    enemy: &mut Enemy,
    player_pos: Vec2,
    dt: f32,
    motion: MotionMode,
    rng: &mut R,
) -> BehaviorOutput {
    let mut out = BehaviorOutput::default();
    if !(dt > 0.0) {
        return out;
    }

    enemy.state_timer += dt;
    enemy.attack_cooldown.advance(dt);

    // Transitions are decided on the distance before this tick's movement
    let distance = enemy.pos.distance(player_pos);
    let from = enemy.state;

    match enemy.state {
        BehaviorState::Patrolling => {
            if enemy.state_timer > PATROL_REPICK_INTERVAL {
                pick_patrol_point(enemy, rng);
                enemy.state_timer = 0.0;
            }
            let target = enemy.patrol_point;
            out.move_to = steer(enemy, target, dt, motion);

            if distance < enemy.detection_range {
                enemy.enter(BehaviorState::Chasing);
            }
        }

        BehaviorState::Chasing => {
            out.move_to = steer(enemy, player_pos, dt, motion);

            if distance < enemy.attack_range && !enemy.attack_cooldown.is_running() {
                enemy.enter(BehaviorState::Attacking);
            } else if distance > enemy.detection_range * CHASE_ESCAPE_FACTOR {
                enemy.enter(BehaviorState::Patrolling);
            }
        }

        BehaviorState::Attacking => {
            enemy.vel = Vec2::ZERO;
            out.attack = Some(attack_intent(enemy, player_pos));

            if enemy.state_timer > ATTACK_DURATION {
                enemy.enter(BehaviorState::Chasing);
                enemy.attack_cooldown.start(ATTACK_COOLDOWN);
            }
        }

        BehaviorState::Evading => {
            let away = (enemy.pos - player_pos).normalize_or_zero();
            let target = enemy.pos + away * enemy.evade_offset;
            out.move_to = steer(enemy, target, dt, motion);

            if enemy.state_timer > EVADE_DURATION {
                enemy.enter(BehaviorState::Chasing);
            }
        }
    }

    if enemy.state != from {
        out.transition = Some((from, enemy.state));
    }
    out
}

/// Force an enemy into Evading (external trigger, e.g. low health).
///
/// Breaking off an attack arms the attack cooldown like a completed one.
pub fn trigger_evasion(enemy: &mut Enemy) -> (BehaviorState, BehaviorState) {
    let from = enemy.state;
    if from == BehaviorState::Attacking {
        enemy.attack_cooldown.start(ATTACK_COOLDOWN);
    }
    enemy.enter(BehaviorState::Evading);
    (from, BehaviorState::Evading)
}

/// Attack strategy, a pure function of the enemy kind
pub fn attack_intent(enemy: &Enemy, player_pos: Vec2) -> AttackIntent {
    let dir = (player_pos - enemy.pos).normalize_or_zero();
    match enemy.kind {
        EnemyKind::Chaser => AttackIntent::Ram {
            impulse: dir * enemy.ram_force * enemy.aggression,
        },
        EnemyKind::Shooter => AttackIntent::FireProjectile {
            origin: enemy.pos,
            direction: dir,
        },
        EnemyKind::Bomber => AttackIntent::SelfDestruct { position: enemy.pos },
        EnemyKind::Defender => AttackIntent::Guard { position: enemy.pos },
    }
}

/// Pick a fresh patrol point within the patrol radius of the enemy
pub fn pick_patrol_point<R: Rng>(enemy: &mut Enemy, rng: &mut R) {
    let r = enemy.patrol_radius;
    let offset = Vec2::new(rng.random_range(-r..=r), rng.random_range(-r..=r));
    enemy.patrol_point = enemy.pos + offset;
}

/// Move toward `target`, or hand the destination to the motion collaborator
fn steer(enemy: &mut Enemy, target: Vec2, dt: f32, motion: MotionMode) -> Option<Vec2> {
    match motion {
        MotionMode::Delegated => Some(target),
        MotionMode::Direct => {
            let to_target = target - enemy.pos;
            let dir = to_target.normalize_or_zero();
            if dir == Vec2::ZERO {
                enemy.vel = Vec2::ZERO;
                return None;
            }
            // Stop on the target instead of oscillating around it
            let step = (enemy.speed * dt).min(to_target.length());
            enemy.pos += dir * step;
            enemy.vel = dir * (step / dt);
            enemy.heading = turn_toward(enemy.heading, bearing(dir), enemy.rotation_speed * dt);
            None
        }
    }
}

//! Per-tick simulation sequence
//!
//! One call advances the world by `dt` seconds:
//! player movement, resource clock, enemy spawning, enemy behavior, effect
//! aging, then collision resolution.

use glam::Vec2;
use rand::Rng;

use super::behavior;
use super::clock;
use super::collision::{self, Contact, ContactRadii};
use super::session::GameSession;
use super::state::{AudioCue, EffectKind, Enemy, EntityId, GameEvent, GamePhase};
use crate::bearing;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Joystick direction; lengths above 1 are clamped
    pub direction: Vec2,
    /// Request the bomb (same as calling `activate_bomb`)
    pub bomb: bool,
}

impl TickInput {
    /// Demo autopilot: head for the nearest coin, bomb when an enemy closes in
    pub fn autopilot(session: &GameSession) -> Self {
        let player = &session.player;

        let direction = session
            .registry
            .coins
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(player.pos)
                    .partial_cmp(&b.pos.distance_squared(player.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|c| (c.pos - player.pos).normalize_or_zero())
            .unwrap_or(Vec2::ZERO);

        let danger = session.config.enemy_radius * 3.0;
        let threatened = !player.in_safe_time()
            && session
                .registry
                .enemies
                .iter()
                .any(|e| e.pos.distance(player.pos) < danger);

        Self {
            direction,
            bomb: threatened && player.bomb_available(),
        }
    }
}

impl GameSession {
    /// Advance the session by `dt` seconds. Does nothing unless Running or
    /// when `dt` is not positive.
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        if self.phase != GamePhase::Running || !(dt > 0.0) {
            return;
        }

        if input.bomb {
            self.activate_bomb();
        }

        self.elapsed += dt as f64;
        self.move_player(input.direction, dt);

        let report = clock::advance(&mut self.player, self.config.fuel_drain_per_sec, dt);
        if report.bomb_ready {
            log::debug!("Bomb ready");
        }
        if report.safe_time_ended {
            log::debug!("Safe time ended");
        }
        if report.fuel_depleted || self.player.fuel <= 0.0 {
            self.game_over();
            return;
        }

        self.maybe_spawn_enemy(dt);
        self.update_enemies(dt);
        self.registry.age_effects(dt);
        self.resolve_collisions();
    }

    fn move_player(&mut self, direction: Vec2, dt: f32) {
        let dir = if direction.is_finite() {
            direction.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        if dir == Vec2::ZERO {
            self.trail_accumulator = 0.0;
            return;
        }
        let player = &mut self.player;
        player.pos = self.config.arena.clamp(player.pos + dir * player.speed * dt);
        player.heading = bearing(dir);
        self.emit_engine_trail(dir, dt);
    }

    /// Puffs behind the ship at a steady rate, at most a few per tick
    fn emit_engine_trail(&mut self, dir: Vec2, dt: f32) {
        self.trail_accumulator = (self.trail_accumulator + dt * ENGINE_TRAIL_RATE).min(4.0);
        let behind = self.player.pos - dir.normalize_or_zero() * ENGINE_TRAIL_OFFSET * self.config.world_scale;
        while self.trail_accumulator >= 1.0 {
            self.trail_accumulator -= 1.0;
            self.emit_effect(EffectKind::EngineTrail, behind, ENGINE_TRAIL_LIFETIME);
        }
    }

    /// Roll for one spawn. Skipped (not queued) at the enemy cap.
    fn maybe_spawn_enemy(&mut self, dt: f32) {
        let spawn = &self.config.spawn;
        if spawn.roster.is_empty() || self.registry.enemies.len() >= spawn.max_enemies {
            return;
        }
        if self.rng.random::<f32>() >= dt * spawn.spawn_rate {
            return;
        }

        let kind = spawn.roster[self.rng.random_range(0..spawn.roster.len())];
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let pos = self.player.pos + Vec2::from_angle(angle) * self.config.spawn_distance();

        let id = self.registry.next_entity_id();
        let mut enemy = Enemy::new(id, kind, pos, self.level, &self.config);
        behavior::pick_patrol_point(&mut enemy, &mut self.rng);
        let level = enemy.level;

        if self.registry.try_add_enemy(enemy, self.config.spawn.max_enemies) {
            log::debug!("Spawned level {} {:?} #{} at ({:.1}, {:.1})", level, kind, id, pos.x, pos.y);
            self.events.push(GameEvent::EnemySpawned { enemy: id, kind, pos, level });
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        let player_pos = self.player.pos;
        for enemy in self.registry.enemies.iter_mut() {
            let out = behavior::update_enemy(enemy, player_pos, dt, self.motion, &mut self.rng);

            if let Some(target) = out.move_to {
                self.events.push(GameEvent::MoveRequested {
                    enemy: enemy.id,
                    target,
                });
            }
            if let Some(intent) = out.attack {
                self.events.push(GameEvent::Attack {
                    enemy: enemy.id,
                    intent,
                });
            }
            if let Some((from, to)) = out.transition {
                log::debug!("Enemy #{} {:?} -> {:?}", enemy.id, from, to);
                self.events.push(GameEvent::StateChanged {
                    enemy: enemy.id,
                    from,
                    to,
                });
            }
        }
    }

    /// Apply this tick's contacts in order, stopping once the run leaves Running
    fn resolve_collisions(&mut self) {
        let radii = ContactRadii {
            coin: self.config.coin_radius,
            enemy: self.config.enemy_radius,
        };
        for contact in collision::detect(&self.player, &self.registry, radii) {
            if self.phase != GamePhase::Running {
                break;
            }
            match contact {
                Contact::Coin { coin, .. } => self.collect_coin(coin),
                Contact::Enemy { enemy, .. } => self.hit_enemy(enemy),
            }
        }
    }

    fn collect_coin(&mut self, id: EntityId) {
        let Some(coin) = self.registry.remove_coin(id) else {
            return;
        };

        self.coins_collected += 1;
        let score_gain = coin.value as u64 * self.level as u64;
        self.score += score_gain;
        self.player.add_fuel(self.config.coin_fuel_bonus);

        self.emit_effect(EffectKind::CoinCollect, coin.pos, COIN_COLLECT_LIFETIME);
        self.emit_audio(AudioCue::CoinCollect, coin.pos);
        self.events.push(GameEvent::CoinCollected {
            coin: id,
            score_gain,
        });

        if self.coins_collected >= self.threshold() {
            self.complete_level();
        }
    }

    fn hit_enemy(&mut self, id: EntityId) {
        let Some(enemy) = self.registry.remove_enemy(id) else {
            return;
        };

        let before = self.player.fuel;
        self.player.add_fuel(-self.config.enemy_fuel_penalty);
        let fuel_lost = before - self.player.fuel;

        self.emit_effect(EffectKind::Explosion, enemy.pos, EXPLOSION_LIFETIME);
        self.emit_audio(AudioCue::Explosion, enemy.pos);
        self.events.push(GameEvent::PlayerHit {
            enemy: id,
            fuel_lost,
        });
        log::debug!("Hit by {:?} #{}, fuel {:.1}", enemy.kind, id, self.player.fuel);

        if self.player.fuel <= 0.0 {
            self.game_over();
        }
    }
}

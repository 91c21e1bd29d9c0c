//! Entity registry: live enemies, coins and transient effects
//!
//! Collections stay sorted by id (ids are allocated monotonically and only
//! appended), so iteration order is stable across runs with the same seed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Coin, Effect, EffectKind, Enemy, EntityId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub effects: Vec<Effect>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            coins: Vec::new(),
            effects: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an enemy unless `cap` is reached. At the cap the enemy is dropped.
    pub fn try_add_enemy(&mut self, enemy: Enemy, cap: usize) -> bool {
        if self.enemies.len() >= cap {
            return false;
        }
        self.enemies.push(enemy);
        true
    }

    pub fn add_coin(&mut self, pos: Vec2, value: u32) -> EntityId {
        let id = self.next_entity_id();
        self.coins.push(Coin { id, pos, value });
        id
    }

    pub fn add_effect(&mut self, kind: EffectKind, pos: Vec2, life: f32) {
        self.effects.push(Effect { kind, pos, life });
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(idx))
    }

    pub fn remove_coin(&mut self, id: EntityId) -> Option<Coin> {
        let idx = self.coins.iter().position(|c| c.id == id)?;
        Some(self.coins.remove(idx))
    }

    /// Remove every enemy, returning them in iteration order
    pub fn drain_enemies(&mut self) -> Vec<Enemy> {
        std::mem::take(&mut self.enemies)
    }

    /// Age effects by `dt` and drop the expired ones
    pub fn age_effects(&mut self, dt: f32) {
        for effect in &mut self.effects {
            effect.life -= dt;
        }
        self.effects.retain(|e| e.life > 0.0);
    }

    /// Bulk clear for a new game
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.coins.clear();
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SessionConfig;
    use crate::sim::EnemyKind;

    fn enemy(reg: &mut EntityRegistry, config: &SessionConfig) -> Enemy {
        let id = reg.next_entity_id();
        Enemy::new(id, EnemyKind::Bomber, Vec2::ZERO, 1, config)
    }

    #[test]
    fn test_cap_skips_spawn() {
        let config = SessionConfig::default();
        let mut reg = EntityRegistry::new();
        for _ in 0..2 {
            let e = enemy(&mut reg, &config);
            assert!(reg.try_add_enemy(e, 2));
        }
        let e = enemy(&mut reg, &config);
        assert!(!reg.try_add_enemy(e, 2));
        assert_eq!(reg.enemies.len(), 2);
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let config = SessionConfig::default();
        let mut reg = EntityRegistry::new();
        let coin = reg.add_coin(Vec2::ZERO, 1);
        let e = enemy(&mut reg, &config);
        assert_ne!(coin, e.id);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut reg = EntityRegistry::new();
        let a = reg.add_coin(Vec2::ZERO, 1);
        let b = reg.add_coin(Vec2::X, 1);
        let c = reg.add_coin(Vec2::Y, 1);
        assert!(reg.remove_coin(b).is_some());
        assert!(reg.remove_coin(b).is_none());
        let ids: Vec<_> = reg.coins.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_effects_expire() {
        let mut reg = EntityRegistry::new();
        reg.add_effect(EffectKind::CoinCollect, Vec2::ZERO, 0.8);
        reg.add_effect(EffectKind::Explosion, Vec2::ZERO, 1.0);
        reg.age_effects(0.9);
        assert_eq!(reg.effects.len(), 1);
        assert_eq!(reg.effects[0].kind, EffectKind::Explosion);
    }
}

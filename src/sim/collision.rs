//! Collision detection between the player and live entities
//!
//! Detection is separated from application: [`detect`] only reads the world
//! and returns the contacts, the session then applies them in order.

use glam::Vec2;

use super::registry::EntityRegistry;
use super::state::{EntityId, Player};

/// A player overlap found this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Coin { coin: EntityId, pos: Vec2 },
    Enemy { enemy: EntityId, pos: Vec2 },
}

/// Overlap radii (center distance below which a contact occurs)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRadii {
    pub coin: f32,
    pub enemy: f32,
}

/// Find this tick's contacts: every overlapped coin, then at most one enemy.
///
/// The enemy contact is the first overlapping enemy in registry order, not the
/// nearest one. Enemies are skipped entirely while the player is in safe-time.
pub fn detect(player: &Player, registry: &EntityRegistry, radii: ContactRadii) -> Vec<Contact> {
    let mut contacts: Vec<Contact> = registry
        .coins
        .iter()
        .filter(|c| player.pos.distance(c.pos) < radii.coin)
        .map(|c| Contact::Coin { coin: c.id, pos: c.pos })
        .collect();

    if !player.in_safe_time() {
        if let Some(enemy) = registry
            .enemies
            .iter()
            .find(|e| player.pos.distance(e.pos) < radii.enemy)
        {
            contacts.push(Contact::Enemy {
                enemy: enemy.id,
                pos: enemy.pos,
            });
        }
    }

    contacts
}

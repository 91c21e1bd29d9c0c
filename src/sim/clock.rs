//! Resource clock: countdowns and fuel drain advanced once per tick

use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::consts::MAX_FUEL;

/// A countdown in seconds that stops at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// A countdown that has already elapsed
    pub const IDLE: Countdown = Countdown { remaining: 0.0 };

    /// Arm the countdown (negative or NaN durations arm nothing)
    pub fn start(&mut self, secs: f32) {
        self.remaining = if secs > 0.0 { secs } else { 0.0 };
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    /// Advance by `dt`. Returns true only on the call that reaches zero.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 || !(dt > 0.0) {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining == 0.0
    }
}

/// What changed during one clock advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockReport {
    pub fuel_depleted: bool,
    pub bomb_ready: bool,
    pub safe_time_ended: bool,
}

/// Drain fuel and run the player's countdowns down by `dt`
pub fn advance(player: &mut Player, drain_per_sec: f32, dt: f32) -> ClockReport {
    let mut report = ClockReport::default();
    if !(dt > 0.0) {
        return report;
    }

    let before = player.fuel;
    player.fuel = (player.fuel - drain_per_sec.max(0.0) * dt).clamp(0.0, MAX_FUEL);
    report.fuel_depleted = before > 0.0 && player.fuel <= 0.0;

    report.bomb_ready = player.bomb_cooldown.advance(dt);
    report.safe_time_ended = player.safe_time.advance(dt);
    report
}

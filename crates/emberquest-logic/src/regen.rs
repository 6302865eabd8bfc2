//! HP/mana regeneration and global-cooldown decay.
//!
//! Pure functions over [`Vitals`]; both the player and enemy update paths
//! call them once per tick with the frame delta. A delta of zero is a
//! no-op and negative deltas are treated as zero.

use crate::config::SimConfig;
use serde::{Deserialize, Serialize};

/// Health and mana pools with their regeneration timers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub current_hp: f32,
    pub total_hp: f32,
    pub current_mana: f32,
    pub total_mana: f32,
    pub hp_regen_timer: f32,
    pub mana_regen_timer: f32,
}

impl Vitals {
    /// Full pools, timers one second from their first tick.
    pub fn new(total_hp: f32, total_mana: f32) -> Self {
        Self {
            current_hp: total_hp,
            total_hp,
            current_mana: total_mana,
            total_mana,
            hp_regen_timer: 1.0,
            mana_regen_timer: 1.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0.0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.total_hp > 0.0 {
            (self.current_hp / self.total_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.current_hp -= amount;
    }

    /// Raise HP, never above the total.
    pub fn heal(&mut self, amount: f32) {
        self.current_hp = (self.current_hp + amount).min(self.total_hp);
    }

    pub fn restore_hp(&mut self) {
        self.current_hp = self.total_hp;
    }

    pub fn has_mana(&self, cost: f32) -> bool {
        self.current_mana >= cost
    }

    pub fn spend_mana(&mut self, cost: f32) {
        self.current_mana -= cost;
    }
}

fn tick_timer(timer: &mut f32, current: &mut f32, total: f32, amount: f32, delta: f32, interval: f32) {
    *timer -= delta.max(0.0);
    if *timer < 0.0 {
        if *current < total {
            *current = (*current + amount).min(total);
        }
        *timer = interval;
    }
}

pub fn regenerate_mana(v: &mut Vitals, delta: f32, cfg: &SimConfig) {
    if !v.is_alive() {
        return;
    }
    let total = v.total_mana;
    tick_timer(
        &mut v.mana_regen_timer,
        &mut v.current_mana,
        total,
        cfg.mana_regen_amount,
        delta,
        cfg.regen_interval,
    );
}

/// HP regeneration; the timer is frozen while the unit is attacking.
pub fn regenerate_hp(v: &mut Vitals, is_attacking: bool, delta: f32, cfg: &SimConfig) {
    if !v.is_alive() || is_attacking {
        return;
    }
    let total = v.total_hp;
    tick_timer(
        &mut v.hp_regen_timer,
        &mut v.current_hp,
        total,
        cfg.hp_regen_amount,
        delta,
        cfg.regen_interval,
    );
}

/// Count a cooldown down by `delta`, stopping at zero.
pub fn decay_cooldown(cooldown: &mut f32, delta: f32) {
    if *cooldown > 0.0 {
        *cooldown = (*cooldown - delta.max(0.0)).max(0.0);
    }
}

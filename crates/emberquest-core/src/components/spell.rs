//! Spell instances held by the spell engine.

use emberquest_logic::constants::sizes;
use emberquest_logic::geometry::{Rect, Vec2};
use hecs::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellKind {
    Fireball,
    InstantHeal,
    Smite,
}

/// Fixed numbers for one spell kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellDef {
    pub mana_cost: f32,
    pub cast_time: f32,
    pub cooldown: f32,
    /// Reach shown to the player; casting does not enforce it.
    pub range: f32,
}

impl SpellKind {
    pub fn def(self) -> SpellDef {
        match self {
            SpellKind::Fireball => SpellDef {
                mana_cost: 10.0,
                cast_time: 3.0,
                cooldown: 5.0,
                range: 300.0,
            },
            SpellKind::InstantHeal => SpellDef {
                mana_cost: 5.0,
                cast_time: 1.0,
                cooldown: 5.0,
                range: 0.0,
            },
            SpellKind::Smite => SpellDef {
                mana_cost: 10.0,
                cast_time: 0.0,
                cooldown: 2.0,
                range: 150.0,
            },
        }
    }

    /// Whether the spell needs a live target when cast.
    pub fn needs_target(self) -> bool {
        matches!(self, SpellKind::Fireball | SpellKind::Smite)
    }
}

pub const FIREBALL_DAMAGE: f32 = 8.0;
pub const SMITE_DAMAGE: f32 = 15.0;

/// Variant-specific payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpellEffect {
    InstantHeal {
        /// Fixed at creation from the caster's stats.
        amount: f32,
    },
    Smite {
        /// Captured when cast.
        target: Option<Entity>,
        damage: f32,
    },
    Fireball {
        /// Top-left of the projectile hitbox.
        position: Vec2,
        /// Follows the caster's current target every tick.
        target: Option<Entity>,
        damage: f32,
        /// Mana is paid once, when the projectile leaves the hand.
        launched: bool,
    },
}

/// Where a spell is in its cast, resolve, cool-down pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellPhase {
    Casting,
    Resolving,
    Cooling,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spell {
    pub caster: Entity,
    pub kind: SpellKind,
    pub cast_time: f32,
    pub full_cast_time: f32,
    /// Zero once the effect has resolved.
    pub duration: f32,
    pub cooldown: f32,
    pub mana_cost: f32,
    pub range: f32,
    pub effect: SpellEffect,
}

impl Spell {
    pub fn new(caster: Entity, kind: SpellKind, effect: SpellEffect) -> Self {
        let def = kind.def();
        Self {
            caster,
            kind,
            cast_time: def.cast_time,
            full_cast_time: def.cast_time,
            duration: 1.0,
            cooldown: def.cooldown,
            mana_cost: def.mana_cost,
            range: def.range,
            effect,
        }
    }

    pub fn phase(&self) -> SpellPhase {
        if self.cast_time > 0.0 {
            SpellPhase::Casting
        } else if self.duration != 0.0 {
            SpellPhase::Resolving
        } else if self.cooldown > 0.0 {
            SpellPhase::Cooling
        } else {
            SpellPhase::Expired
        }
    }

    /// Fraction of the cast bar filled, for presentation.
    pub fn cast_progress(&self) -> f32 {
        if self.full_cast_time <= 0.0 {
            1.0
        } else {
            (1.0 - self.cast_time / self.full_cast_time).clamp(0.0, 1.0)
        }
    }

    /// The unit this spell is aimed at, if it has one.
    pub fn target(&self) -> Option<Entity> {
        match self.effect {
            SpellEffect::InstantHeal { .. } => None,
            SpellEffect::Smite { target, .. } | SpellEffect::Fireball { target, .. } => target,
        }
    }

    /// Projectile hitbox for a fireball in flight.
    pub fn hitbox(&self) -> Option<Rect> {
        match self.effect {
            SpellEffect::Fireball { position, .. } => {
                Some(Rect::at(position, sizes::FIREBALL, sizes::FIREBALL))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caster() -> Entity {
        hecs::World::new().spawn(())
    }

    #[test]
    fn test_phase_pipeline() {
        let mut s = Spell::new(caster(), SpellKind::InstantHeal, SpellEffect::InstantHeal { amount: 25.0 });
        assert_eq!(s.phase(), SpellPhase::Casting);
        s.cast_time = 0.0;
        assert_eq!(s.phase(), SpellPhase::Resolving);
        s.duration = 0.0;
        assert_eq!(s.phase(), SpellPhase::Cooling);
        s.cooldown = 0.0;
        assert_eq!(s.phase(), SpellPhase::Expired);
    }

    #[test]
    fn test_smite_resolves_immediately() {
        let s = Spell::new(
            caster(),
            SpellKind::Smite,
            SpellEffect::Smite {
                target: None,
                damage: SMITE_DAMAGE,
            },
        );
        assert_eq!(s.phase(), SpellPhase::Resolving);
        assert_eq!(s.cast_progress(), 1.0);
    }

    #[test]
    fn test_fireball_hitbox() {
        let s = Spell::new(
            caster(),
            SpellKind::Fireball,
            SpellEffect::Fireball {
                position: Vec2::new(8.0, 8.0),
                target: None,
                damage: FIREBALL_DAMAGE,
                launched: false,
            },
        );
        assert_eq!(s.hitbox(), Some(Rect::new(8.0, 8.0, 32.0, 32.0)));
        assert_eq!(s.cast_progress(), 0.0);
    }
}

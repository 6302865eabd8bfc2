//! Spell engine - cast gating, per-tick advancement and the removal sweep.
//!
//! Every in-flight spell lives in one ordered list owned by the engine,
//! not by its caster. Each tick the sweep runs first, then the survivors
//! advance in list order through cast, resolve and cool-down.

use super::{is_alive, put, read};
use crate::components::{
    Combat, Spell, SpellEffect, SpellKind, SpellPhase, Unit, FIREBALL_DAMAGE, SMITE_DAMAGE,
};
use crate::error::SimError;
use crate::events::{EventQueue, SimEvent};
use emberquest_logic::config::SimConfig;
use emberquest_logic::constants::sizes;
use emberquest_logic::facing::UnitState;
use emberquest_logic::geometry::{Rect, Vec2};
use hecs::{Entity, World};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct SpellEngine {
    active: Vec<Spell>,
}

impl SpellEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[Spell] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn spells_of(&self, caster: Entity) -> impl Iterator<Item = &Spell> {
        self.active.iter().filter(move |s| s.caster == caster)
    }

    /// Gate check: caster alive, global cooldown clear, and no cooling
    /// spell of the same kind from the same caster.
    pub fn can_cast(
        &self,
        caster: Entity,
        unit: &Unit,
        combat: &Combat,
        kind: SpellKind,
    ) -> Result<(), SimError> {
        if !unit.is_alive() {
            return Err(SimError::CasterDead);
        }
        if combat.global_cooldown > 0.0 {
            return Err(SimError::OnGlobalCooldown);
        }
        let cooling = self
            .spells_of(caster)
            .any(|s| s.kind == kind && s.cooldown > 0.0);
        if cooling {
            return Err(SimError::OnCooldown(kind));
        }
        Ok(())
    }

    /// Start casting `kind`. `unit` and `combat` are the caster's current
    /// state; `combat` is updated in place and the caller writes it back.
    pub fn try_cast(
        &mut self,
        world: &World,
        caster: Entity,
        unit: &Unit,
        combat: &mut Combat,
        kind: SpellKind,
        cfg: &SimConfig,
    ) -> Result<(), SimError> {
        self.can_cast(caster, unit, combat, kind)?;
        let spell = build_spell(world, caster, unit, combat, kind, cfg)?;
        if !unit.vitals.has_mana(spell.mana_cost) {
            return Err(SimError::InsufficientResources {
                needed: spell.mana_cost,
                available: unit.vitals.current_mana,
            });
        }
        combat.is_casting_spell = true;
        combat.global_cooldown = cfg.global_cooldown;
        debug!(?caster, ?kind, "spell cast");
        self.active.push(spell);
        Ok(())
    }

    /// Advance every spell by one tick.
    pub fn update(&mut self, world: &World, delta: f32, cfg: &SimConfig, events: &mut EventQueue) {
        self.sweep(world);
        for spell in &mut self.active {
            advance(world, spell, delta, cfg, events);
        }
    }

    /// Drop spells that are spent, whose caster died, or fireballs that
    /// lost their target. A caster whose spell vanished before resolving
    /// stops casting.
    fn sweep(&mut self, world: &World) {
        let mut interrupted = Vec::new();
        self.active.retain(|s| {
            let spent = s.phase() == SpellPhase::Expired;
            let caster_dead = !is_alive(world, s.caster);
            let lost_target = s.kind == SpellKind::Fireball
                && !s.target().map_or(false, |t| is_alive(world, t));
            let remove = spent || caster_dead || lost_target;
            if remove && s.duration != 0.0 {
                interrupted.push(s.caster);
            }
            !remove
        });
        for caster in interrupted {
            if let Some(mut combat) = read::<Combat>(world, caster) {
                combat.is_casting_spell = false;
                put(world, caster, combat);
            }
            trace!(?caster, "spell interrupted");
        }
    }
}

fn live_target(world: &World, combat: &Combat) -> Result<Entity, SimError> {
    combat
        .target
        .filter(|&t| is_alive(world, t))
        .ok_or(SimError::TargetInvalid)
}

fn build_spell(
    world: &World,
    caster: Entity,
    unit: &Unit,
    combat: &Combat,
    kind: SpellKind,
    cfg: &SimConfig,
) -> Result<Spell, SimError> {
    let target = if kind.needs_target() {
        Some(live_target(world, combat)?)
    } else {
        None
    };
    let effect = match kind {
        SpellKind::InstantHeal => SpellEffect::InstantHeal {
            amount: (unit.vitals.total_hp / 4.0).floor() + combat.spell_power,
        },
        SpellKind::Smite => SpellEffect::Smite {
            target,
            damage: SMITE_DAMAGE,
        },
        SpellKind::Fireball => {
            let offset = cfg.fireball_spawn_offset;
            SpellEffect::Fireball {
                position: unit.bounds.location() + Vec2::new(offset, offset),
                target,
                damage: FIREBALL_DAMAGE,
                launched: false,
            }
        }
    };
    Ok(Spell::new(caster, kind, effect))
}

fn advance(world: &World, spell: &mut Spell, delta: f32, cfg: &SimConfig, events: &mut EventQueue) {
    let caster = spell.caster;
    let (Some(mut unit), Some(mut combat)) = (read::<Unit>(world, caster), read::<Combat>(world, caster)) else {
        return;
    };

    if let SpellEffect::Fireball { target, .. } = &mut spell.effect {
        *target = combat.target;
    }

    if spell.cast_time > 0.0 {
        spell.cast_time -= delta.max(0.0);
        if spell.cast_time > 0.0 {
            match spell.kind {
                SpellKind::Fireball => unit.facing.set(UnitState::CastingFireball),
                SpellKind::InstantHeal => unit.facing.set(UnitState::CastingHeal),
                SpellKind::Smite => {}
            }
            put(world, caster, unit);
            return;
        }
    }

    if spell.duration != 0.0 {
        resolve(world, spell, &mut unit, &mut combat, cfg, events);
        put(world, caster, unit);
        put(world, caster, combat);
    }
    spell.cooldown -= delta.max(0.0);
}

fn resolve(
    world: &World,
    spell: &mut Spell,
    unit: &mut Unit,
    combat: &mut Combat,
    cfg: &SimConfig,
    events: &mut EventQueue,
) {
    let caster = spell.caster;
    let resolved = SimEvent::SpellResolved {
        caster,
        kind: spell.kind,
    };
    match &mut spell.effect {
        SpellEffect::InstantHeal { amount } => {
            unit.vitals.heal(*amount);
            unit.vitals.spend_mana(spell.mana_cost);
            spell.duration = 0.0;
            combat.is_casting_spell = false;
            combat.global_cooldown = cfg.global_cooldown;
            events.push(resolved);
        }
        SpellEffect::Smite { target, damage } => {
            if let Some(t) = target.filter(|&t| is_alive(world, t)) {
                if let Some(mut victim) = read::<Unit>(world, t) {
                    victim.vitals.apply_damage(*damage);
                    put(world, t, victim);
                }
                if let Some(mut retaliate) = read::<Combat>(world, t) {
                    retaliate.target = Some(caster);
                    retaliate.is_attacking = true;
                    put(world, t, retaliate);
                }
                unit.vitals.spend_mana(spell.mana_cost);
            }
            spell.duration = 0.0;
            combat.is_casting_spell = false;
            combat.global_cooldown = cfg.global_cooldown;
            events.push(resolved);
        }
        SpellEffect::Fireball {
            position,
            target,
            damage,
            launched,
        } => {
            let Some(t) = *target else { return };
            let Some(mut victim) = read::<Unit>(world, t) else { return };
            if !*launched {
                *launched = true;
                unit.vitals.spend_mana(spell.mana_cost);
                combat.global_cooldown = cfg.global_cooldown;
            }
            combat.is_casting_spell = false;

            let hitbox = Rect::at(*position, sizes::FIREBALL, sizes::FIREBALL);
            if victim.is_alive() && hitbox.intersects(&victim.bounds) {
                victim.vitals.apply_damage(*damage + combat.spell_power);
                put(world, t, victim);
                spell.duration = 0.0;
                events.push(resolved);
            } else {
                let heading = (victim.bounds.location() - *position).normalize();
                *position += heading * cfg.fireball_step;
            }
        }
    }
}

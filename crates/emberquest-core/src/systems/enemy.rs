//! Enemy AI: aggro, chase and melee, class spells, evade and respawn.
//!
//! Live enemies run every tick in roster order. A dead enemy leaves the
//! live list after the whole pass and waits in the spawn-pending list
//! until its timer runs out; it then comes back as a fresh entity with
//! the same unit id at its original spawn rectangle.

use super::{is_alive, put, read, SpellEngine};
use crate::components::{Backpack, Combat, Enemy, Player, SpellKind, Unit};
use crate::events::{EventQueue, SimEvent};
use crate::generation::spawn_enemy;
use emberquest_logic::combat::{
    aggro_radius, arrived, enemy_swing, melee_damage, respawn_ticks, step_toward, within_aggro,
};
use emberquest_logic::config::SimConfig;
use emberquest_logic::facing::UnitState;
use emberquest_logic::geometry::Vec2;
use emberquest_logic::units::EnemyClass;
use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default)]
pub struct EnemyRoster {
    pub live: Vec<Entity>,
    pub spawn_pending: Vec<Entity>,
}

impl EnemyRoster {
    pub fn new(live: Vec<Entity>) -> Self {
        Self {
            live,
            spawn_pending: Vec::new(),
        }
    }
}

/// Copies of one enemy's components for the length of its update.
struct EnemyState {
    entity: Entity,
    unit: Unit,
    combat: Combat,
    enemy: Enemy,
}

pub fn enemy_system(
    world: &mut World,
    roster: &mut EnemyRoster,
    player: Entity,
    spells: &mut SpellEngine,
    cfg: &SimConfig,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) {
    respawn_pending(world, roster, player, cfg, events);

    let mut engaged = false;
    for &entity in &roster.live {
        let (Some(unit), Some(combat), Some(enemy)) = (
            read::<Unit>(world, entity),
            read::<Combat>(world, entity),
            read::<Enemy>(world, entity),
        ) else {
            continue;
        };
        if !unit.is_alive() {
            continue;
        }
        let mut state = EnemyState {
            entity,
            unit,
            combat,
            enemy,
        };
        think(world, &mut state, player, spells, cfg, rng, events);
        engaged |= state.combat.is_attacking && state.combat.target == Some(player);

        put(world, entity, state.unit);
        put(world, entity, state.combat);
        put(world, entity, state.enemy);
    }

    if engaged {
        if let Some(mut combat) = read::<Combat>(world, player) {
            combat.in_combat = true;
            put(world, player, combat);
        }
    }

    let mut survivors = Vec::with_capacity(roster.live.len());
    for &entity in &roster.live {
        if is_alive(world, entity) {
            survivors.push(entity);
        } else if let Some(killed) = bury(world, entity, cfg) {
            roster.spawn_pending.push(entity);
            events.push(killed);
        }
    }
    roster.live = survivors;
}

fn think(
    world: &World,
    s: &mut EnemyState,
    player: Entity,
    spells: &mut SpellEngine,
    cfg: &SimConfig,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) {
    if s.combat.target.map_or(false, |t| !is_alive(world, t)) {
        s.combat.stop_attacking();
        s.combat.is_casting_spell = false;
        s.enemy.is_evading = true;
    }

    let in_zone = s.unit.bounds.intersects(&s.enemy.zone);
    if s.enemy.is_active && in_zone && !s.enemy.is_evading {
        if s.combat.is_attacking {
            attack(world, s, spells, cfg, events);
        } else {
            check_aggro(world, s, player, cfg, rng, events);
        }
    } else {
        s.enemy.is_evading = true;
        s.combat.stop_attacking();
    }

    if s.enemy.is_evading {
        evade(s, cfg);
    }
}

/// Class spells first; enemies that aren't casting close in and swing.
fn attack(world: &World, s: &mut EnemyState, spells: &mut SpellEngine, cfg: &SimConfig, events: &mut EventQueue) {
    let Some(target) = s.combat.target else { return };

    if !s.combat.is_casting_spell {
        let choice = match s.enemy.class {
            EnemyClass::Mage => Some(SpellKind::Fireball),
            EnemyClass::Boss => {
                let wants_heal = s.unit.vitals.hp_fraction() < 0.5
                    && spells
                        .can_cast(s.entity, &s.unit, &s.combat, SpellKind::InstantHeal)
                        .is_ok();
                Some(if wants_heal {
                    SpellKind::InstantHeal
                } else {
                    SpellKind::Fireball
                })
            }
            EnemyClass::Warrior | EnemyClass::Goblin => None,
        };
        if let Some(kind) = choice {
            if spells
                .try_cast(world, s.entity, &s.unit, &mut s.combat, kind, cfg)
                .is_ok()
            {
                events.push(SimEvent::SpellCast {
                    caster: s.entity,
                    kind,
                });
            }
        }
    }
    if s.combat.is_casting_spell {
        return;
    }

    let Some(mut victim) = read::<Unit>(world, target) else { return };
    let destination = victim.bounds.location() + s.enemy.target_offset;
    move_toward(s, destination, cfg);

    if s.unit.bounds.intersects(&victim.bounds) && enemy_swing(&mut s.combat.swing_timer, cfg.enemy_swing_reset) {
        if victim.is_alive() {
            let armor = read::<Combat>(world, target).map_or(0.0, |c| c.armor);
            let damage = melee_damage(s.combat.autohit_damage, armor);
            victim.vitals.apply_damage(damage);
            put(world, target, victim);
            trace!(enemy = s.unit.unit_id, damage, "enemy autohit");
        }
    }
}

/// Step toward `destination`, or face it once there. Returns whether the
/// enemy had already arrived.
fn move_toward(s: &mut EnemyState, destination: Vec2, cfg: &SimConfig) -> bool {
    match step_toward(&s.unit.bounds, destination, s.unit.move_speed, cfg.arrival_accuracy) {
        Some(step) => {
            s.unit.bounds.translate(step);
            s.unit.direction = step;
            s.unit.facing.walk(step);
            false
        }
        None => {
            s.unit.direction = Vec2::ZERO;
            s.unit.facing.face(destination - s.unit.center());
            true
        }
    }
}

/// Walk home at full health. Evading ends on arrival.
fn evade(s: &mut EnemyState, cfg: &SimConfig) {
    if s.combat.is_attacking {
        return;
    }
    s.unit.vitals.restore_hp();
    let home = s.enemy.spawn_point();
    if arrived(&s.unit.bounds, home, cfg.arrival_accuracy) {
        s.enemy.is_evading = false;
        s.unit.direction = Vec2::ZERO;
        s.unit.facing.set(UnitState::FacingCamera);
    } else {
        move_toward(s, home, cfg);
    }
}

fn check_aggro(
    world: &World,
    s: &mut EnemyState,
    player: Entity,
    cfg: &SimConfig,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) {
    s.unit.facing.set(UnitState::FacingCamera);
    let Some(target) = read::<Unit>(world, player).filter(Unit::is_alive) else {
        return;
    };
    let radius = aggro_radius(s.enemy.class, cfg);
    if !within_aggro(s.unit.center(), target.center(), radius) {
        return;
    }

    let max = cfg.target_displacement_max;
    s.enemy.target_offset = Vec2::new(rng.gen_range(0..=max) as f32, rng.gen_range(0..=max) as f32);
    s.combat.target = Some(player);
    s.combat.is_attacking = true;
    s.combat.in_combat = true;
    debug!(enemy = s.unit.unit_id, class = ?s.enemy.class, "aggro");
    events.push(SimEvent::EnemyAggro {
        enemy: s.entity,
        unit_id: s.unit.unit_id,
    });
}

/// Mark a dead enemy for respawn.
fn bury(world: &World, entity: Entity, cfg: &SimConfig) -> Option<SimEvent> {
    let (mut unit, mut combat, mut enemy) = (
        read::<Unit>(world, entity)?,
        read::<Combat>(world, entity)?,
        read::<Enemy>(world, entity)?,
    );
    enemy.spawn_timer = respawn_ticks(enemy.class, cfg);
    enemy.is_evading = false;
    combat.stop_attacking();
    combat.is_casting_spell = false;
    combat.in_combat = false;
    unit.direction = Vec2::ZERO;
    unit.move_to = None;
    unit.facing.set(UnitState::Dead);
    debug!(enemy = unit.unit_id, ticks = enemy.spawn_timer, "enemy killed");

    put(world, entity, unit);
    put(world, entity, combat);
    put(world, entity, enemy);
    Some(SimEvent::EnemyKilled {
        enemy: entity,
        unit_id: unit.unit_id,
        class: enemy.class,
    })
}

fn respawn_pending(
    world: &mut World,
    roster: &mut EnemyRoster,
    player: Entity,
    cfg: &SimConfig,
    events: &mut EventQueue,
) {
    let mut ready = Vec::new();
    roster.spawn_pending.retain(|&corpse| {
        let Some(mut enemy) = read::<Enemy>(world, corpse) else {
            return false;
        };
        enemy.spawn_timer = enemy.spawn_timer.saturating_sub(1);
        put(world, corpse, enemy);
        if enemy.waiting_to_spawn() {
            true
        } else {
            ready.push(corpse);
            false
        }
    });

    for corpse in ready {
        let (Some(unit), Some(enemy)) = (read::<Unit>(world, corpse), read::<Enemy>(world, corpse)) else {
            continue;
        };

        if let Some(mut state) = read::<Player>(world, player) {
            if state.loot_target == Some(corpse) {
                state.loot_target = None;
                put(world, player, state);
            }
        }
        let leftovers = world
            .get::<&Backpack>(corpse)
            .map(|b| b.items.clone())
            .unwrap_or_default();
        for item in leftovers {
            let _ = world.despawn(item);
        }
        let _ = world.despawn(corpse);

        let fresh = spawn_enemy(world, unit.unit_id, enemy.class, enemy.spawn_bounds, enemy.zone, cfg);
        roster.live.push(fresh);
        debug!(enemy = unit.unit_id, "enemy respawned");
        events.push(SimEvent::EnemyRespawned {
            enemy: fresh,
            unit_id: unit.unit_id,
        });
    }
}

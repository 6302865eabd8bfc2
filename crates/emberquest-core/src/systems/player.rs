//! Player combat: target upkeep, melee autohits, crits, death and respawn.

use super::{put, read};
use crate::components::{Combat, Enemy, Player, Unit};
use crate::events::{EventQueue, SimEvent};
use crate::level::Level;
use emberquest_logic::combat::{melee_damage, player_swing};
use emberquest_logic::config::SimConfig;
use emberquest_logic::geometry::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

/// Autohit for the next swing: base damage, plus a bonus on a crit roll.
pub fn roll_autohit(base: i32, rng: &mut impl Rng, cfg: &SimConfig) -> i32 {
    if cfg.crit_bonus_min > cfg.crit_bonus_max {
        return base;
    }
    if rng.gen_range(0..cfg.crit_one_in.max(1)) == 0 {
        base + rng.gen_range(cfg.crit_bonus_min..=cfg.crit_bonus_max)
    } else {
        base
    }
}

/// Whether the player should drop `target`: gone, dead, or an evading enemy.
fn target_lost(world: &World, target: Entity) -> bool {
    match read::<Unit>(world, target) {
        None => true,
        Some(u) if !u.is_alive() => true,
        Some(_) => read::<Enemy>(world, target).map_or(false, |e| e.is_evading),
    }
}

pub fn player_combat_system(
    world: &mut World,
    player: Entity,
    level: &Level,
    delta: f32,
    cfg: &SimConfig,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) {
    let (Some(mut unit), Some(mut combat), Some(mut state)) = (
        read::<Unit>(world, player),
        read::<Combat>(world, player),
        read::<Player>(world, player),
    ) else {
        return;
    };

    if combat.target.map_or(false, |t| target_lost(world, t)) {
        combat.stop_attacking();
    }

    combat.in_combat = combat.is_attacking;
    state.is_within_melee_range = false;
    if let (true, Some(t)) = (combat.is_attacking, combat.target) {
        if let (Some(mut victim), Some(victim_combat)) = (read::<Unit>(world, t), read::<Combat>(world, t)) {
            if victim.bounds.intersects(&unit.bounds) {
                state.is_within_melee_range = true;
                if player_swing(&mut combat.swing_timer, combat.is_casting_spell, cfg.player_swing_reset) {
                    if unit.is_alive() && victim.is_alive() {
                        let damage = melee_damage(combat.autohit_damage, victim_combat.armor);
                        victim.vitals.apply_damage(damage);
                        put(world, t, victim);
                        debug!(?t, damage, "player autohit");
                    }
                    combat.autohit_damage = roll_autohit(combat.base_autohit, rng, cfg);
                }
            }
        }
    }

    if !unit.is_alive() {
        combat.stop_attacking();
        combat.in_combat = false;
        if !state.awaiting_respawn {
            state.awaiting_respawn = true;
            debug!("player died");
            events.push(SimEvent::PlayerDied);
        }
        if state.respawn_timer < 0.0 {
            respawn(&mut unit, &mut combat, &mut state, level, cfg);
            events.push(SimEvent::PlayerRespawned {
                at: unit.bounds.location(),
            });
        } else {
            state.respawn_timer -= delta.max(0.0);
        }
    }

    put(world, player, unit);
    put(world, player, combat);
    put(world, player, state);
}

/// Bring the player back at the nearest graveyard, or where it fell if
/// the level has none.
fn respawn(unit: &mut Unit, combat: &mut Combat, state: &mut Player, level: &Level, cfg: &SimConfig) {
    let at = level
        .nearest_graveyard(unit.center())
        .unwrap_or_else(|| unit.bounds.location());
    unit.bounds.set_location(at);
    unit.vitals.restore_hp();
    unit.move_to = None;
    unit.direction = Vec2::ZERO;
    combat.is_casting_spell = false;
    state.respawn_timer = cfg.player_respawn_seconds;
    state.last_position = at;
    state.permissions.reset();
    state.loot_target = None;
    state.awaiting_respawn = false;
    debug!(x = at.x, y = at.y, "player respawned");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{spawn_enemy, spawn_player};
    use crate::level::LevelDesc;
    use emberquest_logic::collision::MapObject;
    use emberquest_logic::geometry::Rect;
    use emberquest_logic::units::{EnemyClass, PlayerClass};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        world: World,
        player: Entity,
        foe: Entity,
        level: Level,
        cfg: SimConfig,
        rng: StdRng,
        events: EventQueue,
    }

    fn fixture() -> Fixture {
        let cfg = SimConfig {
            crit_one_in: u32::MAX,
            ..SimConfig::default()
        };
        let mut world = World::new();
        let player = spawn_player(&mut world, PlayerClass::Templar, Vec2::ZERO, &cfg);
        let r = Rect::new(20.0, 0.0, 64.0, 64.0);
        let foe = spawn_enemy(&mut world, 1, EnemyClass::Warrior, r, r, &cfg);
        let level = Level::new(&LevelDesc {
            graveyards: vec![
                MapObject::new("Far", Rect::new(900.0, 900.0, 1.0, 1.0)),
                MapObject::new("Near", Rect::new(100.0, 300.0, 1.0, 1.0)),
            ],
            ..LevelDesc::default()
        });
        Fixture {
            world,
            player,
            foe,
            level,
            cfg,
            rng: StdRng::seed_from_u64(1),
            events: EventQueue::new(),
        }
    }

    impl Fixture {
        fn tick(&mut self, delta: f32) {
            player_combat_system(
                &mut self.world,
                self.player,
                &self.level,
                delta,
                &self.cfg,
                &mut self.rng,
                &mut self.events,
            );
        }

        fn attack(&mut self) {
            let mut c = read::<Combat>(&self.world, self.player).unwrap();
            c.target = Some(self.foe);
            c.is_attacking = true;
            put(&self.world, self.player, c);
        }
    }

    #[test]
    fn test_melee_damage_through_armor() {
        let mut f = fixture();
        let mut fc = read::<Combat>(&f.world, f.foe).unwrap();
        fc.armor = 3.0;
        put(&f.world, f.foe, fc);
        f.attack();

        f.tick(0.016);
        assert_eq!(read::<Unit>(&f.world, f.foe).unwrap().vitals.current_hp, 93.0);
        let c = read::<Combat>(&f.world, f.player).unwrap();
        assert_eq!(c.swing_timer, 50.0);
        assert!(c.in_combat);
        assert!(read::<Player>(&f.world, f.player).unwrap().is_within_melee_range);

        // Next swing lands 51 ticks later.
        for _ in 0..50 {
            f.tick(0.016);
        }
        assert_eq!(read::<Unit>(&f.world, f.foe).unwrap().vitals.current_hp, 93.0);
        f.tick(0.016);
        assert_eq!(read::<Unit>(&f.world, f.foe).unwrap().vitals.current_hp, 86.0);
    }

    #[test]
    fn test_drops_evading_target() {
        let mut f = fixture();
        f.attack();
        let mut e = read::<Enemy>(&f.world, f.foe).unwrap();
        e.is_evading = true;
        put(&f.world, f.foe, e);
        f.tick(0.016);
        let c = read::<Combat>(&f.world, f.player).unwrap();
        assert_eq!(c.target, None);
        assert!(!c.is_attacking);
        assert_eq!(read::<Unit>(&f.world, f.foe).unwrap().vitals.current_hp, 100.0);
    }

    #[test]
    fn test_death_and_respawn_at_nearest_graveyard() {
        let mut f = fixture();
        f.attack();
        let mut u = read::<Unit>(&f.world, f.player).unwrap();
        u.vitals.current_hp = 0.0;
        put(&f.world, f.player, u);

        f.tick(1.0);
        assert!(f.events.iter().any(|e| *e == SimEvent::PlayerDied));
        assert!(read::<Combat>(&f.world, f.player).unwrap().target.is_none());
        f.tick(1.0);
        f.tick(0.5);
        // Timer is now below zero; the next tick respawns.
        assert!(!read::<Unit>(&f.world, f.player).unwrap().is_alive());
        f.tick(0.016);

        let u = read::<Unit>(&f.world, f.player).unwrap();
        assert!(u.is_alive());
        assert_eq!(u.vitals.current_hp, 100.0);
        assert_eq!(u.bounds.location(), Vec2::new(100.0, 300.0));
        assert_eq!(read::<Player>(&f.world, f.player).unwrap().respawn_timer, 2.0);
        let died = f.events.iter().filter(|e| **e == SimEvent::PlayerDied).count();
        assert_eq!(died, 1);
    }

    #[test]
    fn test_crit_roll_bounds() {
        let cfg = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let mut crits = 0;
        for _ in 0..2000 {
            let dmg = roll_autohit(10, &mut rng, &cfg);
            assert!(dmg == 10 || (12..=16).contains(&dmg));
            if dmg > 10 {
                crits += 1;
            }
        }
        assert!(crits > 100 && crits < 400, "crits = {crits}");

        let always = SimConfig {
            crit_one_in: 1,
            ..SimConfig::default()
        };
        assert!(roll_autohit(10, &mut rng, &always) >= 12);
    }
}

//! Regeneration and cooldown decay for every unit that fights.

use crate::components::{Combat, Unit, UnitKind};
use emberquest_logic::config::SimConfig;
use emberquest_logic::regen::{decay_cooldown, regenerate_hp, regenerate_mana};
use hecs::World;

/// Players regenerate HP and mana; caster enemies regenerate mana only.
/// Global cooldowns decay for everyone.
pub fn regen_system(world: &mut World, delta: f32, cfg: &SimConfig) {
    for (_entity, (unit, combat)) in world.query_mut::<(&mut Unit, &mut Combat)>() {
        decay_cooldown(&mut combat.global_cooldown, delta);
        match unit.kind {
            UnitKind::Player(_) => {
                regenerate_mana(&mut unit.vitals, delta, cfg);
                regenerate_hp(&mut unit.vitals, combat.is_attacking, delta, cfg);
            }
            UnitKind::Enemy(class) if class.is_caster() => {
                regenerate_mana(&mut unit.vitals, delta, cfg);
            }
            UnitKind::Enemy(_) | UnitKind::Npc(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{spawn_enemy, spawn_player};
    use emberquest_logic::geometry::{Rect, Vec2};
    use emberquest_logic::units::{EnemyClass, PlayerClass};

    #[test]
    fn test_regen_by_family() {
        let cfg = SimConfig::default();
        let mut world = World::new();
        let player = spawn_player(&mut world, PlayerClass::Templar, Vec2::ZERO, &cfg);
        let r = Rect::new(0.0, 0.0, 64.0, 64.0);
        let mage = spawn_enemy(&mut world, 1, EnemyClass::Mage, r, r, &cfg);
        let warrior = spawn_enemy(&mut world, 2, EnemyClass::Warrior, r, r, &cfg);

        for e in [player, mage, warrior] {
            let mut u = world.get::<&mut Unit>(e).unwrap();
            u.vitals.current_mana = 0.0;
            u.vitals.current_hp = 50.0;
        }

        regen_system(&mut world, 1.5, &cfg);

        let p = world.get::<&Unit>(player).unwrap();
        assert_eq!(p.vitals.current_mana, 1.5);
        assert_eq!(p.vitals.current_hp, 50.5);
        let m = world.get::<&Unit>(mage).unwrap();
        assert_eq!(m.vitals.current_mana, 1.5);
        assert_eq!(m.vitals.current_hp, 50.0);
        let w = world.get::<&Unit>(warrior).unwrap();
        assert_eq!(w.vitals.current_mana, 0.0);
        assert_eq!(world.get::<&Combat>(warrior).unwrap().global_cooldown, 0.0);
    }
}

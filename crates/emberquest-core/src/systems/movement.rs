//! Player movement and facing.
//!
//! Keyboard steps respect the collision permissions; click-to-move walks
//! toward the destination until arrival. Facing follows the step, or the
//! target when standing still with a target in range.

use super::{put, read};
use crate::components::{Combat, Player, Unit};
use crate::input::PlayerInput;
use emberquest_logic::combat::step_toward;
use emberquest_logic::config::SimConfig;
use emberquest_logic::facing::UnitState;
use emberquest_logic::geometry::Vec2;
use hecs::{Entity, World};

pub fn player_movement_system(
    world: &mut World,
    player: Entity,
    input: &PlayerInput,
    delta: f32,
    cfg: &SimConfig,
) {
    let (Some(mut unit), Some(combat), Some(state)) = (
        read::<Unit>(world, player),
        read::<Combat>(world, player),
        read::<Player>(world, player),
    ) else {
        return;
    };

    if !unit.is_alive() {
        unit.facing.set(UnitState::FacingCamera);
        put(world, player, unit);
        return;
    }
    if combat.is_casting_spell {
        unit.facing.set(UnitState::CastingHeal);
        put(world, player, unit);
        return;
    }

    if let Some(dest) = input.move_to {
        unit.move_to = Some(dest);
    }

    let mut step = Vec2::ZERO;
    for &dir in &input.held {
        if state.permissions.allows(dir) {
            step += dir.unit() * (cfg.key_move_speed * delta.max(0.0));
        }
    }
    if !step.is_zero() {
        unit.move_to = None;
    } else if let Some(dest) = unit.move_to {
        match step_toward(&unit.bounds, dest, unit.move_speed, cfg.arrival_accuracy) {
            Some(s) => step = s,
            None => unit.move_to = None,
        }
    }

    unit.direction = step;
    unit.bounds.translate(step);

    let reach = unit.bounds.inflate(cfg.max_range_margin, cfg.max_range_margin);
    let target_in_reach = combat
        .target
        .and_then(|t| read::<Unit>(world, t))
        .filter(|t| t.is_alive() && t.bounds.intersects(&reach));

    if !step.is_zero() {
        unit.facing.walk(step);
    } else if let Some(t) = target_in_reach {
        unit.facing.face(t.center() - unit.center());
    } else {
        unit.facing.face(Vec2::ZERO);
    }

    put(world, player, unit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{spawn_enemy, spawn_player};
    use emberquest_logic::collision::Direction;
    use emberquest_logic::geometry::Rect;
    use emberquest_logic::units::{EnemyClass, PlayerClass};

    fn setup() -> (World, Entity, SimConfig) {
        let cfg = SimConfig::default();
        let mut world = World::new();
        let p = spawn_player(&mut world, PlayerClass::Templar, Vec2::ZERO, &cfg);
        (world, p, cfg)
    }

    #[test]
    fn test_click_to_move_walks_and_stops() {
        let (mut world, p, cfg) = setup();
        let dest = Vec2::new(124.0, 24.0);
        player_movement_system(&mut world, p, &PlayerInput::move_to(dest), 0.016, &cfg);
        let u = read::<Unit>(&world, p).unwrap();
        assert_eq!(u.bounds.location(), Vec2::new(4.0, 0.0));
        assert_eq!(u.facing.unit_state, UnitState::MovingRight);

        for _ in 0..40 {
            player_movement_system(&mut world, p, &PlayerInput::idle(), 0.016, &cfg);
        }
        let u = read::<Unit>(&world, p).unwrap();
        assert_eq!(u.move_to, None);
        assert!(u.center().distance(dest) < 5.0);
        assert_eq!(u.facing.unit_state, UnitState::FacingCamera);
    }

    #[test]
    fn test_keys_respect_permissions() {
        let (mut world, p, cfg) = setup();
        let mut state = read::<Player>(&world, p).unwrap();
        state.permissions.right = false;
        put(&world, p, state);

        let input = PlayerInput {
            held: vec![Direction::Right, Direction::Down],
            ..PlayerInput::default()
        };
        player_movement_system(&mut world, p, &input, 0.1, &cfg);
        let u = read::<Unit>(&world, p).unwrap();
        assert_eq!(u.bounds.location(), Vec2::new(0.0, 20.0));
        assert_eq!(u.facing.unit_state, UnitState::MovingDown);
    }

    #[test]
    fn test_faces_target_in_reach() {
        let (mut world, p, cfg) = setup();
        let r = Rect::new(-120.0, 0.0, 64.0, 64.0);
        let foe = spawn_enemy(&mut world, 1, EnemyClass::Warrior, r, r, &cfg);
        let mut c = read::<Combat>(&world, p).unwrap();
        c.target = Some(foe);
        put(&world, p, c);

        player_movement_system(&mut world, p, &PlayerInput::idle(), 0.016, &cfg);
        let u = read::<Unit>(&world, p).unwrap();
        assert_eq!(u.facing.unit_state, UnitState::FacingLeft);
        assert_eq!(u.facing.weapon_state, UnitState::MovingLeft);
    }

    #[test]
    fn test_ignores_dead_target_in_reach() {
        let (mut world, p, cfg) = setup();
        let r = Rect::new(-120.0, 0.0, 64.0, 64.0);
        let foe = spawn_enemy(&mut world, 1, EnemyClass::Warrior, r, r, &cfg);
        world.get::<&mut Unit>(foe).unwrap().vitals.current_hp = 0.0;
        let mut c = read::<Combat>(&world, p).unwrap();
        c.target = Some(foe);
        put(&world, p, c);

        player_movement_system(&mut world, p, &PlayerInput::idle(), 0.016, &cfg);
        let u = read::<Unit>(&world, p).unwrap();
        assert_eq!(u.facing.unit_state, UnitState::FacingCamera);
    }

    #[test]
    fn test_casting_freezes_player() {
        let (mut world, p, cfg) = setup();
        let mut c = read::<Combat>(&world, p).unwrap();
        c.is_casting_spell = true;
        put(&world, p, c);
        player_movement_system(&mut world, p, &PlayerInput::move_to(Vec2::new(500.0, 0.0)), 0.016, &cfg);
        let u = read::<Unit>(&world, p).unwrap();
        assert_eq!(u.bounds.location(), Vec2::ZERO);
        assert_eq!(u.facing.unit_state, UnitState::CastingHeal);
    }
}

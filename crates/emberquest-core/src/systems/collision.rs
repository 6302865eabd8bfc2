//! Player-versus-map collision for the tick's movement.

use super::{put, read};
use crate::components::{Player, Unit};
use crate::level::{Layer, Level};
use emberquest_logic::collision::{resolve, CollisionOutcome};
use emberquest_logic::config::SimConfig;
use emberquest_logic::geometry::Vec2;
use hecs::{Entity, World};
use tracing::trace;

/// Test the player's moved bounds against collision objects near it.
/// A blocked move reverts and cancels click-to-move.
pub fn collision_system(
    world: &mut World,
    player: Entity,
    level: &Level,
    cfg: &SimConfig,
) -> Option<CollisionOutcome> {
    let (Some(mut unit), Some(mut state)) = (read::<Unit>(world, player), read::<Player>(world, player)) else {
        return None;
    };

    let area = unit.bounds.inflate(cfg.interaction_margin, cfg.interaction_margin);
    let outcome = resolve(
        &mut unit.bounds,
        &mut state.last_position,
        &mut state.permissions,
        level.objects_in(Layer::Collision, &area),
    );

    if let CollisionOutcome::Blocked { object, direction } = &outcome {
        trace!(%object, ?direction, "player blocked");
        unit.move_to = None;
        unit.direction = Vec2::ZERO;
    }

    put(world, player, unit);
    put(world, player, state);
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::spawn_player;
    use crate::level::LevelDesc;
    use emberquest_logic::collision::MapObject;
    use emberquest_logic::geometry::Rect;
    use emberquest_logic::units::PlayerClass;

    #[test]
    fn test_blocked_move_reverts_and_stops() {
        let cfg = SimConfig::default();
        let level = Level::new(&LevelDesc {
            collision: vec![MapObject::new("Fence", Rect::new(50.0, 0.0, 10.0, 100.0))],
            ..LevelDesc::default()
        });
        let mut world = World::new();
        let p = spawn_player(&mut world, PlayerClass::Templar, Vec2::ZERO, &cfg);

        let mut u = read::<Unit>(&world, p).unwrap();
        u.bounds.translate(Vec2::new(4.0, 0.0));
        u.move_to = Some(Vec2::new(300.0, 24.0));
        put(&world, p, u);

        let outcome = collision_system(&mut world, p, &level, &cfg).unwrap();
        assert!(matches!(outcome, CollisionOutcome::Blocked { .. }));
        let u = read::<Unit>(&world, p).unwrap();
        assert_eq!(u.bounds.location(), Vec2::ZERO);
        assert_eq!(u.move_to, None);
        assert!(!read::<Player>(&world, p).unwrap().permissions.right);
    }
}

//! Player-versus-map collision with per-direction movement permissions.
//!
//! Algorithm: "move, test, revert"
//! 1. The mover has already applied this tick's step to its bounds
//! 2. Test the moved bounds against every non-open collision object
//! 3. On contact, revert to last tick's resolved position and block only
//!    the direction that was attempted (x is checked before y)
//! 4. A tick that ends somewhere new re-enables all four directions

use crate::constants::OPEN_TAG;
use crate::geometry::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A named, static rectangle on a map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub name: String,
    pub bounds: Rect,
}

impl MapObject {
    pub fn new(name: impl Into<String>, bounds: Rect) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// Unlocked passages no longer block.
    pub fn is_open(&self) -> bool {
        self.name == OPEN_TAG
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Which directions the player may currently step in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePermissions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for MovePermissions {
    fn default() -> Self {
        Self {
            up: true,
            down: true,
            left: true,
            right: true,
        }
    }
}

impl MovePermissions {
    pub fn allows(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Block the direction of travel from `last` to `current`.
    /// Returns the blocked direction, if any movement happened.
    pub fn block_toward(&mut self, current: Vec2, last: Vec2) -> Option<Direction> {
        let blocked = if current.x > last.x {
            Direction::Right
        } else if current.x < last.x {
            Direction::Left
        } else if current.y > last.y {
            Direction::Down
        } else if current.y < last.y {
            Direction::Up
        } else {
            return None;
        };
        self.reset();
        match blocked {
            Direction::Up => self.up = false,
            Direction::Down => self.down = false,
            Direction::Left => self.left = false,
            Direction::Right => self.right = false,
        }
        Some(blocked)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollisionOutcome {
    /// No contact; `moved` reports whether the position changed this tick.
    Clear { moved: bool },
    /// Reverted after touching the named object.
    Blocked {
        object: String,
        direction: Option<Direction>,
    },
}

/// Resolve one tick of movement. `last` is the previous tick's resolved
/// location and is updated to this tick's.
pub fn resolve<'a>(
    bounds: &mut Rect,
    last: &mut Vec2,
    permissions: &mut MovePermissions,
    obstacles: impl IntoIterator<Item = &'a MapObject>,
) -> CollisionOutcome {
    let hit = obstacles
        .into_iter()
        .find(|o| !o.is_open() && o.bounds.intersects(bounds));

    if let Some(obj) = hit {
        let direction = permissions.block_toward(bounds.location(), *last);
        bounds.set_location(*last);
        return CollisionOutcome::Blocked {
            object: obj.name.clone(),
            direction,
        };
    }

    let moved = bounds.location() != *last;
    if moved {
        permissions.reset();
    }
    *last = bounds.location();
    CollisionOutcome::Clear { moved }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> MapObject {
        MapObject::new("Wall", Rect::new(100.0, 0.0, 20.0, 200.0))
    }

    #[test]
    fn test_blocked_right_then_free_left_resets() {
        let walls = vec![wall()];
        let mut perms = MovePermissions::default();
        let mut last = Vec2::new(50.0, 50.0);
        let mut bounds = Rect::new(54.0, 50.0, 48.0, 48.0);

        let out = resolve(&mut bounds, &mut last, &mut perms, &walls);
        assert!(matches!(
            out,
            CollisionOutcome::Blocked {
                direction: Some(Direction::Right),
                ..
            }
        ));
        assert!(!perms.right);
        assert!(perms.left && perms.up && perms.down);
        assert_eq!(bounds.location(), Vec2::new(50.0, 50.0));

        bounds.translate(Vec2::new(-4.0, 0.0));
        let out = resolve(&mut bounds, &mut last, &mut perms, &walls);
        assert_eq!(out, CollisionOutcome::Clear { moved: true });
        assert_eq!(perms, MovePermissions::default());
        assert_eq!(last, Vec2::new(46.0, 50.0));
    }

    #[test]
    fn test_open_objects_do_not_block() {
        let gate = MapObject::new(OPEN_TAG, Rect::new(0.0, 0.0, 500.0, 500.0));
        let mut perms = MovePermissions::default();
        let mut last = Vec2::new(10.0, 10.0);
        let mut bounds = Rect::new(12.0, 10.0, 48.0, 48.0);
        let out = resolve(&mut bounds, &mut last, &mut perms, [&gate]);
        assert_eq!(out, CollisionOutcome::Clear { moved: true });
    }

    #[test]
    fn test_standing_still_keeps_flags() {
        let mut perms = MovePermissions {
            right: false,
            ..MovePermissions::default()
        };
        let mut last = Vec2::new(0.0, 0.0);
        let mut bounds = Rect::new(0.0, 0.0, 48.0, 48.0);
        let out = resolve(&mut bounds, &mut last, &mut perms, std::iter::empty());
        assert_eq!(out, CollisionOutcome::Clear { moved: false });
        assert!(!perms.right);
    }

    #[test]
    fn test_x_axis_checked_first() {
        let mut perms = MovePermissions::default();
        let dir = perms.block_toward(Vec2::new(1.0, 1.0), Vec2::ZERO);
        assert_eq!(dir, Some(Direction::Right));
        assert!(perms.down);
        let dir = perms.block_toward(Vec2::new(0.0, -1.0), Vec2::ZERO);
        assert_eq!(dir, Some(Direction::Up));
        assert!(perms.right);
        assert!(!perms.up);
    }
}

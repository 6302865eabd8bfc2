//! Four-way facing and moving state selection.
//!
//! The dominant axis of a direction vector picks the pair (left/right or
//! up/down) and its sign picks within the pair. Equal magnitudes resolve
//! to the horizontal pair.

use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// Facing/animation state of a unit. Doubles as the presentation signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitState {
    #[default]
    FacingCamera,
    FacingAway,
    FacingLeft,
    FacingRight,
    MovingUp,
    MovingDown,
    MovingLeft,
    MovingRight,
    CastingFireball,
    CastingHeal,
    Dead,
}

impl UnitState {
    pub fn is_moving(self) -> bool {
        matches!(
            self,
            Self::MovingUp | Self::MovingDown | Self::MovingLeft | Self::MovingRight
        )
    }

    /// Weapon overlay that goes with this body state: standing still
    /// shows the weapon in the moving pose of the same direction.
    pub fn weapon_pose(self) -> UnitState {
        match self {
            Self::FacingCamera => Self::MovingDown,
            Self::FacingAway => Self::MovingUp,
            Self::FacingLeft => Self::MovingLeft,
            Self::FacingRight => Self::MovingRight,
            other => other,
        }
    }
}

fn horizontal_dominates(dir: Vec2) -> bool {
    dir.x.abs() >= dir.y.abs()
}

/// Moving state for a non-zero step.
pub fn moving_state(dir: Vec2) -> UnitState {
    if horizontal_dominates(dir) {
        if dir.x > 0.0 {
            UnitState::MovingRight
        } else {
            UnitState::MovingLeft
        }
    } else if dir.y > 0.0 {
        UnitState::MovingDown
    } else {
        UnitState::MovingUp
    }
}

/// Standing state when looking along `dir`. The zero vector faces the camera.
pub fn facing_state(dir: Vec2) -> UnitState {
    if dir.is_zero() {
        return UnitState::FacingCamera;
    }
    if horizontal_dominates(dir) {
        if dir.x > 0.0 {
            UnitState::FacingRight
        } else {
            UnitState::FacingLeft
        }
    } else if dir.y > 0.0 {
        UnitState::FacingCamera
    } else {
        UnitState::FacingAway
    }
}

/// Body and weapon state pair carried by every unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facing {
    pub unit_state: UnitState,
    pub weapon_state: UnitState,
}

impl Facing {
    pub fn set(&mut self, state: UnitState) {
        self.unit_state = state;
        self.weapon_state = state.weapon_pose();
    }

    pub fn face(&mut self, dir: Vec2) {
        self.set(facing_state(dir));
    }

    pub fn walk(&mut self, step: Vec2) {
        self.set(moving_state(step));
    }
}

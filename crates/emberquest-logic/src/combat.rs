//! Melee timing, aggro detection, arrival and stepping.

use crate::config::SimConfig;
use crate::geometry::{Rect, Vec2};
use crate::units::EnemyClass;

/// Damage one autohit deals through armor. Never negative.
pub fn melee_damage(autohit_damage: i32, armor: f32) -> f32 {
    (autohit_damage as f32 - armor).max(0.0)
}

/// Player swing clock, counted in ticks. Returns true when a swing lands
/// this tick; the timer then restarts at `reset`. The clock holds while
/// the player is casting.
pub fn player_swing(timer: &mut f32, is_casting: bool, reset: f32) -> bool {
    if *timer <= 0.0 {
        *timer = reset;
        true
    } else {
        if !is_casting {
            *timer -= 1.0;
        }
        false
    }
}

/// Enemy swing clock. Lands once the timer has dropped below zero.
pub fn enemy_swing(timer: &mut f32, reset: f32) -> bool {
    if *timer < 0.0 {
        *timer = reset;
        true
    } else {
        *timer -= 1.0;
        false
    }
}

pub fn aggro_radius(class: EnemyClass, cfg: &SimConfig) -> f32 {
    match class {
        EnemyClass::Mage => cfg.mage_aggro_radius,
        EnemyClass::Warrior | EnemyClass::Goblin | EnemyClass::Boss => cfg.aggro_radius,
    }
}

/// Rectangular proximity test: `other` lies strictly inside the square of
/// half-size `radius` around `center`.
pub fn within_aggro(center: Vec2, other: Vec2, radius: f32) -> bool {
    other.x < center.x + radius
        && other.x > center.x - radius
        && other.y < center.y + radius
        && other.y > center.y - radius
}

/// Whether a mover's centre is within `accuracy` of `target`.
pub fn arrived(bounds: &Rect, target: Vec2, accuracy: f32) -> bool {
    bounds.center().distance(target) < accuracy
}

/// Movement for one tick from `bounds` toward `target` at `speed`, or
/// `None` once arrived.
pub fn step_toward(bounds: &Rect, target: Vec2, speed: f32, accuracy: f32) -> Option<Vec2> {
    if arrived(bounds, target, accuracy) {
        return None;
    }
    Some((target - bounds.center()).normalize() * speed)
}

/// Ticks a dead enemy waits before respawning.
pub fn respawn_ticks(class: EnemyClass, cfg: &SimConfig) -> u32 {
    match class {
        EnemyClass::Goblin => cfg.goblin_respawn_ticks,
        EnemyClass::Warrior | EnemyClass::Mage | EnemyClass::Boss => cfg.enemy_respawn_ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melee_damage_through_armor() {
        assert_eq!(melee_damage(10, 3.0), 7.0);
        assert_eq!(melee_damage(2, 5.0), 0.0);
    }

    #[test]
    fn test_player_swing_cycle() {
        let mut timer = 0.0;
        assert!(player_swing(&mut timer, false, 50.0));
        assert_eq!(timer, 50.0);
        for _ in 0..50 {
            assert!(!player_swing(&mut timer, false, 50.0));
        }
        assert_eq!(timer, 0.0);
        assert!(player_swing(&mut timer, false, 50.0));
    }

    #[test]
    fn test_player_swing_holds_while_casting() {
        let mut timer = 10.0;
        assert!(!player_swing(&mut timer, true, 50.0));
        assert_eq!(timer, 10.0);
    }

    #[test]
    fn test_enemy_swing_needs_negative_timer() {
        let mut timer = 0.0;
        assert!(!enemy_swing(&mut timer, 20.0));
        assert_eq!(timer, -1.0);
        assert!(enemy_swing(&mut timer, 20.0));
        assert_eq!(timer, 20.0);
    }

    #[test]
    fn test_aggro_is_strict() {
        let c = Vec2::new(0.0, 0.0);
        assert!(within_aggro(c, Vec2::new(199.0, -199.0), 200.0));
        assert!(!within_aggro(c, Vec2::new(200.0, 0.0), 200.0));
        assert!(!within_aggro(c, Vec2::new(0.0, -200.0), 200.0));
    }

    #[test]
    fn test_aggro_radius_by_class() {
        let cfg = SimConfig::default();
        assert_eq!(aggro_radius(EnemyClass::Mage, &cfg), 300.0);
        assert_eq!(aggro_radius(EnemyClass::Goblin, &cfg), 200.0);
        assert_eq!(aggro_radius(EnemyClass::Warrior, &cfg), 200.0);
    }

    #[test]
    fn test_step_stops_on_arrival() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(step_toward(&r, Vec2::new(8.0, 5.0), 4.0, 5.0), None);
        let step = step_toward(&r, Vec2::new(105.0, 5.0), 4.0, 5.0).unwrap();
        assert_eq!(step, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_respawn_delay() {
        let cfg = SimConfig::default();
        assert_eq!(respawn_ticks(EnemyClass::Goblin, &cfg), 2000);
        assert_eq!(respawn_ticks(EnemyClass::Boss, &cfg), 10000);
    }
}

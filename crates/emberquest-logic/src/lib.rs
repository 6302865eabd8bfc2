//! Pure rules for EmberQuest.
//!
//! Everything here is independent of the ECS world and the tick loop.
//! Functions take plain data and return results, so each rule is
//! unit-testable on its own and shared by every update path in
//! `emberquest-core`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`collision`] | Move-test-revert collision, per-direction permissions |
//! | [`combat`] | Melee damage, swing clocks, aggro, arrival, respawn delay |
//! | [`config`] | [`config::SimConfig`] tuning with JSON overrides |
//! | [`constants`] | Level/content integer codes, unit sizes |
//! | [`facing`] | Four-way facing/moving selection |
//! | [`geometry`] | `Vec2`, `Rect`, nearest-point search |
//! | [`items`] | Armor and quest item kinds |
//! | [`quest`] | Quest, objective and dialogue records |
//! | [`regen`] | HP/mana regeneration, cooldown decay |
//! | [`units`] | Player/enemy/NPC classes and stat blocks |

pub mod collision;
pub mod combat;
pub mod config;
pub mod constants;
pub mod facing;
pub mod geometry;
pub mod items;
pub mod quest;
pub mod regen;
pub mod units;

//! EmberQuest Core - real-time action RPG simulation engine
//!
//! Units, spells, combat, movement and quests for a single player
//! fighting through a 2D map, advanced one tick at a time by a host game
//! loop.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: the player, enemies, NPCs and items
//! - **Components**: plain data attached to entities (Unit, Combat, Enemy, Item, ...)
//! - **Systems**: per-tick logic that queries and updates components
//!
//! Engine-free rules (geometry, regeneration, melee formulas, collision
//! permissions, quest records) live in `emberquest-logic`.
//!
//! # Example
//!
//! ```rust,no_run
//! use emberquest_core::prelude::*;
//!
//! let level = r#"{ "player_start": { "x": 100, "y": 100 } }"#;
//! let content = r#"{ "quests": [{ "id": 1, "pickup_npc": 1, "turn_in_npc": 1,
//!     "pre_message": "", "mid_message": "", "end_message": "", "objectives": [] }] }"#;
//! let mut engine = SimulationEngine::from_json(level, content, SimConfig::default()).unwrap();
//!
//! loop {
//!     engine.update(1.0 / 60.0, &PlayerInput::idle());
//!     for event in engine.drain_events() {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod components;
pub mod content;
pub mod engine;
pub mod error;
pub mod events;
pub mod generation;
pub mod input;
pub mod level;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::content::Content;
    pub use crate::engine::SimulationEngine;
    pub use crate::error::{ContentError, QuestError, SimError};
    pub use crate::events::SimEvent;
    pub use crate::input::{PlayerCommand, PlayerInput};
    pub use crate::level::LevelDesc;
    pub use emberquest_logic::config::SimConfig;
}

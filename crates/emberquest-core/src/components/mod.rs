//! Component definitions for the ECS simulation.
//!
//! Components are plain data attached to entities. Behaviour lives in
//! systems; the few methods here are accessors and derived values.

mod actors;
mod item;
mod spell;
mod unit;

pub use actors::*;
pub use item::*;
pub use spell::*;
pub use unit::*;

pub mod cell;
pub mod event;
pub mod inference;
pub mod map;
pub mod respawn;

pub use cell::{Cell, Hazard, Percepts, Safety, Walkability};
pub use event::MapEvent;
pub use map::{KnowledgeMap, PassabilityGrid};

pub mod action;
pub mod grid;
pub mod observation;

pub use action::{Action, ItemKind};
pub use grid::{Facing, Pos, Pose};
pub use observation::Observation;

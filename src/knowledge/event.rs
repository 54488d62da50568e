/// Events emitted by a knowledge update.
/// The agent layer consumes these for logging.

use super::cell::Hazard;
use crate::domain::{ItemKind, Pos};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MapEvent {
    HazardProven { hazard: Hazard, pos: Pos },
    CellBlocked { pos: Pos },
    ItemSighted { kind: ItemKind, pos: Pos },
}

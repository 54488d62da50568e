/// Per-cell belief state.
/// Properties are queried via methods so belief semantics stay centralized
/// here; `KnowledgeMap` only decides *when* they change.

use crate::domain::ItemKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Safety {
    #[default]
    Unknown,
    Safe,
    Unsafe,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Walkability {
    #[default]
    Unknown,
    Walkable,
    Blocked,
}

/// The two hazards sensed only through adjacency (breeze, flash).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Hazard {
    Pit,
    Teleporter,
}

impl Hazard {
    pub const ALL: [Hazard; 2] = [Hazard::Pit, Hazard::Teleporter];

    pub fn percept(self) -> Percepts {
        match self {
            Hazard::Pit => Percepts::PIT,
            Hazard::Teleporter => Percepts::TELEPORTER,
        }
    }
}

// ── Percept flags ──

/// Independent perception flags; several may coexist on one cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Percepts(u8);

impl Percepts {
    pub const NONE: Percepts = Percepts(0);
    pub const PIT: Percepts = Percepts(1 << 0);
    pub const TELEPORTER: Percepts = Percepts(1 << 1);
    pub const BLOCKED: Percepts = Percepts(1 << 2);
    pub const GOLD: Percepts = Percepts(1 << 3);
    pub const RING: Percepts = Percepts(1 << 4);
    pub const COIN: Percepts = Percepts(1 << 5);
    pub const POTION: Percepts = Percepts(1 << 6);

    pub const HAZARDS: Percepts = Percepts(Self::PIT.0 | Self::TELEPORTER.0);

    pub fn item(kind: ItemKind) -> Percepts {
        match kind {
            ItemKind::Gold => Percepts::GOLD,
            ItemKind::Ring => Percepts::RING,
            ItemKind::Coin => Percepts::COIN,
            ItemKind::Potion => Percepts::POTION,
        }
    }

    pub fn contains(self, other: Percepts) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn intersects(self, other: Percepts) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Percepts) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Percepts) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ── Cell ──

#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub safe: Safety,
    pub walkable: Walkability,
    pub percepts: Percepts,
    pub visits: u32,
    /// A hazard on this cell was proven by elimination; never retracted.
    pub certain: bool,
    /// Energy restored by the potion here, when the light carried it.
    pub potion_power: Option<u32>,
}

impl Cell {
    pub fn is_free(&self) -> bool {
        self.safe == Safety::Safe && self.walkable == Walkability::Walkable
    }

    pub fn is_known(&self) -> bool {
        self.visits > 0 && self.safe == Safety::Safe
    }

    pub fn has_item(&self, kind: ItemKind) -> bool {
        self.percepts.contains(Percepts::item(kind))
    }

    /// Assert the cell hazard-free. Clears pit/teleporter suspicion.
    /// Returns false (and changes nothing) on a proven hazard.
    pub fn assert_safe(&mut self) -> bool {
        if self.certain {
            return false;
        }
        self.safe = Safety::Safe;
        self.percepts.remove(Percepts::HAZARDS);
        true
    }

    /// Upgrade `Unknown` walkability; never overrides a known wall.
    pub fn assume_walkable(&mut self) {
        if self.walkable == Walkability::Unknown {
            self.walkable = Walkability::Walkable;
        }
    }

    pub fn prove_hazard(&mut self, hazard: Hazard) {
        self.certain = true;
        self.safe = Safety::Unsafe;
        self.walkable = Walkability::Blocked;
        self.percepts.insert(hazard.percept());
    }

    /// One character for the ASCII dump.
    pub fn glyph(&self) -> char {
        if self.walkable == Walkability::Blocked && !self.certain {
            '#'
        } else if self.percepts.contains(Percepts::PIT) {
            if self.certain { 'P' } else { 'p' }
        } else if self.percepts.contains(Percepts::TELEPORTER) {
            if self.certain { 'T' } else { 't' }
        } else if self.has_item(ItemKind::Gold) {
            '$'
        } else if self.has_item(ItemKind::Ring) || self.has_item(ItemKind::Coin) {
            'o'
        } else if self.has_item(ItemKind::Potion) {
            '+'
        } else if self.visits > 0 {
            '.'
        } else if self.safe == Safety::Safe {
            ','
        } else {
            '?'
        }
    }
}

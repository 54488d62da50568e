/// Item respawn registry.
///
/// One entry per picked-up item slot, holding the item kind and the ticks
/// left until it reappears. Absence of an entry means the slot may be picked.

use std::collections::BTreeMap;

use crate::domain::{ItemKind, Pos};

#[derive(Clone, Debug)]
pub struct RespawnRegistry {
    duration: u32,
    slots: BTreeMap<Pos, (ItemKind, u32)>,
}

impl RespawnRegistry {
    pub fn new(duration: u32) -> Self {
        RespawnRegistry { duration, slots: BTreeMap::new() }
    }

    /// (Re)start the lock on `pos` for an item of `kind`. A zero duration
    /// locks nothing.
    pub fn register(&mut self, pos: Pos, kind: ItemKind) {
        if self.duration > 0 {
            self.slots.insert(pos, (kind, self.duration));
        }
    }

    /// One tick: every entry counts down; entries reaching zero are dropped
    /// and returned, since their item is back.
    pub fn advance(&mut self) -> Vec<(Pos, ItemKind)> {
        let mut respawned = Vec::new();
        self.slots.retain(|&pos, (kind, left)| {
            *left -= 1;
            if *left == 0 {
                respawned.push((pos, *kind));
            }
            *left > 0
        });
        respawned
    }

    pub fn remaining(&self, pos: Pos) -> Option<u32> {
        self.slots.get(&pos).map(|&(_, left)| left)
    }

    pub fn is_locked(&self, pos: Pos) -> bool {
        self.slots.contains_key(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, ItemKind, u32)> + '_ {
        self.slots.iter().map(|(&p, &(kind, left))| (p, kind, left))
    }

    pub fn snapshot(&self) -> BTreeMap<Pos, u32> {
        self.slots.iter().map(|(&p, &(_, left))| (p, left)).collect()
    }
}

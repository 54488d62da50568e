/// Hazard inference over adjacency perceptions.
///
/// A breeze (or flash) says "at least one of my unknown neighbours holds a
/// pit (teleporter)". Each such sensing is stored as one candidate set.
/// Sets only ever shrink:
///   1. members that became safe are dropped;
///   2. a set left with one member proves the hazard there;
///   3. hazards of one type are never 8-adjacent, so the ring around every
///      proven hazard is cleared of that type and purged from all sets.
/// Steps repeat until nothing changes. This is a lazy approximation, not
/// full model enumeration; it is sound for the single-type adjacency rule.

use tracing::info;

use super::cell::{Hazard, Percepts, Safety};
use super::event::MapEvent;
use super::map::KnowledgeMap;
use crate::domain::Pos;

/// Live candidate sets for one hazard type.
#[derive(Clone, Debug, Default)]
pub struct CandidateSets {
    sets: Vec<Vec<Pos>>,
}

impl CandidateSets {
    pub fn add(&mut self, members: Vec<Pos>) {
        if !members.is_empty() {
            self.sets.push(members);
        }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Drop `pos` from every set. Returns whether anything was removed.
    fn purge(&mut self, pos: Pos) -> bool {
        let mut removed = false;
        for set in &mut self.sets {
            let before = set.len();
            set.retain(|&p| p != pos);
            removed |= set.len() != before;
        }
        removed
    }
}

impl KnowledgeMap {
    /// Run elimination for `hazard` to a fixed point.
    pub(super) fn eliminate(&mut self, hazard: Hazard, events: &mut Vec<MapEvent>) {
        loop {
            let mut changed = self.prune_and_prove(hazard, events);
            changed |= self.apply_non_adjacency(hazard);
            if !changed {
                break;
            }
        }
    }

    // Steps 1 and 2.
    fn prune_and_prove(&mut self, hazard: Hazard, events: &mut Vec<MapEvent>) -> bool {
        let mut sets = std::mem::take(self.candidates_mut(hazard));
        let mut changed = false;
        let mut kept = Vec::with_capacity(sets.sets.len());

        for mut set in sets.sets.drain(..) {
            // Already explained by a proven hazard of this type.
            if set.iter().any(|&p| self.is_certain(p, hazard)) {
                changed = true;
                continue;
            }

            let before = set.len();
            set.retain(|&p| self.cell(p).map_or(false, |c| c.safe != Safety::Safe));
            changed |= set.len() != before;

            match set.len() {
                0 => changed = true,
                1 => {
                    changed = true;
                    let pos = set[0];
                    // Contradicts non-adjacency: drop the set rather than prove.
                    if pos.neighbors8().iter().any(|&n| self.is_certain(n, hazard)) {
                        continue;
                    }
                    if let Some(cell) = self.cell_mut(pos) {
                        cell.prove_hazard(hazard);
                        info!(?hazard, %pos, "hazard proven by elimination");
                        events.push(MapEvent::HazardProven { hazard, pos });
                    }
                }
                _ => kept.push(set),
            }
        }

        sets.sets = kept;
        *self.candidates_mut(hazard) = sets;
        changed
    }

    // Step 3.
    fn apply_non_adjacency(&mut self, hazard: Hazard) -> bool {
        let flag = hazard.percept();
        let proven: Vec<Pos> = self
            .positions()
            .filter(|&p| self.is_certain(p, hazard))
            .collect();

        let mut changed = false;
        for center in proven {
            for n in center.neighbors8() {
                let Some(cell) = self.cell_mut(n) else { continue };
                if cell.certain {
                    continue;
                }
                if cell.percepts.contains(flag) {
                    cell.percepts.remove(flag);
                    changed = true;
                }
                // The other hazard type is still possible here.
                let other_suspected = cell.percepts.intersects(Percepts::HAZARDS);
                if !other_suspected && cell.safe != Safety::Safe {
                    cell.assert_safe();
                    changed = true;
                }
                changed |= self.candidates_mut(hazard).purge(n);
            }
        }
        changed
    }

    fn is_certain(&self, pos: Pos, hazard: Hazard) -> bool {
        self.cell(pos)
            .map_or(false, |c| c.certain && c.percepts.contains(hazard.percept()))
    }
}

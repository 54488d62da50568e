/// KnowledgeMap: the agent's persistent belief about the arena.
///
/// ## Cell layers
///
/// Every grid coordinate owns one `Cell` (safety, walkability, percept
/// flags, visit count, proof marker). Cells are stored row-major in a
/// flat `Vec`; out-of-range coordinates are rejected by `idx()` so every
/// query answers "nothing there" and every mutator is a no-op.
///
/// ## Update contract
///
/// `update()` is called once per sensor cycle with the agent's pose and
/// that cycle's observations. It is the only place beliefs grow, apart from
/// `register_pickup()` and `advance_respawn_timers()`.
///
/// Hazard inference lives in `inference.rs`; item locks in `respawn.rs`.

use std::collections::BTreeMap;

use tracing::debug;

use super::cell::{Cell, Hazard, Percepts, Safety, Walkability};
use super::event::MapEvent;
use super::inference::CandidateSets;
use super::respawn::RespawnRegistry;
use crate::domain::{ItemKind, Observation, Pos, Pose};

#[derive(Clone, Debug)]
pub struct KnowledgeMap {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    pits: CandidateSets,
    teleporters: CandidateSets,
    respawn: RespawnRegistry,
}

impl KnowledgeMap {
    pub fn new(width: u32, height: u32, respawn_ticks: u32) -> Self {
        let width = width as i32;
        let height = height as i32;
        KnowledgeMap {
            width,
            height,
            cells: vec![Cell::default(); (width.max(0) * height.max(0)) as usize],
            pits: CandidateSets::default(),
            teleporters: CandidateSets::default(),
            respawn: RespawnRegistry::new(respawn_ticks),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn idx(&self, pos: Pos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.idx(pos).map(|i| &self.cells[i])
    }

    pub(super) fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.idx(pos).map(move |i| &mut self.cells[i])
    }

    /// All in-bounds coordinates, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Pos::new(x, y)))
    }

    pub fn candidates(&self, hazard: Hazard) -> &CandidateSets {
        match hazard {
            Hazard::Pit => &self.pits,
            Hazard::Teleporter => &self.teleporters,
        }
    }

    pub(super) fn candidates_mut(&mut self, hazard: Hazard) -> &mut CandidateSets {
        match hazard {
            Hazard::Pit => &mut self.pits,
            Hazard::Teleporter => &mut self.teleporters,
        }
    }

    // ── Update ──

    /// Fold one cycle of observations, sensed at `pose`, into the map.
    pub fn update(&mut self, pose: Pose, observations: &[Observation]) -> Vec<MapEvent> {
        let mut events = Vec::new();
        let here = pose.pos;
        let Some(cell) = self.cell_mut(here) else {
            debug!(%here, "update outside grid ignored");
            return events;
        };

        cell.visits += 1;
        if cell.assert_safe() {
            cell.walkable = Walkability::Walkable;
        }

        let mut adjacency_sensed = false;
        for obs in observations {
            match *obs {
                Observation::Blocked => self.mark_blocked(pose.ahead(), &mut events),
                Observation::Item { kind, power } => self.mark_item(here, kind, power, &mut events),
                Observation::Breeze => {
                    adjacency_sensed = true;
                    self.sense_hazard(here, Hazard::Pit, &mut events);
                }
                Observation::Flash => {
                    adjacency_sensed = true;
                    self.sense_hazard(here, Hazard::Teleporter, &mut events);
                }
                Observation::Steps
                | Observation::Damage
                | Observation::Hit
                | Observation::Enemy(_) => {}
            }
        }

        if !adjacency_sensed {
            for n in here.neighbors4() {
                if let Some(cell) = self.cell_mut(n) {
                    if cell.assert_safe() {
                        cell.assume_walkable();
                    }
                }
            }
        }

        // Safety may have grown this cycle; let every live set shrink.
        for hazard in Hazard::ALL {
            self.eliminate(hazard, &mut events);
        }
        events
    }

    fn mark_blocked(&mut self, ahead: Pos, events: &mut Vec<MapEvent>) {
        let Some(cell) = self.cell_mut(ahead) else { return };
        if !cell.assert_safe() {
            return;
        }
        let fresh = cell.walkable != Walkability::Blocked;
        cell.walkable = Walkability::Blocked;
        cell.percepts.insert(Percepts::BLOCKED);
        if fresh {
            events.push(MapEvent::CellBlocked { pos: ahead });
        }
    }

    fn mark_item(&mut self, pos: Pos, kind: ItemKind, power: Option<u32>, events: &mut Vec<MapEvent>) {
        let Some(cell) = self.cell_mut(pos) else { return };
        let fresh = !cell.has_item(kind);
        cell.percepts.insert(Percepts::item(kind));
        if power.is_some() {
            cell.potion_power = power;
        }
        if fresh {
            events.push(MapEvent::ItemSighted { kind, pos });
        }
    }

    /// Breeze/flash at `here`: flag the unsafe-or-unknown neighbours, record
    /// the unknown ones as a candidate set, then eliminate.
    fn sense_hazard(&mut self, here: Pos, hazard: Hazard, events: &mut Vec<MapEvent>) {
        let flag = hazard.percept();
        let mut members = Vec::with_capacity(4);
        let mut explained = false;

        for n in here.neighbors4() {
            let Some(cell) = self.cell_mut(n) else { continue };
            if cell.certain {
                explained |= cell.percepts.contains(flag);
                continue;
            }
            if cell.safe == Safety::Safe {
                continue;
            }
            cell.percepts.insert(flag);
            if cell.safe == Safety::Unknown {
                members.push(n);
            }
        }

        if !explained {
            self.candidates_mut(hazard).add(members);
        }
        self.eliminate(hazard, events);
    }

    // ── Queries ──

    /// Safe AND walkable.
    pub fn is_free(&self, pos: Pos) -> bool {
        self.cell(pos).map_or(false, Cell::is_free)
    }

    pub fn passability(&self) -> PassabilityGrid {
        PassabilityGrid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(Cell::is_free).collect(),
        }
    }

    pub fn is_item_here(&self, kind: ItemKind, pos: Pos) -> bool {
        self.cell(pos).map_or(false, |c| c.has_item(kind))
    }

    /// No active respawn lock on `pos`.
    pub fn can_pick(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.respawn.is_locked(pos)
    }

    /// Nearest free cell other than `from`, within `max` Manhattan distance
    /// when given. Unvisited free cells (the frontier) win over visited ones.
    pub fn nearest_free(&self, from: Pos, max: Option<u32>) -> Option<Pos> {
        self.positions()
            .filter(|&p| p != from && self.is_free(p))
            .filter(|&p| max.map_or(true, |m| p.manhattan(from) <= m))
            .min_by_key(|&p| {
                let visited = self.cell(p).map_or(0, |c| c.visits) > 0;
                (visited, p.manhattan(from), p.y, p.x)
            })
    }

    /// Free cells other than `from` within `radius` (0 = whole grid).
    pub fn free_within(&self, from: Pos, radius: u32) -> Vec<Pos> {
        self.positions()
            .filter(|&p| p != from && within(from, p, radius) && self.is_free(p))
            .collect()
    }

    /// Visited-and-safe cells other than `from` within `radius` (0 = whole grid).
    pub fn known_within(&self, from: Pos, radius: u32) -> Vec<Pos> {
        self.positions()
            .filter(|&p| p != from && within(from, p, radius))
            .filter(|&p| self.cell(p).map_or(false, Cell::is_known))
            .collect()
    }

    /// Best pickable item among `kinds`: highest reward first, nearest to
    /// `from` on ties. Potions are rewarded by their known power.
    pub fn best_known_item(&self, kinds: &[ItemKind], from: Pos) -> Option<(Pos, ItemKind)> {
        self.known_items(kinds, from).into_iter().next()
    }

    /// Every pickable item among `kinds`, best first, one entry per cell.
    /// Same ranking as `best_known_item`.
    pub fn known_items(&self, kinds: &[ItemKind], from: Pos) -> Vec<(Pos, ItemKind)> {
        let mut ranked: Vec<_> = self
            .positions()
            .filter(|&p| self.can_pick(p))
            .filter_map(|p| {
                let cell = self.cell(p)?;
                kinds
                    .iter()
                    .filter(|&&k| cell.has_item(k))
                    .map(|&k| (p, k, item_reward(cell, k)))
                    .max_by_key(|&(_, _, reward)| reward)
            })
            .collect();
        ranked.sort_by_key(|&(p, _, reward)| (std::cmp::Reverse(reward), p.manhattan(from), p.y, p.x));
        ranked.into_iter().map(|(p, k, _)| (p, k)).collect()
    }

    /// Locked slots whose item is one of `kinds`, with the ticks left until
    /// they respawn.
    pub fn respawning(&self, kinds: &[ItemKind]) -> Vec<(Pos, ItemKind, u32)> {
        self.respawn
            .iter()
            .filter(|(_, kind, _)| kinds.contains(kind))
            .collect()
    }

    pub fn respawn_remaining(&self, pos: Pos) -> Option<u32> {
        self.respawn.remaining(pos)
    }

    pub fn respawn_snapshot(&self) -> BTreeMap<Pos, u32> {
        self.respawn.snapshot()
    }

    // ── Mutators ──

    /// Take the `kind` item at `pos`: its flag is cleared and the slot is
    /// locked for the configured respawn duration.
    pub fn register_pickup(&mut self, pos: Pos, kind: ItemKind) {
        let Some(cell) = self.cell_mut(pos) else { return };
        cell.percepts.remove(Percepts::item(kind));
        self.respawn.register(pos, kind);
    }

    /// One tick of respawn countdown. Slots whose lock runs out get their
    /// item back.
    pub fn advance_respawn_timers(&mut self) {
        for (pos, kind) in self.respawn.advance() {
            if let Some(cell) = self.cell_mut(pos) {
                cell.percepts.insert(Percepts::item(kind));
            }
            debug!(%pos, ?kind, "item respawned");
        }
    }

    // ── Debug ──

    /// Plain-text dump of the belief grid, one row per line.
    pub fn render_ascii(&self, agent: Option<Pose>) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Pos::new(x, y);
                let ch = match agent {
                    Some(a) if a.pos == p => match a.facing {
                        crate::domain::Facing::North => '^',
                        crate::domain::Facing::East => '>',
                        crate::domain::Facing::South => 'v',
                        crate::domain::Facing::West => '<',
                    },
                    _ => self.cell(p).map_or('?', Cell::glyph),
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

fn within(from: Pos, p: Pos, radius: u32) -> bool {
    radius == 0 || from.manhattan(p) <= radius
}

fn item_reward(cell: &Cell, kind: ItemKind) -> u32 {
    match kind {
        ItemKind::Potion => cell.potion_power.unwrap_or(kind.reward()),
        _ => kind.reward(),
    }
}

// ── Passability ──

/// Boolean snapshot of which cells may be entered, handed to the planner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassabilityGrid {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl PassabilityGrid {
    pub fn new(width: u32, height: u32, passable: bool) -> Self {
        let (width, height) = (width as i32, height as i32);
        PassabilityGrid {
            width,
            height,
            cells: vec![passable; (width.max(0) * height.max(0)) as usize],
        }
    }

    /// Build from a diagram: '#' is impassable, anything else passable.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
        let mut grid = PassabilityGrid::new(width, height, true);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                grid.set(Pos::new(x as i32, y as i32), ch != '#');
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set(&mut self, pos: Pos, passable: bool) {
        if let Some(i) = self.idx(pos) {
            self.cells[i] = passable;
        }
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        self.idx(pos).map_or(false, |i| self.cells[i])
    }

    pub fn idx(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

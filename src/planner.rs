/// PathPlanner: A* over (x, y, facing).
///
/// Moves: turn left / turn right (cost 1, facing only) and forward
/// (cost 1, only onto a passable cell). Heuristic is Manhattan distance on
/// position alone, which never overestimates since every step costs 1.
/// Any facing at the goal position satisfies the goal test.
///
/// The planner holds no state between calls; each call takes a fresh
/// passability snapshot. "No path" is an empty plan, never an error.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::{Action, Facing, Pos, Pose};
use crate::knowledge::PassabilityGrid;

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    state: usize,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, u64) {
        (self.f, self.g, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest key.
        other.key().cmp(&self.key())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PathPlanner;

impl PathPlanner {
    pub fn new() -> Self {
        PathPlanner
    }

    /// Actions leading from `start` to `goal` (any final facing).
    /// Empty when already there, when `goal` is impassable, or unreachable.
    pub fn plan(&self, grid: &PassabilityGrid, start: Pose, goal: Pos) -> Vec<Action> {
        self.search(grid, start, goal).unwrap_or_default()
    }

    /// Step count of the cheapest plan: `Some(0)` at the goal, `None` when
    /// no plan exists.
    pub fn estimate_cost(&self, grid: &PassabilityGrid, start: Pose, goal: Pos) -> Option<u32> {
        if start.pos == goal {
            return Some(0);
        }
        self.search(grid, start, goal).map(|p| p.len() as u32)
    }

    fn search(&self, grid: &PassabilityGrid, start: Pose, goal: Pos) -> Option<Vec<Action>> {
        if start.pos == goal {
            return None;
        }
        if !grid.is_passable(goal) {
            return None;
        }

        let states = grid.len() * 4;
        let mut g_score = vec![u32::MAX; states];
        let mut came_from: Vec<Option<(usize, Action)>> = vec![None; states];
        let mut open = BinaryHeap::new();
        let mut tie: u64 = 0;

        let start_state = state_of(grid, start)?;
        g_score[start_state] = 0;
        open.push(OpenNode { f: start.pos.manhattan(goal), g: 0, state: start_state, tie });

        while let Some(node) = open.pop() {
            if node.g != g_score[node.state] {
                // Stale heap entry.
                continue;
            }
            let pose = pose_of(grid, node.state);
            if pose.pos == goal {
                break;
            }

            for (next, action) in successors(grid, pose) {
                let Some(next_state) = state_of(grid, next) else { continue };
                let tentative = node.g + 1;
                if tentative >= g_score[next_state] {
                    continue;
                }
                g_score[next_state] = tentative;
                came_from[next_state] = Some((node.state, action));
                tie += 1;
                open.push(OpenNode {
                    f: tentative + next.pos.manhattan(goal),
                    g: tentative,
                    state: next_state,
                    tie,
                });
            }
        }

        // Cheapest recorded facing at the goal.
        let end = Facing::ALL
            .iter()
            .filter_map(|&f| state_of(grid, Pose { pos: goal, facing: f }))
            .filter(|&s| g_score[s] != u32::MAX)
            .min_by_key(|&s| g_score[s])?;

        let mut path = Vec::with_capacity(g_score[end] as usize);
        let mut current = end;
        while let Some((prev, action)) = came_from[current] {
            path.push(action);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

fn state_of(grid: &PassabilityGrid, pose: Pose) -> Option<usize> {
    grid.idx(pose.pos).map(|i| i * 4 + pose.facing.index())
}

fn pose_of(grid: &PassabilityGrid, state: usize) -> Pose {
    let cell = (state / 4) as i32;
    let w = grid.width();
    Pose {
        pos: Pos::new(cell % w, cell / w),
        facing: Facing::from_index(state % 4),
    }
}

fn successors(grid: &PassabilityGrid, pose: Pose) -> impl Iterator<Item = (Pose, Action)> {
    let left = Pose { facing: pose.facing.left(), ..pose };
    let right = Pose { facing: pose.facing.right(), ..pose };
    let ahead = pose.ahead();
    let forward = grid
        .is_passable(ahead)
        .then_some((Pose { pos: ahead, ..pose }, Action::Forward));
    [(left, Action::TurnLeft), (right, Action::TurnRight)]
        .into_iter()
        .chain(forward)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

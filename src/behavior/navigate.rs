/// Navigation handlers: FindGold, FindPotion, Exploration.
///
/// All three share one contract: keep consuming the cached path while the
/// world still matches it, otherwise ask the planner for a fresh one toward
/// the cached objective. An empty plan clears navigation and turns.

use rand::seq::SliceRandom;
use rand::Rng;

use super::context::AgentContext;
use super::machine::BehaviorStateMachine;
use crate::domain::{Action, Pos, Pose};
use crate::knowledge::{KnowledgeMap, PassabilityGrid};

/// Radius for the "known cell nearby" exploration pick.
const KNOWN_RADIUS: u32 = 10;
/// Radius for the tight "free cell nearby" exploration pick.
const NEAR_RADIUS: u32 = 5;

impl BehaviorStateMachine {
    // ── FindGold / FindPotion ──

    pub(super) fn find_item(
        &mut self,
        map: &KnowledgeMap,
        ctx: &AgentContext,
        grid: &PassabilityGrid,
    ) -> Action {
        if let Some(action) = self.follow_path(map, ctx.pose) {
            return action;
        }
        match self.nav.target {
            // Standing on it: the pickup override acts once the lock expires.
            Some(target) if target == ctx.pose.pos => Action::NoOp,
            Some(target) => self.navigate_to(grid, ctx.pose, target),
            None => Action::NoOp,
        }
    }

    // ── Exploration ──

    pub(super) fn explore(
        &mut self,
        map: &KnowledgeMap,
        ctx: &AgentContext,
        grid: &PassabilityGrid,
    ) -> Action {
        if let Some(action) = self.follow_path(map, ctx.pose) {
            return action;
        }
        // Arrived, or the cached route went stale: pick something new.
        self.nav.clear();

        let pose = ctx.pose;
        if map.is_free(pose.ahead()) && self.rng.gen_bool(self.exploration.run_probability) {
            return self.start_run(map, pose);
        }

        match self.pick_exploration_target(map, pose.pos) {
            Some(target) => {
                self.nav.retarget(target);
                self.navigate_to(grid, pose, target)
            }
            None => Action::TurnLeft,
        }
    }

    /// Queue a straight run of random length (cut short at the first
    /// non-free cell) followed by a random turn.
    fn start_run(&mut self, map: &KnowledgeMap, pose: Pose) -> Action {
        let wanted = self.rng.gen_range(self.exploration.min_run..=self.exploration.max_run);
        let mut steps = 0;
        let mut cursor = pose;
        while steps < wanted && map.is_free(cursor.ahead()) {
            cursor.pos = cursor.ahead();
            steps += 1;
        }

        self.nav.clear();
        self.nav.target = Some(cursor.pos);
        self.nav.path.extend(std::iter::repeat(Action::Forward).take(steps as usize));
        let turn = if self.rng.gen_bool(0.5) { Action::TurnLeft } else { Action::TurnRight };
        self.nav.path.push_back(turn);
        self.pop_step(pose).unwrap_or(Action::NoOp)
    }

    fn pick_exploration_target(&mut self, map: &KnowledgeMap, here: Pos) -> Option<Pos> {
        let roll = self.rng.gen_range(1..=100u32);
        let pool = match roll {
            1..=2 => map.known_within(here, 0),
            3..=5 => map.free_within(here, 0),
            6..=10 => map.known_within(here, KNOWN_RADIUS),
            11..=20 => {
                let radius = self.rng.gen_range(5..=15u32);
                map.free_within(here, radius)
            }
            21..=35 => map.free_within(here, NEAR_RADIUS),
            _ => return map.nearest_free(here, None),
        };
        pool.choose(&mut self.rng).copied().or_else(|| map.nearest_free(here, None))
    }

    // ── Shared path contract ──

    /// Next cached step, or `None` when the cache is empty or stale.
    /// Stale means the last step did not land where expected, or the next
    /// forward step is no longer free.
    fn follow_path(&mut self, map: &KnowledgeMap, pose: Pose) -> Option<Action> {
        if let Some(expected) = self.nav.expected {
            if expected != pose {
                self.nav.path.clear();
                self.nav.expected = None;
                return None;
            }
        }
        if self.nav.path.front() == Some(&Action::Forward) && !map.is_free(pose.ahead()) {
            self.nav.path.clear();
            self.nav.expected = None;
            return None;
        }
        self.pop_step(pose)
    }

    pub(super) fn navigate_to(&mut self, grid: &PassabilityGrid, pose: Pose, target: Pos) -> Action {
        let plan = self.planner.plan(grid, pose, target);
        if plan.is_empty() {
            self.nav.clear();
            return Action::TurnLeft;
        }
        self.nav.path = plan.into();
        self.pop_step(pose).unwrap_or(Action::NoOp)
    }

    /// Pop the next step and remember the pose it should produce.
    fn pop_step(&mut self, pose: Pose) -> Option<Action> {
        let action = self.nav.path.pop_front()?;
        self.nav.expected = Some(predict(pose, action));
        Some(action)
    }
}

fn predict(pose: Pose, action: Action) -> Pose {
    match action {
        Action::TurnLeft => Pose { facing: pose.facing.left(), ..pose },
        Action::TurnRight => Pose { facing: pose.facing.right(), ..pose },
        Action::Forward => Pose { pos: pose.ahead(), ..pose },
        Action::Backward => Pose { pos: pose.behind(), ..pose },
        _ => pose,
    }
}

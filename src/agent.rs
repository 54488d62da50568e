/// Agent: one decision cycle per server frame.
///
/// Order inside `cycle()`:
///   1. tick + respawn timers advance
///   2. sensor tokens parsed and folded into the knowledge map
///   3. context snapshot built from the status line and bookkeeping
///   4. operator override queue, if non-empty, wins outright
///   5. item pickup on the current cell, if one is allowed
///   6. otherwise the behavior state machine decides

use std::collections::VecDeque;

use tracing::{debug, info, trace};

use crate::behavior::{AgentContext, BehaviorState, BehaviorStateMachine};
use crate::config::AgentConfig;
use crate::domain::observation::parse_batch;
use crate::domain::{Action, ItemKind, Observation, Pose};
use crate::knowledge::{KnowledgeMap, MapEvent};

/// What the server reports about us each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    pub pose: Pose,
    pub score: i32,
    pub energy: i32,
}

pub struct Agent {
    map: KnowledgeMap,
    machine: BehaviorStateMachine,
    overrides: VecDeque<Action>,
    max_energy: i32,

    tick: u64,
    last_score: Option<i32>,
    last_score_gain_tick: u64,
    last_hit_tick: Option<u64>,
    last_steps_tick: Option<u64>,
    enemy_distance: Option<u32>,
}

impl Agent {
    pub fn new(config: &AgentConfig) -> Self {
        Agent {
            map: KnowledgeMap::new(config.grid.width, config.grid.height, config.items.respawn_ticks),
            machine: BehaviorStateMachine::new(
                config.behavior.clone(),
                config.exploration.clone(),
                config.items.max_energy,
            ),
            overrides: VecDeque::new(),
            max_energy: config.items.max_energy,
            tick: 0,
            last_score: None,
            last_score_gain_tick: 0,
            last_hit_tick: None,
            last_steps_tick: None,
            enemy_distance: None,
        }
    }

    pub fn map(&self) -> &KnowledgeMap {
        &self.map
    }

    pub fn state(&self) -> BehaviorState {
        self.machine.state()
    }

    /// Cycles completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Queue an operator action; queued actions preempt everything else,
    /// one per cycle, in order.
    pub fn push_override(&mut self, action: Action) {
        self.overrides.push_back(action);
    }

    pub fn cycle<S: AsRef<str>>(&mut self, status: Status, tokens: &[S]) -> Action {
        let tick = self.tick;
        self.tick += 1;
        self.map.advance_respawn_timers();

        let observations = parse_batch(tokens);
        self.absorb(tick, status, &observations);

        for event in self.map.update(status.pose, &observations) {
            log_event(event);
        }
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(tick, "map\n{}", self.map.render_ascii(Some(status.pose)));
        }

        let ctx = AgentContext {
            pose: status.pose,
            energy: status.energy,
            score: status.score,
            tick,
            last_hit_tick: self.last_hit_tick,
            last_steps_tick: self.last_steps_tick,
            last_score_gain_tick: self.last_score_gain_tick,
            enemy_distance: self.enemy_distance,
        };

        if let Some(action) = self.overrides.pop_front() {
            debug!(%action, "operator override");
            return action;
        }
        if let Some(action) = self.pickup(status) {
            return action;
        }
        self.machine.next_action(&self.map, &ctx)
    }

    /// Fold this cycle's status and sensor tokens into the timers the
    /// context is built from.
    fn absorb(&mut self, tick: u64, status: Status, observations: &[Observation]) {
        if let Some(prev) = self.last_score {
            if status.score > prev {
                self.last_score_gain_tick = tick;
            }
        }
        self.last_score = Some(status.score);

        self.enemy_distance = None;
        for obs in observations {
            match *obs {
                Observation::Damage => self.last_hit_tick = Some(tick),
                Observation::Steps => self.last_steps_tick = Some(tick),
                Observation::Enemy(d) => {
                    self.enemy_distance = Some(self.enemy_distance.map_or(d, |cur| cur.min(d)));
                }
                Observation::Hit => debug!(tick, "shot landed"),
                _ => {}
            }
        }
    }

    /// Pick up whatever the current cell holds, best first. Potions are
    /// left alone while energy is full.
    fn pickup(&mut self, status: Status) -> Option<Action> {
        let here = status.pose.pos;
        if !self.map.can_pick(here) {
            return None;
        }
        let kind = ItemKind::PICKUP_ORDER
            .into_iter()
            .filter(|&k| k != ItemKind::Potion || status.energy < self.max_energy)
            .find(|&k| self.map.is_item_here(k, here))?;

        self.map.register_pickup(here, kind);
        info!(?kind, %here, "pickup");
        Some(kind.pickup_action())
    }
}

fn log_event(event: MapEvent) {
    match event {
        MapEvent::HazardProven { hazard, pos } => debug!(?hazard, %pos, "hazard proven"),
        MapEvent::CellBlocked { pos } => debug!(%pos, "cell blocked"),
        MapEvent::ItemSighted { kind, pos } => debug!(?kind, %pos, "item sighted"),
    }
}

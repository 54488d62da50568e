/// Combat handlers: Attack, LookForOpponent, Evade.
///
/// None of these plan paths. Every movement they emit is checked against
/// the map's free cells first so a reflex never walks into a hazard.

use tracing::debug;

use super::context::AgentContext;
use super::machine::BehaviorStateMachine;
use super::state::{Bracket, EvadeAxis};
use crate::domain::Action;
use crate::knowledge::KnowledgeMap;

impl BehaviorStateMachine {
    // ── Attack ──

    pub(super) fn attack(&mut self, map: &KnowledgeMap, ctx: &AgentContext) -> Action {
        if ctx.tick < self.attack.cooldown_until {
            return Action::NoOp;
        }
        let Some(distance) = ctx.enemy_distance else {
            return Action::NoOp;
        };

        let bracket = Bracket::of(distance);
        if self.attack.sequence.is_empty() || self.attack.bracket != Some(bracket) {
            self.attack.sequence = burst(bracket, map, ctx).into();
            self.attack.bracket = Some(bracket);
        }

        let Some(action) = self.attack.sequence.pop_front() else {
            return Action::NoOp;
        };
        if action == Action::Shoot {
            self.attack.shots += 1;
            if self.attack.shots > self.config.max_burst_shots {
                self.attack.cooldown_until = ctx.tick + self.config.attack_cooldown_ticks;
                debug!(until = self.attack.cooldown_until, "attack cooldown");
                self.attack.reset();
                return Action::NoOp;
            }
        }
        action
    }

    // ── LookForOpponent ──

    pub(super) fn look_for_opponent(&mut self, ctx: &AgentContext) -> Action {
        if ctx.sees_enemy() {
            // Attack takes over next cycle.
            self.look.reset();
            return Action::NoOp;
        }
        if self.look.turns >= self.config.look_turns || (self.look.turns > 0 && !ctx.hears_steps()) {
            self.look.reset();
            self.look.cooldown_until = ctx.tick + self.config.look_cooldown_ticks;
            return Action::NoOp;
        }
        self.look.turns += 1;
        Action::TurnRight
    }

    // ── Evade ──

    pub(super) fn evade(&mut self, map: &KnowledgeMap, ctx: &AgentContext) -> Action {
        self.evade.last_hit = Some(ctx.tick);
        let pose = ctx.pose;

        if self.evade.axis != EvadeAxis::ForwardBack {
            self.evade.axis = EvadeAxis::ForwardBack;
            if map.is_free(pose.ahead()) {
                return Action::Forward;
            }
            if map.is_free(pose.behind()) {
                return Action::Backward;
            }
        }

        // No strafe in the action set: turning toward a free side lines up
        // the next escape step.
        self.evade.axis = EvadeAxis::LeftRight;
        if map.is_free(pose.left_side()) {
            Action::TurnLeft
        } else if map.is_free(pose.right_side()) {
            Action::TurnRight
        } else {
            Action::NoOp
        }
    }
}

/// Shots for the bracket, plus a step when the destination is free.
fn burst(bracket: Bracket, map: &KnowledgeMap, ctx: &AgentContext) -> Vec<Action> {
    let pose = ctx.pose;
    let (shots, step) = match bracket {
        Bracket::Far => (1, Some((Action::Forward, pose.ahead()))),
        Bracket::Mid => (2, Some((Action::Forward, pose.ahead()))),
        Bracket::Near => (3, None),
        Bracket::Close => (4, Some((Action::Backward, pose.behind()))),
    };
    let mut seq = vec![Action::Shoot; shots];
    if let Some((action, dest)) = step {
        if map.is_free(dest) {
            seq.push(action);
        }
    }
    seq
}

/// Behavior states and the private working memory each one owns.
/// Memory is reset when its owning state is left, so a stale plan from
/// one behavior never leaks into another.

use std::collections::VecDeque;
use std::fmt;

use crate::domain::{Action, Pos, Pose};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BehaviorState {
    Exploration,
    LookForOpponent,
    Attack,
    Evade,
    FindGold,
    FindPotion,
}

impl BehaviorState {
    /// States that steer through `Navigation`.
    pub fn navigates(self) -> bool {
        matches!(self, BehaviorState::Exploration | BehaviorState::FindGold | BehaviorState::FindPotion)
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Navigation (Exploration / FindGold / FindPotion) ──

#[derive(Clone, Debug, Default)]
pub struct Navigation {
    pub target: Option<Pos>,
    pub path: VecDeque<Action>,
    /// Pose the last emitted step should have produced.
    pub expected: Option<Pose>,
}

impl Navigation {
    pub fn clear(&mut self) {
        self.target = None;
        self.path.clear();
        self.expected = None;
    }

    /// Point at a new objective; a different one drops the cached path.
    pub fn retarget(&mut self, target: Pos) {
        if self.target != Some(target) {
            self.clear();
            self.target = Some(target);
        }
    }
}

// ── Attack ──

/// Distance brackets for burst building. Closer means more shots.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bracket {
    Far,   // 8+
    Mid,   // 6..8
    Near,  // 3..6
    Close, // 0..3
}

impl Bracket {
    pub fn of(distance: u32) -> Bracket {
        match distance {
            8.. => Bracket::Far,
            6..=7 => Bracket::Mid,
            3..=5 => Bracket::Near,
            _ => Bracket::Close,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AttackMemory {
    pub sequence: VecDeque<Action>,
    pub bracket: Option<Bracket>,
    pub shots: u32,
    /// Survives state changes: it is what keeps Attack from being reselected.
    pub cooldown_until: u64,
}

impl AttackMemory {
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.bracket = None;
        self.shots = 0;
    }
}

// ── LookForOpponent ──

#[derive(Clone, Debug, Default)]
pub struct LookMemory {
    pub active: bool,
    pub turns: u32,
    pub cooldown_until: u64,
}

impl LookMemory {
    pub fn reset(&mut self) {
        self.active = false;
        self.turns = 0;
    }
}

// ── Evade ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EvadeAxis {
    #[default]
    Neutral,
    ForwardBack,
    LeftRight,
}

#[derive(Clone, Debug, Default)]
pub struct EvadeMemory {
    pub axis: EvadeAxis,
    pub last_hit: Option<u64>,
}

impl EvadeMemory {
    pub fn reset(&mut self) {
        self.axis = EvadeAxis::Neutral;
        self.last_hit = None;
    }
}

/// Read-only per-cycle snapshot handed to the state machine.

use crate::domain::Pose;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentContext {
    pub pose: Pose,
    pub energy: i32,
    pub score: i32,
    pub tick: u64,
    pub last_hit_tick: Option<u64>,   // we took damage
    pub last_steps_tick: Option<u64>, // footsteps heard
    pub last_score_gain_tick: u64,
    pub enemy_distance: Option<u32>,  // steps, when visible this cycle
}

impl AgentContext {
    pub fn new(pose: Pose, tick: u64) -> Self {
        AgentContext {
            pose,
            energy: 100,
            score: 0,
            tick,
            last_hit_tick: None,
            last_steps_tick: None,
            last_score_gain_tick: tick,
            enemy_distance: None,
        }
    }

    /// Damage reported this cycle.
    pub fn was_hit(&self) -> bool {
        self.last_hit_tick == Some(self.tick)
    }

    pub fn hears_steps(&self) -> bool {
        self.last_steps_tick == Some(self.tick)
    }

    pub fn sees_enemy(&self) -> bool {
        self.enemy_distance.is_some()
    }

    pub fn ticks_since_score(&self) -> u64 {
        self.tick.saturating_sub(self.last_score_gain_tick)
    }
}

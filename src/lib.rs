//! Decision core for a grid-arena bot: a belief map built from partial
//! sensor tokens, an orientation-aware A* planner, and a priority-driven
//! behavior state machine that emits one action per cycle.

pub mod agent;
pub mod behavior;
pub mod config;
pub mod domain;
pub mod error;
pub mod frame;
pub mod knowledge;
pub mod planner;

pub use agent::{Agent, Status};
pub use config::AgentConfig;
pub use domain::{Action, Facing, ItemKind, Observation, Pos, Pose};
pub use error::{ConfigError, FrameError, ObservationError};
pub use frame::Frame;
pub use knowledge::KnowledgeMap;
pub use planner::PathPlanner;

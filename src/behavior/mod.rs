mod combat;
pub mod context;
pub mod machine;
mod navigate;
pub mod state;

pub use context::AgentContext;
pub use machine::BehaviorStateMachine;
pub use state::BehaviorState;

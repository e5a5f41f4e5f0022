pub mod evaluator;
pub mod state;

pub use evaluator::{evaluate, RandomSource, RoutingDecision, StrategyMode, ThreadRngSource};
pub use state::StrategyState;

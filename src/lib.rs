pub mod api;
pub mod config;
pub mod consumer;
pub mod error;
pub mod logging;
pub mod names;
pub mod sender;

pub mod kafka;
pub mod strategy;

pub use config::Config;
pub use error::{Error, Result};
pub use sender::EventProducer;
pub use strategy::{evaluate, RoutingDecision, StrategyMode, StrategyState};

//! Error types and result handling for kafka-skew-demo.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! # Example
//!
//! ```rust
//! use kafka_skew_demo::{Error, Result};
//!
//! fn route_message(partition_count: i32) -> Result<()> {
//!     if partition_count < 1 {
//!         return Err(Error::InvalidPartitionCount(partition_count));
//!     }
//!     Ok(())
//! }
//!
//! assert!(route_message(0).is_err());
//! ```

use thiserror::Error;

/// The main error type for kafka-skew-demo operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, from the config file or environment overrides.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Kafka client, producer, or admin error.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// JSON serialization error when encoding messages.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error, typically from binding the API listener.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A routing decision was requested for a topic with fewer than one
    /// partition. This is a programming error and is never masked by
    /// silently routing to partition 0.
    #[error("Invalid partition count: {0} (must be >= 1)")]
    InvalidPartitionCount(i32),

    /// The consumer hit a broker error it cannot recover from in-process
    /// (e.g. the subscribed topic was deleted). The process exits so an
    /// orchestrator restart can rejoin the rebuilt topic.
    #[error("Fatal consumer error: {0}")]
    FatalConsumer(String),
}

/// A convenient Result type alias for kafka-skew-demo operations.
pub type Result<T> = std::result::Result<T, Error>;

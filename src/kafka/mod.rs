pub mod sink;
pub mod topic_manager;

pub use sink::{EventSink, KafkaSink, PrintSink};
pub use topic_manager::{TopicHealth, TopicManager};

#![allow(dead_code)]

use async_trait::async_trait;
use kafka_skew_demo::kafka::{EventSink, TopicHealth};
use kafka_skew_demo::{Result, RoutingDecision};
use std::sync::Mutex;

/// In-memory sink recording every dispatched message.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, RoutingDecision, String)>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.sent.lock().expect("sink lock poisoned").len()
    }

    pub fn snapshot(&self) -> Vec<(String, RoutingDecision, String)> {
        self.sent.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn dispatch(&self, topic: &str, routing: &RoutingDecision, payload: &str) -> Result<()> {
        self.sent.lock().expect("sink lock poisoned").push((
            topic.to_string(),
            routing.clone(),
            payload.to_string(),
        ));
        Ok(())
    }
}

/// Fixed-answer readiness probe for router tests.
pub struct StaticHealth(pub bool);

#[async_trait]
impl TopicHealth for StaticHealth {
    async fn topics_ready(&self) -> bool {
        self.0
    }
}

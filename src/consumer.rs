use crate::config::Config;
use crate::{Error, Result};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::Message;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, warn};

/// Consumes the demo topic and logs each message with its partition, so key
/// and partition skew is visible in the service logs. A configurable
/// per-message sleep simulates downstream work, letting lag build up on hot
/// partitions.
pub struct EventConsumer {
    consumer: StreamConsumer,
    topic: String,
    simulated_work: Duration,
    summary_every: u64,
}

impl EventConsumer {
    pub fn new(config: &Config) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", config.kafka.brokers.join(","))
            .set("group.id", &config.consumer.group)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "1000")
            .set("metadata.max.age.ms", "2000")
            .create()
            .map_err(|e| Error::Kafka(e))?;

        Ok(Self {
            consumer,
            topic: config.consumer.topic.clone(),
            simulated_work: Duration::from_millis(config.consumer.simulated_work_ms),
            summary_every: config.consumer.summary_every.max(1),
        })
    }

    pub async fn run(&self) -> Result<()> {
        self.consumer.subscribe(&[self.topic.as_str()])?;
        info!("Listening on topic '{}'", self.topic);

        let mut partition_counts: BTreeMap<i32, u64> = BTreeMap::new();
        let mut received = 0u64;

        loop {
            match self.consumer.recv().await {
                Ok(message) => {
                    let partition = message.partition();
                    let key = message
                        .key()
                        .map(|k| String::from_utf8_lossy(k).into_owned())
                        .unwrap_or_default();
                    let payload = message
                        .payload()
                        .map(|p| String::from_utf8_lossy(p).into_owned())
                        .unwrap_or_default();

                    info!(
                        partition = partition,
                        key = %key,
                        "Received event: {}",
                        payload
                    );

                    *partition_counts.entry(partition).or_default() += 1;
                    received += 1;
                    if received % self.summary_every == 0 {
                        info!(
                            "Received {} messages, per-partition counts: {:?}",
                            received, partition_counts
                        );
                    }

                    tokio::time::sleep(self.simulated_work).await;
                }
                Err(e) if is_fatal(&e) => {
                    error!("Fatal Kafka error detected, exiting: {}", e);
                    return Err(Error::FatalConsumer(e.to_string()));
                }
                Err(e) => {
                    warn!("Consume error: {}", e);
                }
            }
        }
    }
}

// The demo rebuilds topics between stages; once the subscribed topic is
// gone the cleanest recovery is a process restart that rejoins the new one.
fn is_fatal(error: &KafkaError) -> bool {
    matches!(
        error,
        KafkaError::MessageConsumption(RDKafkaErrorCode::UnknownTopicOrPartition)
            | KafkaError::MessageConsumption(RDKafkaErrorCode::OffsetOutOfRange)
    )
}

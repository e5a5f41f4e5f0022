use crate::{Error, Result};
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::ClientConfig;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Readiness probe over the demo topics. The API's readiness route only
/// needs the yes/no answer, so test routers can substitute a stub.
#[async_trait]
pub trait TopicHealth: Send + Sync {
    async fn topics_ready(&self) -> bool;
}

/// Provisions the demo topics and answers readiness probes for them.
pub struct TopicManager {
    admin_client: AdminClient<DefaultClientContext>,
    replication_factor: i32,
    retention_ms: u64,
    managed_topics: HashSet<String>,
}

impl TopicManager {
    pub fn new(brokers: &[String], replication_factor: i32, retention_ms: u64) -> Result<Self> {
        let admin_client: AdminClient<_> = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .create()
            .map_err(|e| Error::Kafka(e))?;

        Ok(Self {
            admin_client,
            replication_factor,
            retention_ms,
            managed_topics: HashSet::new(),
        })
    }

    /// Creates the topic with the given partition count if it does not
    /// exist yet. Provisioned topics are tracked for readiness checks.
    #[instrument(skip(self), fields(topic = %topic_name))]
    pub async fn ensure_topic(&mut self, topic_name: &str, partitions: i32) -> Result<()> {
        if self.managed_topics.contains(topic_name) {
            debug!("Topic '{}' already verified to exist", topic_name);
            return Ok(());
        }

        match self.topic_exists(topic_name) {
            Ok(true) => {
                info!("Topic '{}' already exists", topic_name);
                self.managed_topics.insert(topic_name.to_string());
                Ok(())
            }
            Ok(false) => {
                info!("Creating topic '{}' with {} partitions", topic_name, partitions);
                self.create_topic(topic_name, partitions).await?;
                self.managed_topics.insert(topic_name.to_string());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to check if topic '{}' exists: {}", topic_name, e);
                Err(e)
            }
        }
    }

    fn topic_exists(&self, topic_name: &str) -> Result<bool> {
        let metadata = self
            .admin_client
            .inner()
            .fetch_metadata(Some(topic_name), Duration::from_secs(5))
            .map_err(|e| Error::Kafka(e))?;

        Ok(metadata
            .topics()
            .iter()
            .any(|topic| topic.name() == topic_name && !topic.partitions().is_empty()))
    }

    async fn create_topic(&self, topic_name: &str, partitions: i32) -> Result<()> {
        let retention = self.retention_ms.to_string();
        let new_topic = NewTopic::new(
            topic_name,
            partitions,
            TopicReplication::Fixed(self.replication_factor),
        )
        .set("cleanup.policy", "delete")
        .set("retention.ms", &retention);

        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(30)));

        let results = self
            .admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| Error::Kafka(e))?;

        for result in results {
            match result {
                Ok(topic) => {
                    info!("Successfully created topic: {}", topic);
                }
                Err((_topic, error)) => {
                    return Err(Error::Kafka(rdkafka::error::KafkaError::AdminOp(error)));
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TopicHealth for TopicManager {
    /// Up only when every provisioned topic is metadata-visible on the
    /// broker. Mirrors what the dashboard polls between demo stages.
    async fn topics_ready(&self) -> bool {
        let metadata = match self
            .admin_client
            .inner()
            .fetch_metadata(None, Duration::from_secs(5))
        {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Readiness metadata fetch failed: {}", e);
                return false;
            }
        };

        let visible: HashSet<&str> = metadata.topics().iter().map(|t| t.name()).collect();
        self.managed_topics
            .iter()
            .all(|topic| visible.contains(topic.as_str()))
    }
}

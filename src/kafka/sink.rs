use crate::{config::KafkaConfig, strategy::RoutingDecision, Error, Result};
use async_trait::async_trait;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use tracing::info;

/// Publish boundary for routed messages.
///
/// The sender loop and the REST handlers only decide routing; sink
/// implementations perform the I/O. A partition decision is set on the
/// record directly, a key decision lets the broker hash it.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn dispatch(&self, topic: &str, routing: &RoutingDecision, payload: &str) -> Result<()>;
}

/// Production sink writing through an rdkafka [`FutureProducer`].
pub struct KafkaSink {
    producer: FutureProducer,
}

impl KafkaSink {
    pub fn new(brokers: &[String], config: &KafkaConfig) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers.join(","))
            .set("acks", &config.acks)
            .set("linger.ms", config.linger_ms.to_string())
            .set("batch.size", config.batch_size.to_string())
            .set("compression.type", &config.compression)
            .create()
            .map_err(|e| Error::Kafka(e))?;

        Ok(Self { producer })
    }
}

#[async_trait]
impl EventSink for KafkaSink {
    async fn dispatch(&self, topic: &str, routing: &RoutingDecision, payload: &str) -> Result<()> {
        let mut record = FutureRecord::to(topic).payload(payload);
        match routing {
            RoutingDecision::Partition(partition) => record = record.partition(*partition),
            RoutingDecision::Key(key) => record = record.key(key.as_str()),
        }

        self.producer
            .send(record, rdkafka::util::Timeout::Never)
            .await
            .map_err(|(e, _)| Error::Kafka(e))?;

        Ok(())
    }
}

/// Logs instead of publishing. Lets the producer service run without a
/// broker when working on the control surface.
pub struct PrintSink;

#[async_trait]
impl EventSink for PrintSink {
    async fn dispatch(&self, topic: &str, routing: &RoutingDecision, payload: &str) -> Result<()> {
        info!(topic = %topic, routing = ?routing, payload = %payload, "Would publish");
        Ok(())
    }
}

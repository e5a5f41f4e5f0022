use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub producer: ProducerConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    #[serde(default = "default_acks")]
    pub acks: String,
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_compression")]
    pub compression: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProducerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_demo_topic")]
    pub demo_topic: String,
    #[serde(default = "default_single_topic")]
    pub single_partition_topic: String,
    /// Partition count for the main demo topic. The single-partition topic
    /// is always created with exactly one partition.
    #[serde(default = "default_partitions")]
    pub partitions: i32,
    #[serde(default = "default_replication_factor")]
    pub replication_factor: i32,
    #[serde(default = "default_retention_ms")]
    pub topic_retention_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsumerConfig {
    #[serde(default = "default_demo_topic")]
    pub topic: String,
    #[serde(default = "default_consumer_group")]
    pub group: String,
    /// Per-message sleep simulating downstream work, so lag builds up
    /// visibly on skewed partitions.
    #[serde(default = "default_simulated_work_ms")]
    pub simulated_work_ms: u64,
    /// How many messages between per-partition distribution summaries.
    #[serde(default = "default_summary_every")]
    pub summary_every: u64,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SKEW_DEMO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            demo_topic: default_demo_topic(),
            single_partition_topic: default_single_topic(),
            partitions: default_partitions(),
            replication_factor: default_replication_factor(),
            topic_retention_ms: default_retention_ms(),
        }
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            topic: default_demo_topic(),
            group: default_consumer_group(),
            simulated_work_ms: default_simulated_work_ms(),
            summary_every: default_summary_every(),
        }
    }
}

fn default_acks() -> String {
    "1".to_string()
}

fn default_linger_ms() -> u32 {
    5
}

fn default_batch_size() -> usize {
    32_768
}

fn default_compression() -> String {
    "zstd".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_demo_topic() -> String {
    "demo-topic".to_string()
}

fn default_single_topic() -> String {
    "demo-topic-single".to_string()
}

fn default_partitions() -> i32 {
    3
}

fn default_replication_factor() -> i32 {
    1
}

fn default_retention_ms() -> u64 {
    // Short retention keeps repeated demo runs from replaying old skew.
    10_000
}

fn default_consumer_group() -> String {
    "demo-consumer".to_string()
}

fn default_simulated_work_ms() -> u64 {
    5
}

fn default_summary_every() -> u64 {
    100
}

use clap::Parser;
use kafka_skew_demo::kafka::{EventSink, KafkaSink, PrintSink, TopicHealth, TopicManager};
use kafka_skew_demo::logging::init_logging;
use kafka_skew_demo::{api, Config, EventProducer, Result, StrategyState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "producer")]
#[command(about = "Kafka partition-skew demo producer service", long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[arg(short, long, help = "Enable JSON output for logs")]
    json_logs: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,

    #[arg(long, help = "Log messages instead of publishing (no broker needed)")]
    print_sink: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, args.verbose);

    info!("Starting skew demo producer");
    info!("Loading configuration from {:?}", args.config);

    let config = match Config::from_file(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        kafka_brokers = ?config.kafka.brokers,
        demo_topic = %config.producer.demo_topic,
        partitions = config.producer.partitions,
        listen_addr = %config.producer.listen_addr,
        "Configuration summary"
    );

    let (sink, health): (Arc<dyn EventSink>, Arc<dyn TopicHealth>) = if args.print_sink {
        (Arc::new(PrintSink), Arc::new(AlwaysReady))
    } else {
        let mut topics = TopicManager::new(
            &config.kafka.brokers,
            config.producer.replication_factor,
            config.producer.topic_retention_ms,
        )?;
        topics
            .ensure_topic(&config.producer.demo_topic, config.producer.partitions)
            .await?;
        topics
            .ensure_topic(&config.producer.single_partition_topic, 1)
            .await?;

        (
            Arc::new(KafkaSink::new(&config.kafka.brokers, &config.kafka)?),
            Arc::new(topics),
        )
    };

    let state = Arc::new(StrategyState::default());
    let producer = Arc::new(EventProducer::new(sink, state, config.producer.partitions));

    let app = api::router(
        Arc::clone(&producer),
        health,
        config.producer.demo_topic.clone(),
    );
    let listener = TcpListener::bind(&config.producer.listen_addr).await?;
    info!("Control API listening on {}", config.producer.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    producer.stop().await;
    info!("Producer service stopped");

    Ok(())
}

/// Readiness stub for print-sink runs with no broker to probe.
struct AlwaysReady;

#[async_trait::async_trait]
impl TopicHealth for AlwaysReady {
    async fn topics_ready(&self) -> bool {
        true
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

use clap::Parser;
use kafka_skew_demo::consumer::EventConsumer;
use kafka_skew_demo::logging::init_logging;
use kafka_skew_demo::{Config, Result};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "consumer")]
#[command(about = "Kafka partition-skew demo consumer service", long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[arg(short, long, help = "Enable JSON output for logs")]
    json_logs: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, args.verbose);

    info!("Starting skew demo consumer");
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
        topic = %config.consumer.topic,
        group = %config.consumer.group,
        simulated_work_ms = config.consumer.simulated_work_ms,
        "Configuration summary"
    );

    let consumer = EventConsumer::new(&config)?;

    tokio::select! {
        result = consumer.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Consumer service stopped");
            Ok(())
        }
    }
}

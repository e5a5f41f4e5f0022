use crate::kafka::EventSink;
use crate::names;
use crate::strategy::{evaluate, RoutingDecision, StrategyMode, StrategyState, ThreadRngSource};
use crate::Result;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Drives scheduled message production against a sink.
///
/// At most one send loop is active at a time: `start` cancels any previous
/// loop before spawning its senders, and `stop` is an idempotent no-op when
/// nothing is running. The routing state cell is owned here and shared with
/// the control API, so a strategy change applies to the running loop from
/// its next tick.
pub struct EventProducer {
    sink: Arc<dyn EventSink>,
    state: Arc<StrategyState>,
    partition_count: i32,
    active: Mutex<Vec<JoinHandle<()>>>,
}

impl EventProducer {
    pub fn new(sink: Arc<dyn EventSink>, state: Arc<StrategyState>, partition_count: i32) -> Self {
        Self {
            sink,
            state,
            partition_count,
            active: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    /// Starts `producer_count` concurrent senders publishing to `topic`
    /// every `interval_ms` with the given strategy, until [`stop`] is
    /// called or `start` is called again.
    ///
    /// [`stop`]: EventProducer::stop
    pub async fn start(
        &self,
        producer_count: usize,
        topic: &str,
        interval_ms: u64,
        mode: StrategyMode,
    ) {
        // The lock is held across cancel and spawn so two racing starts
        // cannot leave both loops running.
        let mut active = self.active.lock().await;
        cancel_all(&mut active);

        self.state.set_mode(mode);

        for _ in 0..producer_count {
            let sink = Arc::clone(&self.sink);
            let state = Arc::clone(&self.state);
            let topic = topic.to_string();
            let partition_count = self.partition_count;

            active.push(tokio::spawn(async move {
                let mut rng = ThreadRngSource;
                let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));

                loop {
                    ticker.tick().await;

                    let message_number = state.next_sequence_number();
                    let mode = state.mode();
                    let routing = match evaluate(mode, message_number, partition_count, &mut rng) {
                        Ok(routing) => routing,
                        Err(e) => {
                            error!("Routing evaluation failed, sender exiting: {}", e);
                            break;
                        }
                    };

                    let payload = format!("Event message from {}", names::generate_name());
                    if let Err(e) = sink.dispatch(&topic, &routing, &payload).await {
                        warn!("Failed to publish message {}: {}", message_number, e);
                    }

                    if message_number % 500 == 0 {
                        info!(
                            "Sent {} messages using key strategy {:?}",
                            message_number, mode
                        );
                    }
                }
            }));
        }

        info!(
            producers = producer_count,
            topic = %topic,
            interval_ms = interval_ms,
            mode = ?mode,
            "Message production started"
        );
    }

    /// Stops the active send loop, if any. Safe to call repeatedly.
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        cancel_all(&mut active);
    }

    /// Number of sender tasks currently running.
    pub async fn active_senders(&self) -> usize {
        self.active
            .lock()
            .await
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// One-shot publish with an explicit key.
    pub async fn send_one(&self, topic: &str, key: String, payload: String) -> Result<()> {
        self.sink
            .dispatch(topic, &RoutingDecision::Key(key), &payload)
            .await
    }

    /// Burst of `batch_size` randomly keyed messages, dispatched
    /// concurrently.
    pub async fn send_batch(&self, topic: &str, batch_size: u32) -> Result<()> {
        let mut rng = ThreadRngSource;

        let messages: Vec<(RoutingDecision, String)> = (0..batch_size)
            .map(|_| {
                let message_number = self.state.next_sequence_number();
                let routing = evaluate(
                    StrategyMode::EvenKeyUuid,
                    message_number,
                    self.partition_count,
                    &mut rng,
                )?;
                let payload = format!("{} : {}", message_number, names::generate_name());
                Ok((routing, payload))
            })
            .collect::<Result<_>>()?;

        try_join_all(
            messages
                .iter()
                .map(|(routing, payload)| self.sink.dispatch(topic, routing, payload)),
        )
        .await?;

        Ok(())
    }
}

fn cancel_all(active: &mut Vec<JoinHandle<()>>) {
    if active.is_empty() {
        return;
    }
    for handle in active.drain(..) {
        handle.abort();
    }
    info!("Message production stopped");
}

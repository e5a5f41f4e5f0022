use crate::kafka::TopicHealth;
use crate::sender::EventProducer;
use crate::strategy::StrategyMode;
use crate::Error;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state: the producer service plus the readiness probe.
#[derive(Clone)]
pub struct ApiState {
    pub producer: Arc<EventProducer>,
    pub health: Arc<dyn TopicHealth>,
    pub demo_topic: String,
}

/// Body of `POST /api/produce-messages`.
#[derive(Debug, Deserialize)]
pub struct ProduceMessages {
    pub producer_count: usize,
    pub ms_between_messages: u64,
    pub partition_strategy: StrategyMode,
}

/// Body of `POST /produce/{topic}`.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub key: String,
    pub payload: String,
}

pub fn router(
    producer: Arc<EventProducer>,
    health: Arc<dyn TopicHealth>,
    demo_topic: String,
) -> Router {
    let state = ApiState {
        producer,
        health,
        demo_topic,
    };

    Router::new()
        .route("/", get(index))
        .route("/_liveness", get(index))
        .route("/_readiness", get(readiness))
        .route("/api/produce-messages", post(produce_messages))
        .route("/api/stop-producing", post(stop_producing))
        .route("/change-key-strategy/:strategy", post(change_key_strategy))
        .route("/produce/:topic", post(produce_one))
        .route("/produce/batch-events-raw/:batch_size", post(produce_batch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    "producer"
}

async fn readiness(State(state): State<ApiState>) -> Response {
    if state.health.topics_ready().await {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "topics not ready").into_response()
    }
}

async fn produce_messages(
    State(state): State<ApiState>,
    Json(request): Json<ProduceMessages>,
) -> &'static str {
    state
        .producer
        .start(
            request.producer_count,
            &state.demo_topic,
            request.ms_between_messages,
            request.partition_strategy,
        )
        .await;

    "Message production started."
}

async fn stop_producing(State(state): State<ApiState>) -> &'static str {
    state.producer.stop().await;
    "Message production stopped."
}

async fn change_key_strategy(
    State(state): State<ApiState>,
    Path(strategy): Path<String>,
) -> &'static str {
    state.producer.state().change_strategy_via_label(&strategy);
    "Configuration changed"
}

async fn produce_one(
    State(state): State<ApiState>,
    Path(topic): Path<String>,
    Json(request): Json<EventRequest>,
) -> Result<&'static str, Error> {
    state
        .producer
        .send_one(&topic, request.key, request.payload)
        .await?;

    Ok("Message sent")
}

async fn produce_batch(
    State(state): State<ApiState>,
    Path(batch_size): Path<u32>,
) -> Result<&'static str, Error> {
    state
        .producer
        .send_batch(&state.demo_topic, batch_size)
        .await?;

    Ok("Messages sent")
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

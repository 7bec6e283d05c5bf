use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_nats::jetstream;
use async_trait::async_trait;
use bytes::Bytes;

/// JetStream stream holding every write topic the gateway publishes to.
pub const STREAM_NAME: &str = "ARCADE_WRITES";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("queue transport error: {0}")]
    Transport(String),
}

/// Fire-and-forget side of the gateway. `enqueue` must return only after
/// the queue transport has accepted the payload, and must fail rather
/// than fake an acknowledgment.
#[async_trait]
pub trait WriteSink: Send + Sync {
    async fn enqueue(&self, topic: &str, payload: serde_json::Value) -> Result<(), SinkError>;
}

pub struct NatsSink {
    jetstream: jetstream::Context,
}

impl NatsSink {
    /// Connects and makes sure the stream covering the write topics
    /// exists. Publishing to a subject no stream covers would be
    /// acknowledged into the void.
    pub async fn connect(url: &str, topics: &[&str]) -> Result<Self, SinkError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        let jetstream = jetstream::new(client);

        jetstream
            .get_or_create_stream(jetstream::stream::Config {
                name: STREAM_NAME.to_string(),
                subjects: topics.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            })
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        Ok(Self { jetstream })
    }
}

#[async_trait]
impl WriteSink for NatsSink {
    async fn enqueue(&self, topic: &str, payload: serde_json::Value) -> Result<(), SinkError> {
        let bytes = serde_json::to_vec(&payload).map_err(|e| SinkError::Transport(e.to_string()))?;

        // First await hands the message over, second waits for the
        // JetStream server ack
        self.jetstream
            .publish(topic.to_string(), Bytes::from(bytes))
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        tracing::debug!("enqueued write on {}", topic);
        Ok(())
    }
}

/// Sink for tests and queue-less development. Records what would have
/// been published and can be told to fail the next calls.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<(String, serde_json::Value)>>,
    failing: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<(String, serde_json::Value)> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl WriteSink for MemorySink {
    async fn enqueue(&self, topic: &str, payload: serde_json::Value) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Transport("simulated queue outage".to_string()));
        }
        self.records
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}

//! Generated record types.

use serde::{Deserialize, Serialize};

/// One synthetic record produced by a generation engine.
///
/// The adapter never interprets the value; serialization and delivery
/// belong to the host transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Destination topic.
    pub topic: String,
    /// Optional record key.
    pub key: Option<String>,
    /// Record value.
    pub value: String,
    /// Optional event timestamp, milliseconds since the Unix epoch.
    pub timestamp: Option<i64>,
}

impl SourceRecord {
    /// Create a record with a topic and value.
    pub fn new(topic: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            value: value.into(),
            timestamp: None,
        }
    }

    /// Attach a key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach an event timestamp (epoch milliseconds).
    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = Some(timestamp_ms);
        self
    }
}

/// Ordered batch of records returned from one poll call.
///
/// May be empty, meaning no data was ready. Order within a batch is
/// the order the engine produced the records and is preserved through
/// to the host.
pub type RecordBatch = Vec<SourceRecord>;

//! Transport layer for the check commands
//!
//! The commands talk to the cluster through two small traits so the publish
//! and consume logic can run against mocks as well as against the real
//! Kafka client in [`kafka`].

use crate::error::CheckResult;
use async_trait::async_trait;
use rdkafka::Offset;
use std::fmt;

pub mod kafka;

/// Key of the check message
pub const TEST_MESSAGE_KEY: &str = "test";

/// Body of the check message
pub const TEST_MESSAGE_VALUE: &str = "This is a check message";

/// The fixed message published by the producer command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMessage {
    pub key: &'static str,
    pub value: &'static str,
}

impl Default for TestMessage {
    fn default() -> Self {
        Self {
            key: TEST_MESSAGE_KEY,
            value: TEST_MESSAGE_VALUE,
        }
    }
}

/// Where the brokers stored a published message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// A message read from the subscribed partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRecord {
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
}

impl ConsumedRecord {
    /// Key rendered as text, empty when absent
    pub fn key_lossy(&self) -> String {
        lossy(self.key.as_deref())
    }

    /// Value rendered as text, empty when absent
    pub fn value_lossy(&self) -> String {
        lossy(self.value.as_deref())
    }
}

impl fmt::Display for ConsumedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offset {}, Key: {}, Value: {}",
            self.offset,
            self.key_lossy(),
            self.value_lossy()
        )
    }
}

fn lossy(bytes: Option<&[u8]>) -> String {
    bytes
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}

/// Synchronous single-message publish path
#[async_trait]
pub trait RecordPublisher: Send + Sync {
    /// Send one message and wait for its delivery report
    async fn publish(&self, topic: &str, message: &TestMessage) -> CheckResult<Delivery>;

    /// Flush outstanding work and release the connection
    fn close(&mut self) -> CheckResult<()>;
}

/// Partition-scoped subscription
#[async_trait]
pub trait PartitionSubscription: Send {
    /// Wait for the next record; `None` once the subscription is exhausted
    async fn next_record(&mut self) -> Option<CheckResult<ConsumedRecord>>;

    /// Assign one partition of `topic`, starting at `offset`
    fn subscribe(&mut self, topic: &str, partition: i32, offset: Offset) -> CheckResult<()>;

    /// Release the partition assignment
    fn unsubscribe(&mut self) -> CheckResult<()>;

    /// Release the underlying connection
    fn close(&mut self) -> CheckResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_is_fixed() {
        let message = TestMessage::default();
        assert_eq!(message.key, "test");
        assert_eq!(message.value, "This is a check message");
    }

    #[test]
    fn test_record_display() {
        let record = ConsumedRecord {
            partition: 0,
            offset: 42,
            key: Some(b"test".to_vec()),
            value: Some(b"hello".to_vec()),
        };
        assert_eq!(record.to_string(), "offset 42, Key: test, Value: hello");
    }

    #[test]
    fn test_record_display_without_key() {
        let record = ConsumedRecord {
            partition: 0,
            offset: 7,
            key: None,
            value: Some(vec![0xff, b'a']),
        };
        assert_eq!(record.key_lossy(), "");
        assert_eq!(record.value_lossy(), "\u{fffd}a");
    }
}

//! Mock implementations for testing
//!
//! Provides mock publisher and subscription implementations so the command
//! logic can be exercised without a Kafka cluster.

use crate::error::{CheckError, CheckResult};
use crate::transport::{
    ConsumedRecord, Delivery, PartitionSubscription, RecordPublisher, TestMessage,
};
use async_trait::async_trait;
use rdkafka::Offset;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

pub type PublishedMessage = (String, TestMessage);

/// Mock publisher for testing
#[derive(Debug)]
pub struct MockPublisher {
    pub published: Arc<Mutex<Vec<PublishedMessage>>>,
    pub delivery: Delivery,
    pub should_fail: bool,
    pub close_should_fail: bool,
    pub closed: Arc<AtomicBool>,
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self {
            published: Arc::default(),
            delivery: Delivery {
                partition: 0,
                offset: 0,
            },
            should_fail: false,
            close_should_fail: false,
            closed: Arc::default(),
        }
    }
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delivery(partition: i32, offset: i64) -> Self {
        Self {
            delivery: Delivery { partition, offset },
            ..Default::default()
        }
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn with_close_failure(mut self) -> Self {
        self.close_should_fail = true;
        self
    }

    pub async fn get_published(&self) -> Vec<PublishedMessage> {
        self.published.lock().await.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordPublisher for MockPublisher {
    async fn publish(&self, topic: &str, message: &TestMessage) -> CheckResult<Delivery> {
        if self.should_fail {
            return Err(CheckError::publish(topic, "Mock publish failure"));
        }

        self.published
            .lock()
            .await
            .push((topic.to_string(), message.clone()));
        Ok(self.delivery)
    }

    fn close(&mut self) -> CheckResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        if self.close_should_fail {
            return Err(CheckError::cleanup("producer", "Mock close failure"));
        }
        Ok(())
    }
}

/// Mock partition subscription for testing
///
/// Replays the queued records in order. Once drained it either ends the
/// stream (`finite`) or, by default, waits forever like an idle partition,
/// first flipping the attached shutdown sender if there is one. Every
/// subscribe, unsubscribe and close attempt is recorded in call order.
#[derive(Debug)]
pub struct MockSubscription {
    records: VecDeque<CheckResult<ConsumedRecord>>,
    shutdown_when_drained: Option<watch::Sender<bool>>,
    finite: bool,
    subscribe_should_fail: bool,
    unsubscribe_should_fail: bool,
    subscribed: Option<(String, i32, Offset)>,
    unsubscribed: bool,
    closed: bool,
    calls: Vec<&'static str>,
}

impl MockSubscription {
    pub fn new(records: Vec<CheckResult<ConsumedRecord>>) -> Self {
        Self {
            records: records.into(),
            shutdown_when_drained: None,
            finite: false,
            subscribe_should_fail: false,
            unsubscribe_should_fail: false,
            subscribed: None,
            unsubscribed: false,
            closed: false,
            calls: Vec::new(),
        }
    }

    /// Request shutdown through `sender` once every record has been handed out
    pub fn shutdown_when_drained(mut self, sender: watch::Sender<bool>) -> Self {
        self.shutdown_when_drained = Some(sender);
        self
    }

    /// End the stream once every record has been handed out
    pub fn finite(mut self) -> Self {
        self.finite = true;
        self
    }

    pub fn with_subscribe_failure(mut self) -> Self {
        self.subscribe_should_fail = true;
        self
    }

    pub fn with_unsubscribe_failure(mut self) -> Self {
        self.unsubscribe_should_fail = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }

    /// Topic, partition and start offset of the last successful subscribe
    pub fn subscribed(&self) -> Option<&(String, i32, Offset)> {
        self.subscribed.as_ref()
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscribed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Lifecycle calls in the order they were made
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }
}

#[async_trait]
impl PartitionSubscription for MockSubscription {
    async fn next_record(&mut self) -> Option<CheckResult<ConsumedRecord>> {
        if let Some(record) = self.records.pop_front() {
            return Some(record);
        }
        if self.finite {
            return None;
        }
        if let Some(sender) = self.shutdown_when_drained.take() {
            let _ = sender.send(true);
        }
        std::future::pending().await
    }

    fn subscribe(&mut self, topic: &str, partition: i32, offset: Offset) -> CheckResult<()> {
        self.calls.push("subscribe");
        if self.subscribe_should_fail {
            return Err(CheckError::subscribe(
                topic,
                partition,
                "Mock subscribe failure",
            ));
        }
        self.subscribed = Some((topic.to_string(), partition, offset));
        Ok(())
    }

    fn unsubscribe(&mut self) -> CheckResult<()> {
        self.calls.push("unsubscribe");
        if self.unsubscribe_should_fail {
            return Err(CheckError::cleanup(
                "partition subscription",
                "Mock unsubscribe failure",
            ));
        }
        self.unsubscribed = true;
        Ok(())
    }

    fn close(&mut self) -> CheckResult<()> {
        self.calls.push("close");
        self.closed = true;
        Ok(())
    }
}

/// Record at `offset` on partition 0 carrying the check message
pub fn sample_record(offset: i64) -> ConsumedRecord {
    ConsumedRecord {
        partition: 0,
        offset,
        key: Some(crate::transport::TEST_MESSAGE_KEY.as_bytes().to_vec()),
        value: Some(crate::transport::TEST_MESSAGE_VALUE.as_bytes().to_vec()),
    }
}

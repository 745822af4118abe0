//! Impure I/O operations for the Kafka transport
//!
//! Wraps the rdkafka producer and consumer behind [`RecordPublisher`] and
//! [`PartitionSubscription`]. Client creation is followed by a metadata
//! round-trip so unreachable brokers surface as a connection error instead
//! of a silent hang on the first send or receive.

use super::connection::{build_client_config, ClientRole};
use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult};
use crate::transport::{
    ConsumedRecord, Delivery, PartitionSubscription, RecordPublisher, TestMessage,
};
use async_trait::async_trait;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::metadata::Metadata;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::{Message, Offset, TopicPartitionList};
use std::time::Duration;
use tracing::{debug, info, Span};

/// Publish path backed by an rdkafka `FutureProducer`
pub struct KafkaPublisher {
    producer: FutureProducer,
    delivery_timeout: Duration,
    close_timeout: Duration,
}

impl KafkaPublisher {
    /// Build, validate and connect a producer
    pub fn connect(config: &CheckConfig) -> CheckResult<Self> {
        let client_config = build_client_config(config, ClientRole::Producer)?;
        let producer: FutureProducer = client_config.create().map_err(CheckError::client_config)?;

        let metadata = producer
            .client()
            .fetch_metadata(Some(config.topic.as_str()), config.network_timeout)
            .map_err(|e| CheckError::connection(config.bootstrap_servers(), e))?;
        log_cluster(&metadata);

        Ok(Self {
            producer,
            delivery_timeout: config.delivery_timeout,
            close_timeout: config.network_timeout,
        })
    }
}

#[async_trait]
impl RecordPublisher for KafkaPublisher {
    async fn publish(&self, topic: &str, message: &TestMessage) -> CheckResult<Delivery> {
        let record = FutureRecord::to(topic)
            .key(message.key)
            .payload(message.value);

        let (partition, offset) = self
            .producer
            .send(record, self.delivery_timeout)
            .await
            .map_err(|(e, _)| CheckError::publish(topic, e))?;

        Ok(Delivery { partition, offset })
    }

    fn close(&mut self) -> CheckResult<()> {
        self.producer
            .flush(self.close_timeout)
            .map_err(|e| CheckError::cleanup("producer", e))?;
        debug!("Producer flushed");
        Ok(())
    }
}

/// Single-partition subscription backed by an rdkafka `StreamConsumer`
pub struct KafkaPartitionConsumer {
    consumer: Option<StreamConsumer>,
    network_timeout: Duration,
    assigned: bool,
}

impl KafkaPartitionConsumer {
    /// Build, validate and connect a consumer without assigning partitions
    pub fn connect(config: &CheckConfig) -> CheckResult<Self> {
        let client_config = build_client_config(config, ClientRole::Consumer)?;
        let consumer: StreamConsumer = client_config.create().map_err(CheckError::client_config)?;

        let metadata = consumer
            .fetch_metadata(None, config.network_timeout)
            .map_err(|e| CheckError::connection(config.bootstrap_servers(), e))?;
        log_cluster(&metadata);

        Ok(Self {
            consumer: Some(consumer),
            network_timeout: config.network_timeout,
            assigned: false,
        })
    }
}

#[async_trait]
impl PartitionSubscription for KafkaPartitionConsumer {
    async fn next_record(&mut self) -> Option<CheckResult<ConsumedRecord>> {
        let consumer = self.consumer.as_ref()?;

        let received = match consumer.recv().await {
            Ok(message) => Ok(ConsumedRecord {
                partition: message.partition(),
                offset: message.offset(),
                key: message.key().map(<[u8]>::to_vec),
                value: message.payload().map(<[u8]>::to_vec),
            }),
            Err(e) => Err(CheckError::receive(e)),
        };
        Some(received)
    }

    fn subscribe(&mut self, topic: &str, partition: i32, offset: Offset) -> CheckResult<()> {
        let consumer = self
            .consumer
            .as_ref()
            .ok_or_else(|| CheckError::subscribe(topic, partition, "consumer already closed"))?;

        // Blocking; bounded by the network timeout
        let metadata = consumer
            .fetch_metadata(Some(topic), self.network_timeout)
            .map_err(|e| CheckError::subscribe(topic, partition, e))?;
        ensure_partition_exists(&metadata, topic, partition)?;

        let mut assignment = TopicPartitionList::new();
        assignment
            .add_partition_offset(topic, partition, offset)
            .map_err(|e| CheckError::subscribe(topic, partition, e))?;
        consumer
            .assign(&assignment)
            .map_err(|e| CheckError::subscribe(topic, partition, e))?;

        self.assigned = true;
        info!("Subscribed to {} partition {} at {:?}", topic, partition, offset);
        Ok(())
    }

    fn unsubscribe(&mut self) -> CheckResult<()> {
        if !self.assigned {
            return Ok(());
        }
        if let Some(consumer) = &self.consumer {
            consumer
                .unassign()
                .map_err(|e| CheckError::cleanup("partition subscription", e))?;
        }
        self.assigned = false;
        debug!("Partition assignment released");
        Ok(())
    }

    fn close(&mut self) -> CheckResult<()> {
        // Dropping the consumer tears down the librdkafka handle and its broker connections
        if self.consumer.take().is_some() {
            debug!("Consumer closed");
        }
        Ok(())
    }
}

/// Run a blocking `connect` on the blocking thread pool
///
/// Client creation and the metadata round-trip block for up to the network
/// timeout. Running them here keeps the single-threaded runtime free to poll
/// the interrupt handler meanwhile. The caller's span is carried over.
pub async fn spawn_connect<T, F>(config: &CheckConfig, connect: F) -> CheckResult<T>
where
    T: Send + 'static,
    F: FnOnce(&CheckConfig) -> CheckResult<T> + Send + 'static,
{
    let owned = config.clone();
    let span = Span::current();

    tokio::task::spawn_blocking(move || span.in_scope(|| connect(&owned)))
        .await
        .map_err(|e| CheckError::connection(config.bootstrap_servers(), e))?
}

fn log_cluster(metadata: &Metadata) {
    info!(
        "Connected to cluster: {} broker(s), originating broker {}",
        metadata.brokers().len(),
        metadata.orig_broker_name()
    );
}

/// Check the partition is known to the cluster before assigning it
fn ensure_partition_exists(metadata: &Metadata, topic: &str, partition: i32) -> CheckResult<()> {
    let topic_metadata = metadata
        .topics()
        .iter()
        .find(|t| t.name() == topic)
        .ok_or_else(|| CheckError::subscribe(topic, partition, "topic not found in metadata"))?;

    if let Some(error) = topic_metadata.error() {
        return Err(CheckError::subscribe(
            topic,
            partition,
            format!("broker reported {error:?}"),
        ));
    }

    if !topic_metadata.partitions().iter().any(|p| p.id() == partition) {
        return Err(CheckError::subscribe(
            topic,
            partition,
            "partition does not exist",
        ));
    }

    Ok(())
}

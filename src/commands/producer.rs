//! `producer` command: publish one check message

use crate::cli::ClientArgs;
use crate::config::CheckConfig;
use crate::error::CheckResult;
use crate::kafka_span;
use crate::transport::kafka::{spawn_connect, KafkaPublisher};
use crate::transport::{Delivery, RecordPublisher, TestMessage};
use tracing::{error, info, Instrument};

/// Entry point used by the binary
pub async fn run(args: &ClientArgs) -> CheckResult<()> {
    let config = CheckConfig::try_from(args)?;
    execute(&config).await.map(|_| ())
}

/// Connect, publish the check message and release the producer
pub async fn execute(config: &CheckConfig) -> CheckResult<Delivery> {
    let span = kafka_span!("producer", topic = %config.topic);

    async {
        let mut publisher = spawn_connect(config, KafkaPublisher::connect).await?;
        info!("producer created");
        publish_and_close(&mut publisher, &config.topic).await
    }
    .instrument(span)
    .await
}

/// Publish the check message, then close the publisher whatever the outcome
///
/// A send failure takes precedence over a close failure; the close failure
/// is still logged.
pub async fn publish_and_close<P>(publisher: &mut P, topic: &str) -> CheckResult<Delivery>
where
    P: RecordPublisher + ?Sized,
{
    let sent = send_check_message(&*publisher, topic).await;
    let closed = publisher.close();

    match (sent, closed) {
        (Ok(delivery), Ok(())) => Ok(delivery),
        (Ok(_), Err(e)) => {
            error!("Error closing producer: {}", e);
            Err(e)
        }
        (Err(e), closed) => {
            if let Err(close_error) = closed {
                error!("Error closing producer: {}", close_error);
            }
            Err(e)
        }
    }
}

/// Send the fixed check message and report where it landed
pub async fn send_check_message<P>(publisher: &P, topic: &str) -> CheckResult<Delivery>
where
    P: RecordPublisher + ?Sized,
{
    let message = TestMessage::default();
    let delivery = publisher.publish(topic, &message).await?;

    info!(
        "wrote message success, partition: {}, offset: {}",
        delivery.partition, delivery.offset
    );
    Ok(delivery)
}

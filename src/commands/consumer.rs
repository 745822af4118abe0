//! `consumer` command: print messages from one partition until interrupted

use crate::cli::ClientArgs;
use crate::config::{CheckConfig, CHECK_PARTITION};
use crate::error::CheckResult;
use crate::kafka_span;
use crate::transport::kafka::{spawn_connect, KafkaPartitionConsumer};
use crate::transport::PartitionSubscription;
use rdkafka::Offset;
use tokio::sync::watch;
use tracing::{error, info, warn, Instrument};

/// Entry point used by the binary
pub async fn run(args: &ClientArgs, shutdown: watch::Receiver<bool>) -> CheckResult<()> {
    let config = CheckConfig::try_from(args)?;
    execute(&config, shutdown).await.map(|_| ())
}

/// Shutdown channel flipped to `true` on the first SIGINT
///
/// Must be called from within a tokio runtime. If the signal handler cannot
/// be installed the sender is dropped, which the consume loop treats as a
/// shutdown request.
pub fn shutdown_on_interrupt() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT, stopping consumer");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!("Failed to listen for interrupt signal: {}", e);
            }
        }
    });

    shutdown_rx
}

/// Connect, subscribe to the check partition at the newest offset and
/// consume until shutdown. Returns the number of consumed messages.
pub async fn execute(config: &CheckConfig, shutdown: watch::Receiver<bool>) -> CheckResult<u64> {
    let span = kafka_span!("consumer", topic = %config.topic, partition = CHECK_PARTITION);

    async {
        let mut consumer = spawn_connect(config, KafkaPartitionConsumer::connect).await?;
        info!("consumer created");

        subscribe_and_consume(&mut consumer, &config.topic, shutdown).await
    }
    .instrument(span)
    .await
}

/// Open the check partition at the newest offset, then consume until shutdown
///
/// If the partition cannot be opened the connection is closed before the
/// error is returned.
pub async fn subscribe_and_consume<S>(
    subscription: &mut S,
    topic: &str,
    shutdown: watch::Receiver<bool>,
) -> CheckResult<u64>
where
    S: PartitionSubscription + ?Sized,
{
    if let Err(e) = subscription.subscribe(topic, CHECK_PARTITION, Offset::End) {
        if let Err(close_error) = subscription.close() {
            error!("Error closing consumer: {}", close_error);
        }
        return Err(e);
    }

    consume_and_release(subscription, shutdown).await
}

/// Run the consume loop, report the count, then release the subscription
/// and the connection
pub async fn consume_and_release<S>(
    subscription: &mut S,
    shutdown: watch::Receiver<bool>,
) -> CheckResult<u64>
where
    S: PartitionSubscription + ?Sized,
{
    let consumed = consume_until_shutdown(subscription, shutdown).await;
    info!("Consumed: {}", consumed);

    release(subscription)?;
    Ok(consumed)
}

/// Print every record until shutdown is requested or the stream ends
///
/// Receive errors are logged and skipped. A closed shutdown channel counts
/// as a shutdown request.
pub async fn consume_until_shutdown<S>(
    subscription: &mut S,
    mut shutdown: watch::Receiver<bool>,
) -> u64
where
    S: PartitionSubscription + ?Sized,
{
    let mut consumed = 0u64;

    if *shutdown.borrow_and_update() {
        return consumed;
    }

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow_and_update() {
                    break;
                }
            }
            next = subscription.next_record() => match next {
                Some(Ok(record)) => {
                    info!("Consumed message {}", record);
                    consumed += 1;
                }
                Some(Err(e)) => {
                    warn!("Error receiving message: {}", e);
                }
                None => {
                    info!("Partition stream ended");
                    break;
                }
            }
        }
    }

    consumed
}

/// Release the subscription, then the connection; both steps always run
fn release<S>(subscription: &mut S) -> CheckResult<()>
where
    S: PartitionSubscription + ?Sized,
{
    let unsubscribed = subscription.unsubscribe();
    if let Err(e) = &unsubscribed {
        error!("Error releasing partition subscription: {}", e);
    }

    let closed = subscription.close();
    if let Err(e) = &closed {
        error!("Error closing consumer: {}", e);
    }

    unsubscribed.and(closed)
}

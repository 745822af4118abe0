//! Tests for the producer command against a mock publisher


use kafka_check_tools::commands::producer;
use kafka_check_tools::config::CheckConfig;
use kafka_check_tools::testing::MockPublisher;
use kafka_check_tools::transport::{Delivery, TEST_MESSAGE_KEY, TEST_MESSAGE_VALUE};
use kafka_check_tools::CheckError;
use std::path::PathBuf;
use test_helpers::plain_args;

#[tokio::test]
async fn test_producer_sends_exactly_one_fixed_message() {
    let mut publisher = MockPublisher::with_delivery(0, 42);

    let delivery = producer::publish_and_close(&mut publisher, "checks")
        .await
        .unwrap();

    assert_eq!(
        delivery,
        Delivery {
            partition: 0,
            offset: 42
        }
    );
    assert!(delivery.partition >= 0);
    assert!(delivery.offset >= 0);

    let published = publisher.get_published().await;
    assert_eq!(published.len(), 1);
    let (topic, message) = &published[0];
    assert_eq!(topic, "checks");
    assert_eq!(message.key, TEST_MESSAGE_KEY);
    assert_eq!(message.value, TEST_MESSAGE_VALUE);
    assert!(publisher.is_closed());
}

#[tokio::test]
async fn test_send_failure_is_reported() {
    let mut publisher = MockPublisher::with_failure();

    let err = producer::publish_and_close(&mut publisher, "checks")
        .await
        .unwrap_err();
    assert!(matches!(err, CheckError::Publish { ref topic, .. } if topic == "checks"));
    assert!(publisher.get_published().await.is_empty());
}

#[tokio::test]
async fn test_unreadable_ca_aborts_before_connecting() {
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(PathBuf::from("/nonexistent/kafka-check-tools/ca.pem"));
    let config = CheckConfig::try_from(&args).unwrap();

    let result = producer::execute(&config).await;
    assert!(matches!(result, Err(CheckError::Tls(_))));
}

#[tokio::test]
async fn test_invalid_arguments_rejected_by_run() {
    let mut args = plain_args();
    args.brokers = " , ".to_string();

    let result = producer::run(&args).await;
    assert!(matches!(result, Err(CheckError::Config(_))));
}

//! Kafka transport built on rdkafka
//!
//! - [`security`] - TLS material loading (pure file parsing)
//! - [`connection`] - client properties derived from the check configuration
//! - [`client`] - producer and partition consumer I/O
//!
//! # Usage
//!
//! ```rust,no_run
//! use kafka_check_tools::cli::ClientArgs;
//! use kafka_check_tools::config::CheckConfig;
//! use kafka_check_tools::transport::kafka::KafkaPublisher;
//! use kafka_check_tools::transport::{RecordPublisher, TestMessage};
//!
//! # tokio_test::block_on(async {
//! let args = ClientArgs {
//!     brokers: "localhost:9092".to_string(),
//!     topic: "checks".to_string(),
//!     sasl: false,
//!     username: None,
//!     password: None,
//!     ssl: false,
//!     ca: None,
//!     cert: None,
//!     key: None,
//!     insecure_skip_verify: false,
//! };
//! let config = CheckConfig::try_from(&args)?;
//!
//! let publisher = KafkaPublisher::connect(&config)?;
//! let delivery = publisher.publish(&config.topic, &TestMessage::default()).await?;
//! println!("partition {} offset {}", delivery.partition, delivery.offset);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod client;
pub mod connection;
pub mod security;

pub use client::{spawn_connect, KafkaPartitionConsumer, KafkaPublisher};
pub use connection::{build_client_config, configure_client, security_protocol, ClientRole};
pub use security::{CaPool, ClientIdentity, TlsError, TlsMaterial};

//! Kafka check tools
//!
//! A connectivity smoke test for Kafka clusters. The `producer` command
//! publishes one fixed message and reports its partition and offset; the
//! `consumer` command prints everything arriving on partition 0 of a topic
//! until interrupted. Both speak SASL/PLAIN and TLS (optionally mutual).
//!
//! # Quick Start
//!
//! ```rust
//! use kafka_check_tools::cli::{Cli, Commands};
//! use kafka_check_tools::config::CheckConfig;
//! use clap::Parser;
//!
//! let cli = Cli::try_parse_from([
//!     "kafka-check-tools", "producer",
//!     "--brokers", "kafka-1:9092,kafka-2:9092",
//!     "--topic", "checks",
//! ]).unwrap();
//!
//! let Commands::Producer(args) = cli.command else { unreachable!() };
//! let config = CheckConfig::try_from(&args).unwrap();
//! assert_eq!(config.brokers.len(), 2);
//! assert!(config.tls.is_none());
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod observability;
pub mod testing;
pub mod transport;

pub use cli::{ClientArgs, Cli, Commands};
pub use config::{CheckConfig, ConfigError, SaslOptions, TlsOptions};
pub use error::{CheckError, CheckResult};
pub use transport::{
    ConsumedRecord, Delivery, PartitionSubscription, RecordPublisher, TestMessage,
};

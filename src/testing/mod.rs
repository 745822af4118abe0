//! Testing utilities and mock implementations
//!
//! This module provides mock transports for exercising the check commands
//! without a running Kafka cluster.

pub mod mocks;

pub use mocks::*;

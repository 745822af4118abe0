//! Error types for the check commands
//!
//! Every failure a command can hit maps to one [`CheckError`] variant. The
//! commands propagate them with `?` and the binary logs the rendered message
//! once before exiting with a non-zero status.

use crate::config::ConfigError;
use crate::transport::kafka::security::TlsError;
use thiserror::Error;

/// Boxed error from the broker client library
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for producer and consumer checks
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("TLS error: {0}")]
    Tls(#[from] TlsError),

    #[error("Client configuration rejected: {0}")]
    ClientConfig(#[source] SourceError),

    #[error("Failed to connect to brokers {brokers}: {source}")]
    Connection {
        brokers: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to send message to {topic}: {source}")]
    Publish {
        topic: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to open partition {partition} of {topic}: {source}")]
    Subscribe {
        topic: String,
        partition: i32,
        #[source]
        source: SourceError,
    },

    #[error("Failed to receive message: {0}")]
    Receive(#[source] SourceError),

    #[error("Failed to close {resource}: {source}")]
    Cleanup {
        resource: &'static str,
        #[source]
        source: SourceError,
    },
}

impl CheckError {
    /// Create client configuration error
    pub fn client_config<E: Into<SourceError>>(source: E) -> Self {
        Self::ClientConfig(source.into())
    }

    /// Create connection error
    pub fn connection<S: Into<String>, E: Into<SourceError>>(brokers: S, source: E) -> Self {
        Self::Connection {
            brokers: brokers.into(),
            source: source.into(),
        }
    }

    /// Create publish error
    pub fn publish<S: Into<String>, E: Into<SourceError>>(topic: S, source: E) -> Self {
        Self::Publish {
            topic: topic.into(),
            source: source.into(),
        }
    }

    /// Create subscribe error
    pub fn subscribe<S: Into<String>, E: Into<SourceError>>(
        topic: S,
        partition: i32,
        source: E,
    ) -> Self {
        Self::Subscribe {
            topic: topic.into(),
            partition,
            source: source.into(),
        }
    }

    /// Create receive error
    pub fn receive<E: Into<SourceError>>(source: E) -> Self {
        Self::Receive(source.into())
    }

    /// Create cleanup error
    pub fn cleanup<E: Into<SourceError>>(resource: &'static str, source: E) -> Self {
        Self::Cleanup {
            resource,
            source: source.into(),
        }
    }

    /// True for errors raised while releasing resources
    pub fn is_cleanup(&self) -> bool {
        matches!(self, Self::Cleanup { .. })
    }
}

/// Result type for check operations
pub type CheckResult<T> = Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_error_conversion() {
        let error: CheckError = ConfigError::EmptyTopic.into();
        assert!(matches!(error, CheckError::Config(ConfigError::EmptyTopic)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Topic name must not be empty"
        );
    }

    #[test]
    fn test_tls_error_conversion() {
        let error: CheckError = TlsError::NoCertificates(PathBuf::from("/tmp/ca.pem")).into();
        assert!(matches!(error, CheckError::Tls(_)));
        assert!(error.to_string().contains("/tmp/ca.pem"));
    }

    #[test]
    fn test_publish_error_message() {
        let error = CheckError::publish("checks", "broker unavailable");
        assert_eq!(
            error.to_string(),
            "Failed to send message to checks: broker unavailable"
        );
    }

    #[test]
    fn test_subscribe_error_message() {
        let error = CheckError::subscribe("checks", 0, "unknown partition");
        assert_eq!(
            error.to_string(),
            "Failed to open partition 0 of checks: unknown partition"
        );
    }

    #[test]
    fn test_cleanup_classification() {
        assert!(CheckError::cleanup("producer", "flush timed out").is_cleanup());
        assert!(!CheckError::receive("poll failed").is_cleanup());
        assert!(!CheckError::connection("localhost:9092", "refused").is_cleanup());
    }

    #[test]
    fn test_connection_error_keeps_source() {
        use std::error::Error as _;

        let error = CheckError::connection("localhost:9092", "connection refused");
        let source = error.source().expect("source should be kept");
        assert_eq!(source.to_string(), "connection refused");
    }

    #[test]
    fn test_subscribe_error_keeps_library_source() {
        use rdkafka::error::{KafkaError, RDKafkaErrorCode};
        use std::error::Error as _;

        let error = CheckError::subscribe(
            "checks",
            0,
            KafkaError::MetadataFetch(RDKafkaErrorCode::UnknownTopicOrPartition),
        );
        let source = error.source().expect("source should be kept");
        assert!(matches!(
            source.downcast_ref::<KafkaError>(),
            Some(KafkaError::MetadataFetch(
                RDKafkaErrorCode::UnknownTopicOrPartition
            ))
        ));
    }
}

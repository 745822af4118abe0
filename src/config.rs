//! Immutable connection configuration for the check commands
//!
//! Parsed command-line arguments are turned into a [`CheckConfig`] once per
//! invocation. Everything downstream (client properties, TLS loading, the
//! commands themselves) reads from this struct and never from the raw flags.

use crate::cli::ClientArgs;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Client identifier announced to the brokers
pub const CLIENT_ID: &str = "sasl_scram_client";

/// Broker protocol version used when API version negotiation is unavailable
pub const BROKER_VERSION_FALLBACK: &str = "0.10.0";

/// Partition the consumer command reads from
pub const CHECK_PARTITION: i32 = 0;

/// Socket read/write timeout (default: 5 seconds)
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum time to wait for the delivery report of the check message
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Producer retry budget inside the client library
pub const PRODUCER_MAX_RETRIES: u32 = 1;

/// Acknowledgement mode requested from the brokers: all in-sync replicas
pub const REQUIRED_ACKS: &str = "all";

/// SASL PLAIN credentials
#[derive(Clone, PartialEq, Eq)]
pub struct SaslOptions {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SaslOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslOptions")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Paths to TLS material, loaded lazily when the client is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsOptions {
    /// CA bundle used to verify the brokers
    pub ca_path: PathBuf,
    /// Client certificate for mutual TLS
    pub cert_path: Option<PathBuf>,
    /// Client private key for mutual TLS
    pub key_path: Option<PathBuf>,
    /// Skip broker certificate and hostname verification
    pub insecure_skip_verify: bool,
}

impl TlsOptions {
    /// True when both halves of a client identity were supplied
    pub fn has_client_identity(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }
}

/// Connection configuration shared by the producer and consumer commands
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    pub client_id: String,
    pub max_retries: u32,
    pub network_timeout: Duration,
    pub delivery_timeout: Duration,
    pub broker_version_fallback: String,
    pub sasl: Option<SaslOptions>,
    pub tls: Option<TlsOptions>,
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No brokers given in '{0}'")]
    EmptyBrokerList(String),
    #[error("Topic name must not be empty")]
    EmptyTopic,
    #[error("SASL is enabled but {0} is missing")]
    MissingSaslCredential(&'static str),
    #[error("SSL is enabled but no CA certificate was given")]
    MissingCaCertificate,
    #[error("Client certificate and key must be given together")]
    IncompleteClientIdentity,
    #[error("--insecure-skip-verify only applies together with --ssl")]
    InsecureWithoutSsl,
}

impl CheckConfig {
    /// Bootstrap server list in the comma-separated form the client expects
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

/// Split a comma-separated broker list, trimming entries and dropping empties
pub fn parse_broker_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let brokers: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect();

    if brokers.is_empty() {
        return Err(ConfigError::EmptyBrokerList(raw.to_string()));
    }

    Ok(brokers)
}

fn sasl_options(args: &ClientArgs) -> Result<Option<SaslOptions>, ConfigError> {
    if !args.sasl {
        return Ok(None);
    }

    let username = args
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::MissingSaslCredential("username"))?;
    let password = args
        .password
        .clone()
        .ok_or(ConfigError::MissingSaslCredential("password"))?;

    Ok(Some(SaslOptions { username, password }))
}

fn tls_options(args: &ClientArgs) -> Result<Option<TlsOptions>, ConfigError> {
    if !args.ssl {
        if args.insecure_skip_verify {
            return Err(ConfigError::InsecureWithoutSsl);
        }
        return Ok(None);
    }

    let ca_path = args.ca.clone().ok_or(ConfigError::MissingCaCertificate)?;
    if args.cert.is_some() != args.key.is_some() {
        return Err(ConfigError::IncompleteClientIdentity);
    }

    Ok(Some(TlsOptions {
        ca_path,
        cert_path: args.cert.clone(),
        key_path: args.key.clone(),
        insecure_skip_verify: args.insecure_skip_verify,
    }))
}

impl TryFrom<&ClientArgs> for CheckConfig {
    type Error = ConfigError;

    fn try_from(args: &ClientArgs) -> Result<Self, Self::Error> {
        let brokers = parse_broker_list(&args.brokers)?;
        let topic = args.topic.trim();
        if topic.is_empty() {
            return Err(ConfigError::EmptyTopic);
        }

        Ok(CheckConfig {
            brokers,
            topic: topic.to_string(),
            client_id: CLIENT_ID.to_string(),
            max_retries: PRODUCER_MAX_RETRIES,
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            broker_version_fallback: BROKER_VERSION_FALLBACK.to_string(),
            sasl: sasl_options(args)?,
            tls: tls_options(args)?,
        })
    }
}

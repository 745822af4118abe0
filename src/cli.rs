//! Command-line surface
//!
//! `producer` and `consumer` share one flag set ([`ClientArgs`]). Flag
//! combinations that clap can express (`--sasl` needs credentials, `--ssl`
//! needs a CA, cert and key travel together) are enforced at parse time;
//! [`crate::config::CheckConfig`] re-checks them for callers that build
//! `ClientArgs` by hand.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Kafka connectivity check tools
#[derive(Debug, Parser)]
#[command(name = "kafka-check-tools")]
#[command(about = "kafka check tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Publish a single check message and report its partition and offset
    Producer(ClientArgs),
    /// Print messages from partition 0 of a topic until interrupted
    Consumer(ClientArgs),
    /// Generate a shell completion script
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Flags shared by the producer and consumer commands
#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    /// The Kafka brokers to connect to, as a comma separated list
    #[arg(
        short = 'b',
        long,
        visible_alias = "brokens",
        env = "KAFKA_CHECK_BROKERS",
        value_name = "CSV"
    )]
    pub brokers: String,

    /// The Kafka topic to use
    #[arg(short = 't', long, env = "KAFKA_CHECK_TOPIC")]
    pub topic: String,

    /// Enable SASL
    #[arg(long, requires_all = ["username", "password"])]
    pub sasl: bool,

    /// The SASL user, if sasl, this is required
    #[arg(short = 'u', long, env = "KAFKA_CHECK_USERNAME")]
    pub username: Option<String>,

    /// The SASL password, if sasl, this is required
    #[arg(
        short = 'p',
        long,
        env = "KAFKA_CHECK_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Enable SSL
    #[arg(long, requires = "ca")]
    pub ssl: bool,

    /// The SSL ca certificate, if ssl, this is required
    #[arg(long, value_name = "FILE")]
    pub ca: Option<PathBuf>,

    /// The SSL client certificate
    #[arg(long, value_name = "FILE", requires = "key")]
    pub cert: Option<PathBuf>,

    /// The SSL client key
    #[arg(long, value_name = "FILE", requires = "cert")]
    pub key: Option<PathBuf>,

    /// INSECURE: skip broker certificate and hostname verification (test clusters only)
    #[arg(long, requires = "ssl")]
    pub insecure_skip_verify: bool,
}

//! Pure client configuration for the Kafka transport
//!
//! Translates a [`CheckConfig`] (plus loaded TLS material) into librdkafka
//! properties. Nothing here touches the network, so every property can be
//! asserted in tests.

use crate::config::{CheckConfig, REQUIRED_ACKS};
use crate::error::CheckResult;
use crate::transport::kafka::security::TlsMaterial;
use rdkafka::config::RDKafkaLogLevel;
use rdkafka::ClientConfig;

/// Which kind of client the configuration is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    Producer,
    Consumer,
}

/// `security.protocol` value for the given SASL/TLS combination
pub fn security_protocol(sasl: bool, tls: bool) -> &'static str {
    match (sasl, tls) {
        (false, false) => "plaintext",
        (false, true) => "ssl",
        (true, false) => "sasl_plaintext",
        (true, true) => "sasl_ssl",
    }
}

/// Load TLS material (if any) and build the client configuration
///
/// TLS files are read before anything else happens, so an unreadable CA
/// aborts the command before a client is created.
pub fn build_client_config(config: &CheckConfig, role: ClientRole) -> CheckResult<ClientConfig> {
    let tls = config.tls.as_ref().map(TlsMaterial::load).transpose()?;
    Ok(configure_client(config, tls.as_ref(), role))
}

/// Pure function to configure client properties from config
pub fn configure_client(
    config: &CheckConfig,
    tls: Option<&TlsMaterial>,
    role: ClientRole,
) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    let timeout_ms = config.network_timeout.as_millis().to_string();

    client_config
        .set("bootstrap.servers", config.bootstrap_servers())
        .set("client.id", &config.client_id)
        .set("socket.timeout.ms", &timeout_ms)
        .set("api.version.request", "true")
        .set("broker.version.fallback", &config.broker_version_fallback)
        // Refresh metadata for every topic in the cluster, not only the one in use
        .set("topic.metadata.refresh.sparse", "false")
        .set(
            "security.protocol",
            security_protocol(config.sasl.is_some(), tls.is_some()),
        )
        .set_log_level(RDKafkaLogLevel::Warning);

    if let Some(sasl) = &config.sasl {
        client_config
            .set("sasl.mechanism", "PLAIN")
            .set("sasl.username", &sasl.username)
            .set("sasl.password", &sasl.password);
    }

    if let Some(tls) = tls {
        apply_tls(&mut client_config, tls);
    }

    match role {
        ClientRole::Producer => {
            client_config
                .set("acks", REQUIRED_ACKS)
                .set("message.send.max.retries", config.max_retries.to_string())
                .set(
                    "message.timeout.ms",
                    config.delivery_timeout.as_millis().to_string(),
                )
                .set("request.timeout.ms", &timeout_ms);
        }
        ClientRole::Consumer => {
            // Partition assignment is manual and offsets are never committed,
            // the group id only satisfies librdkafka.
            client_config
                .set("group.id", &config.client_id)
                .set("enable.auto.commit", "false")
                .set("enable.auto.offset.store", "false")
                .set("enable.partition.eof", "false")
                .set("auto.offset.reset", "latest");
        }
    }

    client_config
}

fn apply_tls(client_config: &mut ClientConfig, tls: &TlsMaterial) {
    client_config.set("ssl.ca.pem", tls.ca().pem());

    if let Some(identity) = tls.identity() {
        client_config
            .set("ssl.certificate.pem", identity.certificate_pem())
            .set("ssl.key.pem", identity.key_pem());
    }

    if tls.verify_peer() {
        client_config
            .set("enable.ssl.certificate.verification", "true")
            .set("ssl.endpoint.identification.algorithm", "https");
    } else {
        client_config
            .set("enable.ssl.certificate.verification", "false")
            .set("ssl.endpoint.identification.algorithm", "none");
    }
}

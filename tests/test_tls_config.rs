//! Tests for TLS material loading and the resulting client properties


use kafka_check_tools::config::CheckConfig;
use kafka_check_tools::transport::kafka::{
    build_client_config, configure_client, ClientRole, KafkaPartitionConsumer, KafkaPublisher,
    TlsError, TlsMaterial,
};
use kafka_check_tools::CheckError;
use rdkafka::producer::FutureProducer;
use std::path::PathBuf;
use test_helpers::{pem_file, plain_args, TlsFixtures};

#[test]
fn test_ssl_without_client_identity_verifies_peer() {
    let fixtures = TlsFixtures::generate();
    let ca = pem_file(&fixtures.ca_pem);
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());

    let config = CheckConfig::try_from(&args).unwrap();
    let material = TlsMaterial::load(config.tls.as_ref().unwrap()).unwrap();

    assert!(material.verify_peer());
    assert_eq!(material.client_certificate_count(), 0);
    assert_eq!(material.ca().certificate_count(), 1);

    let client_config = configure_client(&config, Some(&material), ClientRole::Producer);
    assert_eq!(client_config.get("security.protocol"), Some("ssl"));
    assert_eq!(client_config.get("ssl.ca.pem"), Some(fixtures.ca_pem.as_str()));
    assert_eq!(
        client_config.get("enable.ssl.certificate.verification"),
        Some("true")
    );
    assert_eq!(client_config.get("ssl.certificate.pem"), None);
}

#[test]
fn test_insecure_mode_disables_verification_but_keeps_ca() {
    let fixtures = TlsFixtures::generate();
    let ca = pem_file(&fixtures.ca_pem);
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());
    args.insecure_skip_verify = true;

    let config = CheckConfig::try_from(&args).unwrap();
    let material = TlsMaterial::load(config.tls.as_ref().unwrap()).unwrap();
    assert!(!material.verify_peer());
    assert_eq!(material.ca().certificate_count(), 1);

    let client_config = build_client_config(&config, ClientRole::Consumer).unwrap();
    assert_eq!(
        client_config.get("enable.ssl.certificate.verification"),
        Some("false")
    );
    assert_eq!(
        client_config.get("ssl.endpoint.identification.algorithm"),
        Some("none")
    );
    assert_eq!(client_config.get("ssl.ca.pem"), Some(fixtures.ca_pem.as_str()));
}

#[test]
fn test_mutual_tls_carries_one_client_certificate() {
    let fixtures = TlsFixtures::generate();
    let ca = pem_file(&fixtures.ca_pem);
    let cert = pem_file(&fixtures.cert_pem);
    let key = pem_file(&fixtures.key_pem);
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());
    args.cert = Some(cert.path().to_path_buf());
    args.key = Some(key.path().to_path_buf());

    let config = CheckConfig::try_from(&args).unwrap();
    let material = TlsMaterial::load(config.tls.as_ref().unwrap()).unwrap();

    assert!(material.verify_peer());
    assert_eq!(material.client_certificate_count(), 1);
    assert!(material.identity().is_some());
    assert_eq!(material.ca().certificate_count(), 1);

    let client_config = configure_client(&config, Some(&material), ClientRole::Producer);
    assert_eq!(client_config.get("ssl.certificate.pem"), Some(fixtures.cert_pem.as_str()));
    assert_eq!(client_config.get("ssl.key.pem"), Some(fixtures.key_pem.as_str()));
    assert_eq!(client_config.get("ssl.ca.pem"), Some(fixtures.ca_pem.as_str()));
    assert_eq!(
        client_config.get("enable.ssl.certificate.verification"),
        Some("true")
    );
}

#[test]
fn test_sasl_over_tls_protocol() {
    let fixtures = TlsFixtures::generate();
    let ca = pem_file(&fixtures.ca_pem);
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());
    args.sasl = true;
    args.username = Some("alice".to_string());
    args.password = Some("secret".to_string());

    let config = CheckConfig::try_from(&args).unwrap();
    let client_config = build_client_config(&config, ClientRole::Producer).unwrap();
    assert_eq!(client_config.get("security.protocol"), Some("sasl_ssl"));
    assert_eq!(client_config.get("sasl.username"), Some("alice"));
}

fn unreadable_ca_config() -> CheckConfig {
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(PathBuf::from("/nonexistent/kafka-check-tools/ca.pem"));
    CheckConfig::try_from(&args).unwrap()
}

#[test]
fn test_unreadable_ca_fails_client_config() {
    let result = build_client_config(&unreadable_ca_config(), ClientRole::Producer);
    assert!(matches!(
        result,
        Err(CheckError::Tls(TlsError::Read { .. }))
    ));
}

#[test]
fn test_unreadable_ca_prevents_producer_connection() {
    let result = KafkaPublisher::connect(&unreadable_ca_config());
    assert!(matches!(result, Err(CheckError::Tls(_))));
}

#[test]
fn test_unreadable_ca_prevents_consumer_connection() {
    let result = KafkaPartitionConsumer::connect(&unreadable_ca_config());
    assert!(matches!(result, Err(CheckError::Tls(_))));
}

#[test]
fn test_ca_without_certificates_rejected() {
    let ca = pem_file("# empty bundle\n");
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());

    let config = CheckConfig::try_from(&args).unwrap();
    let result = build_client_config(&config, ClientRole::Consumer);
    assert!(matches!(
        result,
        Err(CheckError::Tls(TlsError::NoCertificates(_)))
    ));
}

#[test]
fn test_unreadable_client_key_rejected() {
    let fixtures = TlsFixtures::generate();
    let ca = pem_file(&fixtures.ca_pem);
    let cert = pem_file(&fixtures.cert_pem);
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());
    args.cert = Some(cert.path().to_path_buf());
    args.key = Some(PathBuf::from("/nonexistent/kafka-check-tools/client.key"));

    let config = CheckConfig::try_from(&args).unwrap();
    let result = TlsMaterial::load(config.tls.as_ref().unwrap());
    assert!(matches!(
        result,
        Err(TlsError::Read {
            kind: "client key",
            ..
        })
    ));
}

fn mutual_tls_args(fixtures: &TlsFixtures) -> (CheckConfig, [tempfile::NamedTempFile; 3]) {
    let ca = pem_file(&fixtures.ca_pem);
    let cert = pem_file(&fixtures.cert_pem);
    let key = pem_file(&fixtures.key_pem);
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());
    args.cert = Some(cert.path().to_path_buf());
    args.key = Some(key.path().to_path_buf());

    let config = CheckConfig::try_from(&args).unwrap();
    (config, [ca, cert, key])
}

#[test]
fn test_client_library_accepts_generated_material() {
    let fixtures = TlsFixtures::generate();
    let (config, _files) = mutual_tls_args(&fixtures);

    let client_config = build_client_config(&config, ClientRole::Producer).unwrap();
    let producer = client_config.create::<FutureProducer>();
    assert!(producer.is_ok(), "client creation failed: {:?}", producer.err());
}

#[test]
fn test_undecodable_ca_rejected_at_load() {
    let ca = pem_file("-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n");
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());

    let config = CheckConfig::try_from(&args).unwrap();
    let result = KafkaPublisher::connect(&config);
    assert!(matches!(
        result,
        Err(CheckError::Tls(TlsError::InvalidCertificate { .. }))
    ));
}

#[test]
fn test_client_key_from_another_pair_rejected_at_load() {
    let fixtures = TlsFixtures::generate();
    let other = TlsFixtures::generate();
    let ca = pem_file(&fixtures.ca_pem);
    let cert = pem_file(&fixtures.cert_pem);
    let key = pem_file(&other.key_pem);
    let mut args = plain_args();
    args.ssl = true;
    args.ca = Some(ca.path().to_path_buf());
    args.cert = Some(cert.path().to_path_buf());
    args.key = Some(key.path().to_path_buf());

    let config = CheckConfig::try_from(&args).unwrap();
    let result = build_client_config(&config, ClientRole::Consumer);
    assert!(matches!(
        result,
        Err(CheckError::Tls(TlsError::KeyMismatch { .. }))
    ));
}

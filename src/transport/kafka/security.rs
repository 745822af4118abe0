//! TLS material loading
//!
//! Reads the CA bundle and the optional client identity from PEM files and
//! validates them before any client is created: every CA certificate must
//! decode as a trust anchor, and the client key must be usable and belong to
//! the leaf certificate. The PEM text is kept so it can be handed to the
//! client library as-is.

use crate::config::TlsOptions;
use rustls::crypto::ring::sign::any_supported_type;
use rustls::pki_types::CertificateDer;
use rustls::sign::CertifiedKey;
use rustls::RootCertStore;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading TLS material
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Failed to read {kind} file {path}: {source}")]
    Read {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {kind} from {path}: {source}")]
    Parse {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No certificates found in {0}")]
    NoCertificates(PathBuf),
    #[error("No private key found in {0}")]
    NoPrivateKey(PathBuf),
    #[error("Invalid {kind} in {path}: {source}")]
    InvalidCertificate {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: rustls::Error,
    },
    #[error("Unsupported client key in {path}: {source}")]
    InvalidKey {
        path: PathBuf,
        #[source]
        source: rustls::Error,
    },
    #[error("Client key {key_path} does not match certificate {cert_path}: {source}")]
    KeyMismatch {
        cert_path: PathBuf,
        key_path: PathBuf,
        #[source]
        source: rustls::Error,
    },
}

/// Trusted CA certificates
#[derive(Debug, Clone)]
pub struct CaPool {
    pem: String,
    roots: RootCertStore,
}

impl CaPool {
    /// Load a CA bundle; at least one certificate is required and each must
    /// decode as a trust anchor
    pub fn load(path: &Path) -> Result<Self, TlsError> {
        let pem = read_pem(path, "CA certificate")?;

        let mut roots = RootCertStore::empty();
        for certificate in parse_certificates(&pem, path, "CA certificate")? {
            roots
                .add(certificate)
                .map_err(|source| TlsError::InvalidCertificate {
                    kind: "CA certificate",
                    path: path.to_path_buf(),
                    source,
                })?;
        }

        Ok(Self { pem, roots })
    }

    pub fn pem(&self) -> &str {
        &self.pem
    }

    pub fn certificate_count(&self) -> usize {
        self.roots.len()
    }
}

/// Client certificate chain and private key for mutual TLS
pub struct ClientIdentity {
    certificate_pem: String,
    key_pem: String,
    chain_len: usize,
}

impl ClientIdentity {
    /// Load the chain and key, then check the key signs for the leaf
    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self, TlsError> {
        let certificate_pem = read_pem(cert_path, "client certificate")?;
        let chain = parse_certificates(&certificate_pem, cert_path, "client certificate")?;
        let chain_len = chain.len();

        let key_pem = read_pem(key_path, "client key")?;
        let key = rustls_pemfile::private_key(&mut key_pem.as_bytes())
            .map_err(|source| TlsError::Parse {
                kind: "client key",
                path: key_path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| TlsError::NoPrivateKey(key_path.to_path_buf()))?;

        let signing_key = any_supported_type(&key).map_err(|source| TlsError::InvalidKey {
            path: key_path.to_path_buf(),
            source,
        })?;

        CertifiedKey::new(chain, signing_key)
            .keys_match()
            .map_err(|source| match source {
                rustls::Error::InconsistentKeys(_) => TlsError::KeyMismatch {
                    cert_path: cert_path.to_path_buf(),
                    key_path: key_path.to_path_buf(),
                    source,
                },
                other => TlsError::InvalidCertificate {
                    kind: "client certificate",
                    path: cert_path.to_path_buf(),
                    source: other,
                },
            })?;

        Ok(Self {
            certificate_pem,
            key_pem,
            chain_len,
        })
    }

    pub fn certificate_pem(&self) -> &str {
        &self.certificate_pem
    }

    pub fn key_pem(&self) -> &str {
        &self.key_pem
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("chain_len", &self.chain_len)
            .field("key", &"[private key elided]")
            .finish()
    }
}

/// Loaded TLS settings applied to the client configuration
#[derive(Debug)]
pub struct TlsMaterial {
    ca: CaPool,
    identity: Option<ClientIdentity>,
    verify_peer: bool,
}

impl TlsMaterial {
    /// Load everything referenced by `options`
    pub fn load(options: &TlsOptions) -> Result<Self, TlsError> {
        let ca = CaPool::load(&options.ca_path)?;

        let identity = match (&options.cert_path, &options.key_path) {
            (Some(cert), Some(key)) => Some(ClientIdentity::load(cert, key)?),
            _ => None,
        };

        if options.insecure_skip_verify {
            warn!(
                "TLS peer verification is DISABLED (--insecure-skip-verify); broker identity will not be checked"
            );
        }

        debug!(
            "Loaded {} CA certificate(s) from {}, client identity: {}",
            ca.certificate_count(),
            options.ca_path.display(),
            identity.is_some()
        );

        Ok(Self {
            ca,
            identity,
            verify_peer: !options.insecure_skip_verify,
        })
    }

    pub fn ca(&self) -> &CaPool {
        &self.ca
    }

    pub fn identity(&self) -> Option<&ClientIdentity> {
        self.identity.as_ref()
    }

    /// Number of client identities presented to the brokers (0 or 1)
    pub fn client_certificate_count(&self) -> usize {
        usize::from(self.identity.is_some())
    }

    pub fn verify_peer(&self) -> bool {
        self.verify_peer
    }
}

fn read_pem(path: &Path, kind: &'static str) -> Result<String, TlsError> {
    fs::read_to_string(path).map_err(|source| TlsError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

fn parse_certificates(
    pem: &str,
    path: &Path,
    kind: &'static str,
) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let certificates = rustls_pemfile::certs(&mut pem.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Parse {
            kind,
            path: path.to_path_buf(),
            source,
        })?;

    if certificates.is_empty() {
        return Err(TlsError::NoCertificates(path.to_path_buf()));
    }

    Ok(certificates)
}

// crates/nomad-provider-config/src/tls.rs
// ============================================================================
// Module: TLS Material Loading
// Description: Load CA bundles and client identities into the HTTP client.
// Purpose: Surface unreadable or malformed TLS material at construction time.
// Dependencies: reqwest, tracing, crate::config
// ============================================================================

//! ## Overview
//! TLS material is accepted either as a file path or as inline PEM. Nothing
//! is read or parsed until the client is built; this module does both and
//! reports failures as [`ClientError`]s naming the material involved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use reqwest::Certificate;
use reqwest::Identity;
use reqwest::blocking::ClientBuilder;
use tracing::debug;

use crate::config::TlsConfig;
use crate::error::ClientError;

// ============================================================================
// SECTION: Material Sources
// ============================================================================

/// Where one piece of TLS material comes from.
enum Material<'a> {
    /// Inline PEM bytes.
    Pem(&'a [u8]),
    /// Path to a PEM file.
    File(&'a str),
}

impl<'a> Material<'a> {
    /// Selects the configured source, preferring inline PEM.
    const fn select(pem: &'a [u8], path: &'a str) -> Option<Self> {
        if !pem.is_empty() {
            Some(Self::Pem(pem))
        } else if !path.is_empty() {
            Some(Self::File(path))
        } else {
            None
        }
    }

    /// Returns the PEM bytes, reading the file when needed.
    fn read(&self, label: &'static str) -> Result<Vec<u8>, ClientError> {
        match self {
            Self::Pem(bytes) => Ok(bytes.to_vec()),
            Self::File(path) => fs::read(path).map_err(|source| ClientError::ReadTlsFile {
                label,
                path: (*path).to_string(),
                source,
            }),
        }
    }
}

// ============================================================================
// SECTION: Builder Integration
// ============================================================================

/// Applies TLS material and verification settings to a client builder.
///
/// A client identity is configured only when both a certificate and a key
/// are present; partial identity material is ignored.
pub(crate) fn apply_tls(
    mut builder: ClientBuilder,
    tls: &TlsConfig,
) -> Result<ClientBuilder, ClientError> {
    if let Some(ca) = Material::select(&tls.ca_cert_pem, &tls.ca_cert) {
        let label = "CA certificate";
        for certificate in parse_bundle(&ca.read(label)?, label)? {
            builder = builder.add_root_certificate(certificate);
        }
    }
    if !tls.ca_path.is_empty() {
        for certificate in load_ca_dir(Path::new(&tls.ca_path))? {
            builder = builder.add_root_certificate(certificate);
        }
    }
    let cert = Material::select(&tls.client_cert_pem, &tls.client_cert);
    let key = Material::select(&tls.client_key_pem, &tls.client_key);
    if let (Some(cert), Some(key)) = (cert, key) {
        let mut identity = cert.read("client certificate")?;
        identity.push(b'\n');
        identity.extend_from_slice(&key.read("client key")?);
        let identity = Identity::from_pem(&identity).map_err(|err| ClientError::Tls {
            label: "client certificate/key pair",
            reason: err.to_string(),
        })?;
        builder = builder.identity(identity);
    }
    if tls.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }
    Ok(builder)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a PEM bundle, requiring at least one certificate.
fn parse_bundle(bytes: &[u8], label: &'static str) -> Result<Vec<Certificate>, ClientError> {
    let certificates = Certificate::from_pem_bundle(bytes).map_err(|err| ClientError::Tls {
        label,
        reason: err.to_string(),
    })?;
    if certificates.is_empty() {
        return Err(ClientError::Tls {
            label,
            reason: "no certificates found".to_string(),
        });
    }
    Ok(certificates)
}

/// Loads every regular file in a CA directory, in path order.
fn load_ca_dir(dir: &Path) -> Result<Vec<Certificate>, ClientError> {
    let label = "CA path";
    let read_error = |source| ClientError::ReadTlsFile {
        label,
        path: dir.display().to_string(),
        source,
    };
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    let mut certificates = Vec::new();
    for path in &paths {
        let bytes = fs::read(path).map_err(|source| ClientError::ReadTlsFile {
            label,
            path: path.display().to_string(),
            source,
        })?;
        certificates.extend(parse_bundle(&bytes, label)?);
    }
    debug!(files = paths.len(), certificates = certificates.len(), "loaded CA directory");
    Ok(certificates)
}

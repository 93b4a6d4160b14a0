// crates/nomad-provider-config/src/config.rs
// ============================================================================
// Module: Client Configuration
// Description: Configuration record handed to the Nomad API client.
// Purpose: Hold the resolved address, identity, TLS, and header state.
// Dependencies: serde_json, crate::env, crate::headers, crate::transport
// ============================================================================

//! ## Overview
//! [`ClientConfig`] is the record the resolver fills in and
//! [`crate::NomadClient::new`] consumes. [`ClientConfig::from_env`] produces
//! the environment-derived default that resolution starts from; it reads the
//! same variables the upstream Nomad tooling does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use crate::env::EnvSource;
use crate::env::NOMAD_ADDR_ENV;
use crate::env::NOMAD_CACERT_ENV;
use crate::env::NOMAD_CAPATH_ENV;
use crate::env::NOMAD_CLIENT_CERT_ENV;
use crate::env::NOMAD_CLIENT_KEY_ENV;
use crate::env::NOMAD_HTTP_AUTH_ENV;
use crate::env::NOMAD_NAMESPACE_ENV;
use crate::env::NOMAD_REGION_ENV;
use crate::env::NOMAD_SKIP_VERIFY_ENV;
use crate::env::NOMAD_TLS_SERVER_NAME_ENV;
use crate::env::NOMAD_TOKEN_ENV;
use crate::env::parse_bool;
use crate::headers::HeaderMultimap;
use crate::transport::TransportSettings;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Address used when neither options nor environment supply one.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:4646";

/// Placeholder shown in place of secret values.
const REDACTED: &str = "<redacted>";

// ============================================================================
// SECTION: Basic Auth
// ============================================================================

/// HTTP basic auth credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HttpBasicAuth {
    /// User name.
    pub username: String,
    /// Password; empty when none was given.
    pub password: String,
}

impl HttpBasicAuth {
    /// Parses `user[:password]`, splitting once on the first colon.
    ///
    /// Returns `None` for the empty string.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let (username, password) = raw.split_once(':').unwrap_or((raw, ""));
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl std::fmt::Debug for HttpBasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBasicAuth")
            .field("username", &self.username)
            .field("password", &redacted_marker(!self.password.is_empty()))
            .finish()
    }
}

// ============================================================================
// SECTION: TLS
// ============================================================================

/// TLS material for the client.
///
/// # Invariants
/// - For each of CA, client cert, and client key at most one of path or PEM
///   is populated; when both are, the PEM bytes win.
/// - Contents are not validated until the client is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to a PEM-encoded CA certificate bundle.
    pub ca_cert: String,
    /// Directory of PEM-encoded CA certificates.
    pub ca_path: String,
    /// Inline PEM-encoded CA certificate bundle.
    pub ca_cert_pem: Vec<u8>,
    /// Path to the PEM-encoded client certificate.
    pub client_cert: String,
    /// Inline PEM-encoded client certificate.
    pub client_cert_pem: Vec<u8>,
    /// Path to the PEM-encoded client private key.
    pub client_key: String,
    /// Inline PEM-encoded client private key.
    pub client_key_pem: Vec<u8>,
    /// Server name expected on the agent certificate. Recorded, not enforced.
    pub tls_server_name: String,
    /// Skip certificate and hostname verification.
    pub insecure: bool,
}

// ============================================================================
// SECTION: Client Configuration
// ============================================================================

/// Resolved configuration for a [`crate::NomadClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Agent address.
    pub address: String,
    /// Default region; empty means the agent's own region.
    pub region: String,
    /// Default namespace; empty means the agent default.
    pub namespace: String,
    /// ACL token secret; empty means anonymous.
    pub secret_id: String,
    /// Optional HTTP basic auth.
    pub http_auth: Option<HttpBasicAuth>,
    /// TLS material.
    pub tls: TlsConfig,
    /// Headers sent with every request.
    pub headers: HeaderMultimap,
    /// Transport variant.
    pub transport: TransportSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            region: String::new(),
            namespace: String::new(),
            secret_id: String::new(),
            http_auth: None,
            tls: TlsConfig::default(),
            headers: HeaderMultimap::new(),
            transport: TransportSettings::Pooled,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("address", &self.address)
            .field("region", &self.region)
            .field("namespace", &self.namespace)
            .field("secret_id", &redacted_marker(!self.secret_id.is_empty()))
            .field("http_auth", &self.http_auth)
            .field("tls.ca_cert", &self.tls.ca_cert)
            .field("tls.ca_path", &self.tls.ca_path)
            .field("tls.client_cert", &self.tls.client_cert)
            .field("tls.client_key", &self.tls.client_key)
            .field("tls.client_key_pem", &redacted_marker(!self.tls.client_key_pem.is_empty()))
            .field("tls.insecure", &self.tls.insecure)
            .field("headers", &self.headers.names().collect::<Vec<_>>())
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Builds the environment-derived default configuration.
    ///
    /// An unparseable `NOMAD_SKIP_VERIFY` is ignored here.
    #[must_use]
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let mut config = Self::default();
        if let Some(address) = env.non_empty(NOMAD_ADDR_ENV) {
            config.address = address;
        }
        config.region = env.non_empty(NOMAD_REGION_ENV).unwrap_or_default();
        config.namespace = env.non_empty(NOMAD_NAMESPACE_ENV).unwrap_or_default();
        config.secret_id = env.non_empty(NOMAD_TOKEN_ENV).unwrap_or_default();
        config.http_auth =
            env.non_empty(NOMAD_HTTP_AUTH_ENV).and_then(|raw| HttpBasicAuth::parse(&raw));
        config.tls = TlsConfig {
            ca_cert: env.non_empty(NOMAD_CACERT_ENV).unwrap_or_default(),
            ca_path: env.non_empty(NOMAD_CAPATH_ENV).unwrap_or_default(),
            client_cert: env.non_empty(NOMAD_CLIENT_CERT_ENV).unwrap_or_default(),
            client_key: env.non_empty(NOMAD_CLIENT_KEY_ENV).unwrap_or_default(),
            tls_server_name: env.non_empty(NOMAD_TLS_SERVER_NAME_ENV).unwrap_or_default(),
            insecure: env
                .non_empty(NOMAD_SKIP_VERIFY_ENV)
                .and_then(|raw| parse_bool(&raw))
                .unwrap_or(false),
            ..TlsConfig::default()
        };
        config
    }

    /// Renders the configuration as JSON with secrets replaced.
    ///
    /// Token, password, private key, and header values are never included.
    #[must_use]
    pub fn redacted_json(&self) -> Value {
        let headers: serde_json::Map<String, Value> = self
            .headers
            .iter()
            .map(|(name, values)| {
                (name.to_string(), Value::Array(values.iter().map(|_| json!(REDACTED)).collect()))
            })
            .collect();
        let transport = match self.transport {
            TransportSettings::Pooled => json!({ "mode": self.transport.as_str() }),
            TransportSettings::NonPooled {
                tls_handshake_timeout,
                min_tls_version,
                http2,
            } => json!({
                "mode": self.transport.as_str(),
                "tls_handshake_timeout_secs": tls_handshake_timeout.as_secs(),
                "min_tls_version": min_tls_version.as_str(),
                "http2": http2,
            }),
        };
        json!({
            "address": self.address,
            "region": self.region,
            "namespace": self.namespace,
            "secret_id": redact_if_set(!self.secret_id.is_empty()),
            "http_auth": self.http_auth.as_ref().map(|auth| json!({
                "username": auth.username,
                "password": redact_if_set(!auth.password.is_empty()),
            })),
            "tls": {
                "ca_cert": self.tls.ca_cert,
                "ca_path": self.tls.ca_path,
                "ca_cert_pem": !self.tls.ca_cert_pem.is_empty(),
                "client_cert": self.tls.client_cert,
                "client_cert_pem": !self.tls.client_cert_pem.is_empty(),
                "client_key": self.tls.client_key,
                "client_key_pem": redact_if_set(!self.tls.client_key_pem.is_empty()),
                "tls_server_name": self.tls.tls_server_name,
                "insecure": self.tls.insecure,
            },
            "headers": headers,
            "transport": transport,
        })
    }
}

/// Returns the redaction marker for set secrets and null otherwise.
fn redact_if_set(is_set: bool) -> Value {
    redacted_marker(is_set).map_or(Value::Null, |marker| json!(marker))
}

/// Returns the redaction marker when a secret is present.
const fn redacted_marker(is_set: bool) -> Option<&'static str> {
    if is_set { Some(REDACTED) } else { None }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

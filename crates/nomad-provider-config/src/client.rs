// crates/nomad-provider-config/src/client.rs
// ============================================================================
// Module: Nomad API Client
// Description: Configured HTTP client for the Nomad agent API.
// Purpose: Build the transport once and issue authenticated API requests.
// Dependencies: reqwest, serde, url, crate::config, crate::tls
// ============================================================================

//! ## Overview
//! [`NomadClient::new`] is the only way to obtain a client. Construction
//! validates the address, loads TLS material, converts the configured
//! headers, and builds the transport. Header entries that are not valid HTTP
//! are skipped with a warning rather than failing construction. It makes no network calls; requests
//! happen on first use.
//!
//! Every request carries the configured headers, the ACL token in
//! `X-Nomad-Token`, basic auth when configured, and `region` / `namespace`
//! query parameters taken from [`QueryOptions`] or, failing that, from the
//! client configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::error::error_chain;
use crate::headers::HeaderMultimap;
use crate::tls::apply_tls;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the ACL token secret.
pub const TOKEN_HEADER: &str = "X-Nomad-Token";

// ============================================================================
// SECTION: Query Options
// ============================================================================

/// Per-request overrides applied on top of the client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Region override.
    pub region: Option<String>,
    /// Namespace override.
    pub namespace: Option<String>,
}

impl QueryOptions {
    /// Returns options that override only the namespace.
    #[must_use]
    pub fn namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    /// Returns options that override only the region.
    #[must_use]
    pub fn region(region: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Configured Nomad API client.
///
/// # Invariants
/// - `base_url` is an `http` or `https` URL parsed from `config.address`.
/// - `http` was built from `config`'s TLS and transport settings.
/// - `headers` holds every valid configured header value, in order.
#[derive(Clone)]
pub struct NomadClient {
    /// Configuration the client was built from.
    config: ClientConfig,
    /// Parsed agent address.
    base_url: Url,
    /// Configured headers converted for the wire.
    headers: HeaderMap,
    /// Underlying HTTP client.
    http: Client,
}

impl NomadClient {
    /// Builds a client from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for an invalid address, unreadable or
    /// malformed TLS material, or a transport build failure.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_address(&config.address)?;
        let headers = build_header_map(&config.headers);
        let builder = config.transport.apply(Client::builder());
        let builder = apply_tls(builder, &config.tls)?;
        let http = builder.build().map_err(|err| ClientError::Build(error_chain(&err)))?;
        Ok(Self {
            config,
            base_url,
            headers,
            http,
        })
    }

    /// Returns the configuration the client was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the parsed agent address.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Prepares a request against `endpoint` with auth and scoping applied.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] when `endpoint` cannot be
    /// joined to the agent address.
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &QueryOptions,
    ) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|_| ClientError::InvalidEndpoint(endpoint.to_string()))?;
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(region) = scoped(query.region.as_deref(), &self.config.region) {
            params.push(("region", region));
        }
        if let Some(namespace) = scoped(query.namespace.as_deref(), &self.config.namespace) {
            params.push(("namespace", namespace));
        }
        let mut request = self.http.request(method, url);
        // Default headers would keep only one value per name.
        for (name, value) in &self.headers {
            request = request.header(name.clone(), value.clone());
        }
        if !params.is_empty() {
            request = request.query(&params);
        }
        if !self.config.secret_id.is_empty() {
            request = request.header(TOKEN_HEADER, &self.config.secret_id);
        }
        if let Some(auth) = &self.config.http_auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }
        Ok(request)
    }

    /// Issues a GET request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails, the agent answers with
    /// a non-success status, or the body is not the expected JSON.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryOptions,
    ) -> Result<T, ClientError> {
        let response = self
            .request(Method::GET, endpoint, query)?
            .send()
            .map_err(|err| ClientError::Request(error_chain(&err)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        response.json().map_err(|err| ClientError::Decode(error_chain(&err)))
    }

    /// Lists the regions known to the cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails.
    pub fn regions(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/v1/regions", &QueryOptions::default())
    }

    /// Returns the address of the current Raft leader.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails.
    pub fn leader(&self) -> Result<String, ClientError> {
        self.get_json("/v1/status/leader", &QueryOptions::default())
    }

    /// Returns the agent's own configuration and member information.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request fails.
    pub fn agent_self(&self) -> Result<Value, ClientError> {
        self.get_json("/v1/agent/self", &QueryOptions::default())
    }
}

impl std::fmt::Debug for NomadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NomadClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .field("header_count", &self.headers.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses the agent address, accepting only http and https.
fn parse_address(address: &str) -> Result<Url, ClientError> {
    let url = Url::parse(address).map_err(|err| ClientError::InvalidAddress {
        address: address.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::UnsupportedScheme(other.to_string())),
    }
}

/// Converts configured headers into a reqwest header map.
///
/// Names or values that are not valid HTTP are dropped; values are never logged.
fn build_header_map(headers: &HeaderMultimap) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, values) in headers.iter() {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            warn!(header = name, "skipping header with invalid name");
            continue;
        };
        for value in values {
            if let Ok(header_value) = HeaderValue::from_str(value) {
                map.append(header_name.clone(), header_value);
            } else {
                warn!(header = name, "skipping header with invalid value");
            }
        }
    }
    map
}

/// Picks the per-request override, else the configured default, if non-empty.
fn scoped<'a>(override_value: Option<&'a str>, configured: &'a str) -> Option<&'a str> {
    match override_value {
        Some(value) if !value.is_empty() => Some(value),
        _ if !configured.is_empty() => Some(configured),
        _ => None,
    }
}

// crates/nomad-provider-config/src/resolver.rs
// ============================================================================
// Module: Config Resolver
// Description: Merge provider options and environment into a Nomad client.
// Purpose: The single place where precedence between settings is decided.
// Dependencies: tracing, crate::client, crate::config, crate::suppression
// ============================================================================

//! ## Overview
//! [`ConfigResolver`] performs one linear pass: determine environment
//! suppression, start from the environment-derived default configuration,
//! overlay the declared options, select the transport, and construct the
//! client. It is pure apart from the file reads made while loading TLS
//! material, and it never retries.
//!
//! Precedence:
//! - `address` and `secret_id` always come from the options.
//! - `region` comes from the options when set; otherwise the environment
//!   value survives unless `NOMAD_REGION` is suppressed.
//! - `namespace` has no option; the environment value survives unless
//!   `NOMAD_NAMESPACE` is suppressed.
//! - `http_auth` replaces the environment credentials only when non-empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;
use tracing::warn;

use crate::client::NomadClient;
use crate::config::ClientConfig;
use crate::config::HttpBasicAuth;
use crate::config::TlsConfig;
use crate::context::ExecutionContext;
use crate::env::EnvSource;
use crate::env::NOMAD_NAMESPACE_ENV;
use crate::env::NOMAD_REGION_ENV;
use crate::env::ProcessEnv;
use crate::error::ConfigurationError;
use crate::headers::HeaderMultimap;
use crate::options::HeaderEntry;
use crate::options::ProviderOptions;
use crate::suppression::EnvSuppression;
use crate::transport::TransportSettings;

// ============================================================================
// SECTION: Resolution Result
// ============================================================================

/// Outcome of a successful resolution: the configured client and its record.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Client built from the resolved configuration.
    client: NomadClient,
}

impl ProviderConfig {
    /// Returns the resolved configuration record.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    /// Returns the configured client.
    #[must_use]
    pub const fn client(&self) -> &NomadClient {
        &self.client
    }

    /// Consumes the result and returns the client.
    #[must_use]
    pub fn into_client(self) -> NomadClient {
        self.client
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves provider options into a configured [`NomadClient`].
///
/// # Invariants
/// - The environment is only read, never modified.
/// - Each call produces an independently owned client.
#[derive(Clone, Copy)]
pub struct ConfigResolver<'a> {
    /// Source of environment defaults.
    env: &'a dyn EnvSource,
    /// Ambient execution context.
    context: ExecutionContext,
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver over an explicit environment and context.
    #[must_use]
    pub const fn new(env: &'a dyn EnvSource, context: ExecutionContext) -> Self {
        Self {
            env,
            context,
        }
    }

    /// Returns the environment source defaults are read from.
    #[must_use]
    pub const fn env(&self) -> &'a dyn EnvSource {
        self.env
    }

    /// Determines which environment variables are ignored.
    #[must_use]
    pub fn suppression(&self, options: &ProviderOptions) -> EnvSuppression {
        EnvSuppression::determine(&options.ignore_env_vars, self.context)
    }

    /// Builds the configuration record without constructing a client.
    #[must_use]
    pub fn resolve_config(&self, options: &ProviderOptions) -> ClientConfig {
        let suppression = self.suppression(options);

        let mut config = ClientConfig::from_env(self.env);
        config.address.clone_from(&options.address);
        config.secret_id.clone_from(&options.secret_id);

        if let Some(region) = &options.region {
            config.region.clone_from(region);
        } else if suppression.is_ignored(NOMAD_REGION_ENV) {
            config.region.clear();
        }

        if suppression.is_ignored(NOMAD_NAMESPACE_ENV) {
            config.namespace.clear();
        }

        if let Some(auth) = HttpBasicAuth::parse(&options.http_auth) {
            config.http_auth = Some(auth);
        }

        config.tls = TlsConfig {
            ca_cert: options.ca_file.clone().unwrap_or_default(),
            client_cert: options.cert_file.clone().unwrap_or_default(),
            client_key: options.key_file.clone().unwrap_or_default(),
            ca_cert_pem: pem_bytes(options.ca_pem.as_deref()),
            client_cert_pem: pem_bytes(options.cert_pem.as_deref()),
            client_key_pem: pem_bytes(options.key_pem.as_deref()),
            insecure: options.skip_verify,
            ..config.tls
        };

        if self.context.acceptance {
            debug!("acceptance run: using non-pooled http transport");
            config.transport = TransportSettings::non_pooled();
        }

        config.headers = assemble_headers(&options.headers);
        config
    }

    /// Resolves options into a configured client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when client construction fails.
    pub fn resolve(&self, options: &ProviderOptions) -> Result<ProviderConfig, ConfigurationError> {
        let config = self.resolve_config(options);
        let client = NomadClient::new(config).map_err(|err| {
            warn!(error = %err, "nomad client construction failed");
            ConfigurationError::from(err)
        })?;
        debug!(
            address = %client.base_url(),
            region = %client.config().region,
            transport = client.config().transport.as_str(),
            "configured nomad api client"
        );
        Ok(ProviderConfig {
            client,
        })
    }
}

impl ConfigResolver<'static> {
    /// Creates a resolver over the process environment, detecting the
    /// execution context from its marker variables.
    #[must_use]
    pub fn from_process_env() -> Self {
        /// Shared process environment handle.
        static PROCESS_ENV: ProcessEnv = ProcessEnv;
        Self::new(&PROCESS_ENV, ExecutionContext::detect(&PROCESS_ENV))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts an optional PEM option into raw bytes.
fn pem_bytes(pem: Option<&str>) -> Vec<u8> {
    pem.map(|pem| pem.as_bytes().to_vec()).unwrap_or_default()
}

/// Builds the header multimap, skipping entries without a name or value.
fn assemble_headers(entries: &[HeaderEntry]) -> HeaderMultimap {
    let mut headers = HeaderMultimap::new();
    for entry in entries {
        if let (Some(name), Some(value)) = (&entry.name, &entry.value) {
            headers.append(name, value.as_str());
        }
    }
    headers
}

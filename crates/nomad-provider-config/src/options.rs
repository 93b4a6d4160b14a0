// crates/nomad-provider-config/src/options.rs
// ============================================================================
// Module: Provider Options
// Description: Typed provider block with environment defaults applied.
// Purpose: Parse and validate declared options once, at the boundary.
// Dependencies: serde, toml, crate::env, crate::schema
// ============================================================================

//! ## Overview
//! [`RawProviderOptions`] is the provider block exactly as declared (TOML or
//! any serde source). [`ProviderOptions::from_raw`] checks mutual exclusion,
//! fills absent options from their environment defaults, and produces the
//! typed [`ProviderOptions`] the resolver consumes.
//!
//! Invariants:
//! - For each of CA, client cert, and client key at most one of path or PEM
//!   is set after parsing.
//! - `address` is non-empty after parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::env::EnvSource;
use crate::env::NOMAD_ADDR_ENV;
use crate::env::NOMAD_CACERT_ENV;
use crate::env::NOMAD_CLIENT_CERT_ENV;
use crate::env::NOMAD_CLIENT_KEY_ENV;
use crate::env::NOMAD_HTTP_AUTH_ENV;
use crate::env::NOMAD_SKIP_VERIFY_ENV;
use crate::env::NOMAD_TOKEN_ENV;
use crate::env::parse_bool;
use crate::error::OptionsError;
use crate::schema::OPTION_DESCRIPTORS;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an options file in bytes.
pub const MAX_OPTIONS_FILE_BYTES: usize = 1024 * 1024;

/// Placeholder shown in place of secret values.
const REDACTED: &str = "<redacted>";

// ============================================================================
// SECTION: Raw Options
// ============================================================================

/// One entry of the `headers` option.
///
/// Entries without a name (or without a value) are kept here and dropped
/// during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderEntry {
    /// Header name.
    #[serde(default)]
    pub name: Option<String>,
    /// Header value.
    #[serde(default)]
    pub value: Option<String>,
}

impl HeaderEntry {
    /// Creates an entry with both name and value present.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

/// Provider block as declared, before environment defaults.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawProviderOptions {
    /// Agent address.
    pub address: Option<String>,
    /// Target region.
    pub region: Option<String>,
    /// Basic auth in `user[:password]` form.
    pub http_auth: Option<String>,
    /// CA certificate path.
    pub ca_file: Option<String>,
    /// Inline CA certificate PEM.
    pub ca_pem: Option<String>,
    /// Client certificate path.
    pub cert_file: Option<String>,
    /// Inline client certificate PEM.
    pub cert_pem: Option<String>,
    /// Client key path.
    pub key_file: Option<String>,
    /// Inline client key PEM.
    pub key_pem: Option<String>,
    /// ACL token secret.
    pub secret_id: Option<String>,
    /// Custom request headers.
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
    /// Environment variables to ignore.
    #[serde(default)]
    pub ignore_env_vars: BTreeMap<String, bool>,
    /// Skip TLS verification.
    pub skip_verify: Option<bool>,
}

impl RawProviderOptions {
    /// Parses a provider block from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(input: &str) -> Result<Self, OptionsError> {
        toml::from_str(input).map_err(|err| OptionsError::Parse(err.to_string()))
    }

    /// Reads and parses a provider block from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError`] when the file is unreadable, too large, not
    /// UTF-8, or not a valid provider block.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let file = File::open(path).map_err(|err| OptionsError::Io(err.to_string()))?;
        let limit = u64::try_from(MAX_OPTIONS_FILE_BYTES)
            .map_err(|_| OptionsError::Io("size limit exceeds u64".to_string()))?;
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| OptionsError::Io(err.to_string()))?;
        if bytes.len() > MAX_OPTIONS_FILE_BYTES {
            return Err(OptionsError::TooLarge);
        }
        let text = String::from_utf8(bytes).map_err(|_| OptionsError::NotUtf8)?;
        Self::from_toml_str(&text)
    }

    /// Returns true when the named option was explicitly declared.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        match name {
            "address" => self.address.is_some(),
            "region" => self.region.is_some(),
            "http_auth" => self.http_auth.is_some(),
            "ca_file" => self.ca_file.is_some(),
            "ca_pem" => self.ca_pem.is_some(),
            "cert_file" => self.cert_file.is_some(),
            "cert_pem" => self.cert_pem.is_some(),
            "key_file" => self.key_file.is_some(),
            "key_pem" => self.key_pem.is_some(),
            "secret_id" => self.secret_id.is_some(),
            "headers" => !self.headers.is_empty(),
            "ignore_env_vars" => !self.ignore_env_vars.is_empty(),
            "skip_verify" => self.skip_verify.is_some(),
            _ => false,
        }
    }

    /// Rejects declared options that are mutually exclusive.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Conflict`] for the first conflicting pair.
    pub fn validate_conflicts(&self) -> Result<(), OptionsError> {
        for descriptor in OPTION_DESCRIPTORS {
            if !self.is_set(descriptor.name) {
                continue;
            }
            if let Some(other) = descriptor.conflicts_with.iter().find(|other| self.is_set(other))
            {
                return Err(OptionsError::Conflict {
                    first: descriptor.name,
                    second: *other,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Typed Options
// ============================================================================

/// Validated provider options with environment defaults applied.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Agent address.
    pub address: String,
    /// Explicit region; `None` when unset or empty.
    pub region: Option<String>,
    /// Basic auth in `user[:password]` form; empty when unset.
    pub http_auth: String,
    /// CA certificate path.
    pub ca_file: Option<String>,
    /// Inline CA certificate PEM.
    pub ca_pem: Option<String>,
    /// Client certificate path.
    pub cert_file: Option<String>,
    /// Inline client certificate PEM.
    pub cert_pem: Option<String>,
    /// Client key path.
    pub key_file: Option<String>,
    /// Inline client key PEM.
    pub key_pem: Option<String>,
    /// ACL token secret; empty when unset.
    pub secret_id: String,
    /// Custom request headers as declared.
    pub headers: Vec<HeaderEntry>,
    /// Environment variables to ignore.
    pub ignore_env_vars: BTreeMap<String, bool>,
    /// Skip TLS verification.
    pub skip_verify: bool,
}

impl ProviderOptions {
    /// Creates options with only an address set.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Validates a raw provider block and applies environment defaults.
    ///
    /// File-path TLS options take their environment default only when the
    /// matching PEM option is absent.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError`] on conflicting options, a missing address, or
    /// an unparseable `NOMAD_SKIP_VERIFY`.
    pub fn from_raw(raw: RawProviderOptions, env: &dyn EnvSource) -> Result<Self, OptionsError> {
        raw.validate_conflicts()?;
        let address = match raw.address {
            Some(address) if !address.is_empty() => address,
            Some(_) => return Err(OptionsError::MissingAddress),
            None => env.non_empty(NOMAD_ADDR_ENV).ok_or(OptionsError::MissingAddress)?,
        };
        let skip_verify = match raw.skip_verify {
            Some(skip_verify) => skip_verify,
            None => env_bool(env, NOMAD_SKIP_VERIFY_ENV)?.unwrap_or(false),
        };
        let ca_file = path_option(raw.ca_file, raw.ca_pem.is_some(), env, NOMAD_CACERT_ENV);
        let cert_file =
            path_option(raw.cert_file, raw.cert_pem.is_some(), env, NOMAD_CLIENT_CERT_ENV);
        let key_file = path_option(raw.key_file, raw.key_pem.is_some(), env, NOMAD_CLIENT_KEY_ENV);
        Ok(Self {
            address,
            region: raw.region.filter(|region| !region.is_empty()),
            http_auth: raw
                .http_auth
                .or_else(|| env.non_empty(NOMAD_HTTP_AUTH_ENV))
                .unwrap_or_default(),
            ca_file,
            ca_pem: raw.ca_pem,
            cert_file,
            cert_pem: raw.cert_pem,
            key_file,
            key_pem: raw.key_pem,
            secret_id: raw.secret_id.or_else(|| env.non_empty(NOMAD_TOKEN_ENV)).unwrap_or_default(),
            headers: raw.headers,
            ignore_env_vars: raw.ignore_env_vars,
            skip_verify,
        })
    }

    /// Loads a TOML provider block and applies environment defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError`] when loading or validation fails.
    pub fn load(path: &Path, env: &dyn EnvSource) -> Result<Self, OptionsError> {
        Self::from_raw(RawProviderOptions::load(path)?, env)
    }
}

// ============================================================================
// SECTION: Debug
// ============================================================================

impl std::fmt::Debug for RawProviderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawProviderOptions")
            .field("address", &self.address)
            .field("region", &self.region)
            .field("http_auth", &self.http_auth.as_ref().map(|_| REDACTED))
            .field("ca_file", &self.ca_file)
            .field("cert_file", &self.cert_file)
            .field("key_file", &self.key_file)
            .field("key_pem", &self.key_pem.as_ref().map(|_| REDACTED))
            .field("secret_id", &self.secret_id.as_ref().map(|_| REDACTED))
            .field("headers", &self.headers.len())
            .field("ignore_env_vars", &self.ignore_env_vars)
            .field("skip_verify", &self.skip_verify)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("address", &self.address)
            .field("region", &self.region)
            .field("http_auth", &(!self.http_auth.is_empty()).then_some(REDACTED))
            .field("ca_file", &self.ca_file)
            .field("cert_file", &self.cert_file)
            .field("key_file", &self.key_file)
            .field("key_pem", &self.key_pem.as_ref().map(|_| REDACTED))
            .field("secret_id", &(!self.secret_id.is_empty()).then_some(REDACTED))
            .field("headers", &self.headers.len())
            .field("ignore_env_vars", &self.ignore_env_vars)
            .field("skip_verify", &self.skip_verify)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves a TLS path option, deferring to the env only without inline PEM.
fn path_option(
    explicit: Option<String>,
    pem_declared: bool,
    env: &dyn EnvSource,
    key: &str,
) -> Option<String> {
    if explicit.is_some() || pem_declared {
        return explicit;
    }
    env.non_empty(key)
}

/// Reads a strict boolean from the environment.
fn env_bool(env: &dyn EnvSource, key: &'static str) -> Result<Option<bool>, OptionsError> {
    env.non_empty(key)
        .map(|value| {
            parse_bool(&value).ok_or(OptionsError::InvalidBool {
                name: key,
                value,
            })
        })
        .transpose()
}

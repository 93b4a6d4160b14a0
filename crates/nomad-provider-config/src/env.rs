// crates/nomad-provider-config/src/env.rs
// ============================================================================
// Module: Environment Sources
// Description: Abstractions over process environment lookups.
// Purpose: Let resolution read defaults without touching global state in tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every environment read made during resolution goes through [`EnvSource`].
//! [`ProcessEnv`] reads the real process environment; [`MapEnv`] is a
//! deterministic override map for tests and embedding callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Variable Names
// ============================================================================

/// Address of the target Nomad agent.
pub const NOMAD_ADDR_ENV: &str = "NOMAD_ADDR";
/// Default region for API requests.
pub const NOMAD_REGION_ENV: &str = "NOMAD_REGION";
/// Default namespace for API requests.
pub const NOMAD_NAMESPACE_ENV: &str = "NOMAD_NAMESPACE";
/// ACL token secret.
pub const NOMAD_TOKEN_ENV: &str = "NOMAD_TOKEN";
/// HTTP basic auth in `user[:password]` form.
pub const NOMAD_HTTP_AUTH_ENV: &str = "NOMAD_HTTP_AUTH";
/// Path to a PEM-encoded CA certificate file.
pub const NOMAD_CACERT_ENV: &str = "NOMAD_CACERT";
/// Path to a directory of PEM-encoded CA certificates.
pub const NOMAD_CAPATH_ENV: &str = "NOMAD_CAPATH";
/// Path to a PEM-encoded client certificate.
pub const NOMAD_CLIENT_CERT_ENV: &str = "NOMAD_CLIENT_CERT";
/// Path to a PEM-encoded client private key.
pub const NOMAD_CLIENT_KEY_ENV: &str = "NOMAD_CLIENT_KEY";
/// Server name expected on the agent certificate.
pub const NOMAD_TLS_SERVER_NAME_ENV: &str = "NOMAD_TLS_SERVER_NAME";
/// Disables TLS verification when parsed as true.
pub const NOMAD_SKIP_VERIFY_ENV: &str = "NOMAD_SKIP_VERIFY";

// ============================================================================
// SECTION: Sources
// ============================================================================

/// Read-only view of environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when it is not set.
    ///
    /// A variable that is set to the empty string returns `Some("")`.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the value of `key` when it is set and non-empty.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }

    /// Returns true when `key` is set, even to the empty string.
    fn is_set(&self, key: &str) -> bool {
        self.var(key).is_some()
    }
}

/// Environment source backed by the live process environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

/// Environment source backed by an explicit key/value map.
///
/// # Invariants
/// - Lookups never consult the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    /// Variables visible through this source.
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Creates an empty environment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Returns this environment with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a boolean the way Nomad tooling accepts it from the environment.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts; anything else is rejected.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

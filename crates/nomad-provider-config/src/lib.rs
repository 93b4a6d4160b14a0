// crates/nomad-provider-config/src/lib.rs
// ============================================================================
// Module: Nomad Provider Config
// Description: Provider options, environment resolution, and API client setup.
// Purpose: Turn a declarative provider block into a configured Nomad client.
// Dependencies: reqwest, serde, thiserror, toml, tracing, url
// ============================================================================

//! ## Overview
//! This crate resolves a Nomad provider configuration block into a
//! ready-to-use API client. Explicit options, environment-variable defaults,
//! and security material (TLS, ACL token, basic auth, custom headers) are
//! merged once by [`ConfigResolver`] into a [`ClientConfig`], which is then
//! handed to [`NomadClient::new`].
//!
//! Invariants:
//! - Explicit `address` and `secret_id` always override the environment.
//! - Environment access goes through [`EnvSource`]; ambient markers are
//!   surfaced as an explicit [`ExecutionContext`].
//! - Resolution is all-or-nothing: a failure never yields a partial client.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod headers;
pub mod options;
pub mod resolver;
pub mod schema;
pub mod suppression;
mod tls;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::NomadClient;
pub use client::QueryOptions;
pub use config::ClientConfig;
pub use config::HttpBasicAuth;
pub use config::TlsConfig;
pub use context::ExecutionContext;
pub use env::EnvSource;
pub use env::MapEnv;
pub use env::ProcessEnv;
pub use error::ClientError;
pub use error::ConfigurationError;
pub use error::OptionsError;
pub use headers::HeaderMultimap;
pub use options::HeaderEntry;
pub use options::ProviderOptions;
pub use options::RawProviderOptions;
pub use resolver::ConfigResolver;
pub use resolver::ProviderConfig;
pub use schema::OPTION_DESCRIPTORS;
pub use schema::OptionDescriptor;
pub use schema::OptionKind;
pub use suppression::EnvSuppression;
pub use transport::TlsVersion;
pub use transport::TransportSettings;

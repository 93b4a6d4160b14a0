// crates/nomad-provider-config/src/error.rs
// ============================================================================
// Module: Errors
// Description: Error types for option parsing, client setup, and resolution.
// Purpose: Keep failure causes intact from the boundary to the caller.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`OptionsError`] reports problems with the declared provider block before
//! resolution starts. [`ClientError`] reports client construction and request
//! failures. [`ConfigurationError`] is the single error the resolver returns,
//! wrapping the [`ClientError`] that caused it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;

use thiserror::Error;

// ============================================================================
// SECTION: Options Errors
// ============================================================================

/// Errors raised while parsing and validating provider options.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Options file could not be read.
    #[error("options file io error: {0}")]
    Io(String),
    /// Options file exceeded the size limit.
    #[error("options file exceeds size limit")]
    TooLarge,
    /// Options file was not valid UTF-8.
    #[error("options file must be utf-8")]
    NotUtf8,
    /// Options document could not be parsed.
    #[error("options parse error: {0}")]
    Parse(String),
    /// Neither the `address` option nor its environment default was set.
    #[error("address is required: set `address` or NOMAD_ADDR")]
    MissingAddress,
    /// Two mutually exclusive options were both set.
    #[error("`{first}` conflicts with `{second}`")]
    Conflict {
        /// First option name.
        first: &'static str,
        /// Conflicting option name.
        second: &'static str,
    },
    /// An environment default could not be parsed as a boolean.
    #[error("invalid boolean in {name}: {value:?}")]
    InvalidBool {
        /// Environment variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Errors raised while building or using a [`crate::NomadClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Address did not parse as a URL.
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress {
        /// Address as configured.
        address: String,
        /// Parser failure description.
        reason: String,
    },
    /// Address used a scheme other than http or https.
    #[error("unsupported address scheme {0:?}")]
    UnsupportedScheme(String),
    /// TLS material file could not be read.
    #[error("failed to read {label} {path:?}: {source}")]
    ReadTlsFile {
        /// Kind of material being read.
        label: &'static str,
        /// Path as configured.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// TLS material could not be parsed or applied.
    #[error("invalid {label}: {reason}")]
    Tls {
        /// Kind of material being loaded.
        label: &'static str,
        /// Failure description.
        reason: String,
    },
    /// The HTTP transport could not be built.
    #[error("http client build failed: {0}")]
    Build(String),
    /// The request endpoint could not be joined to the address.
    #[error("invalid endpoint {0:?}")]
    InvalidEndpoint(String),
    /// The request failed before a response was received.
    #[error("request failed: {0}")]
    Request(String),
    /// The agent answered with a non-success status.
    #[error("unexpected response code: {status} ({body})")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Resolution Errors
// ============================================================================

/// The single error returned by [`crate::ConfigResolver::resolve`].
///
/// # Invariants
/// - Raised only when client construction fails.
/// - The message always identifies client configuration as the origin.
#[derive(Debug, Error)]
#[error("failed to configure Nomad API: {source}")]
pub struct ConfigurationError {
    /// Construction failure that caused this error.
    #[from]
    source: ClientError,
}

impl ConfigurationError {
    /// Returns the underlying construction failure.
    #[must_use]
    pub const fn client_error(&self) -> &ClientError {
        &self.source
    }

    /// Consumes the error and returns the underlying failure.
    #[must_use]
    pub fn into_client_error(self) -> ClientError {
        self.source
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders an error with its full source chain joined by `": "`.
pub(crate) fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        current = cause.source();
    }
    message
}

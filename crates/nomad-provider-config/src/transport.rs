// crates/nomad-provider-config/src/transport.rs
// ============================================================================
// Module: Transport Factory
// Description: Pooled and non-pooled HTTP transport settings.
// Purpose: Describe and apply the transport variant a client is built with.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Production clients use the pooled default transport unmodified. When many
//! clients are built back to back in one process (acceptance runs), reused
//! idle connections surface as spurious EOF failures, so a non-pooled variant
//! is used instead. The non-pooled variant also pins HTTP/1.1 because the
//! agent's exec and streaming endpoints do not work over HTTP/2 framing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::blocking::ClientBuilder;
use reqwest::tls::Version;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// TLS handshake timeout of the non-pooled transport.
pub const NON_POOLED_TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Minimum TLS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsVersion {
    /// TLS 1.2.
    Tls12,
}

impl TlsVersion {
    /// Returns a stable label for the version.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tls12 => "1.2",
        }
    }

    /// Returns the matching reqwest version.
    const fn to_reqwest(self) -> Version {
        match self {
            Self::Tls12 => Version::TLS_1_2,
        }
    }
}

/// Transport variant used by a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportSettings {
    /// Default pooled transport, applied without modification.
    #[default]
    Pooled,
    /// Fresh transport that keeps no idle connections.
    NonPooled {
        /// Upper bound on connection setup, TLS handshake included.
        tls_handshake_timeout: Duration,
        /// Lowest TLS version offered.
        min_tls_version: TlsVersion,
        /// Whether HTTP/2 may be negotiated.
        http2: bool,
    },
}

impl TransportSettings {
    /// Returns the non-pooled variant used for repeated instantiation.
    #[must_use]
    pub const fn non_pooled() -> Self {
        Self::NonPooled {
            tls_handshake_timeout: NON_POOLED_TLS_HANDSHAKE_TIMEOUT,
            min_tls_version: TlsVersion::Tls12,
            http2: false,
        }
    }

    /// Returns a stable label for the variant.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pooled => "pooled",
            Self::NonPooled {
                ..
            } => "non_pooled",
        }
    }

    /// Applies the variant to a client builder.
    ///
    /// reqwest has no separate handshake timeout; the connect timeout covers
    /// TCP connect and TLS handshake together.
    #[must_use]
    pub fn apply(&self, builder: ClientBuilder) -> ClientBuilder {
        match *self {
            Self::Pooled => builder,
            Self::NonPooled {
                tls_handshake_timeout,
                min_tls_version,
                http2,
            } => {
                let builder = builder
                    .pool_max_idle_per_host(0)
                    .connect_timeout(tls_handshake_timeout)
                    .min_tls_version(min_tls_version.to_reqwest());
                if http2 { builder } else { builder.http1_only() }
            }
        }
    }
}

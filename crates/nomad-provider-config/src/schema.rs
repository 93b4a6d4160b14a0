// crates/nomad-provider-config/src/schema.rs
// ============================================================================
// Module: Option Descriptors
// Description: Static description of every provider option.
// Purpose: Single source for option kinds, env defaults, and conflicts.
// Dependencies: crate::env
// ============================================================================

//! ## Overview
//! [`OPTION_DESCRIPTORS`] documents the provider block: the option names,
//! their kinds, which environment variable supplies a default, and which
//! options are mutually exclusive. Options validation reads the conflict
//! lists from here; the CLI renders the table as documentation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::env::NOMAD_ADDR_ENV;
use crate::env::NOMAD_CACERT_ENV;
use crate::env::NOMAD_CLIENT_CERT_ENV;
use crate::env::NOMAD_CLIENT_KEY_ENV;
use crate::env::NOMAD_HTTP_AUTH_ENV;
use crate::env::NOMAD_SKIP_VERIFY_ENV;
use crate::env::NOMAD_TOKEN_ENV;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Value kind of a provider option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Single string.
    String,
    /// Boolean flag.
    Bool,
    /// List of `{ name, value }` header entries.
    HeaderList,
    /// Map of names to booleans.
    BoolMap,
}

impl OptionKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::HeaderList => "list(header)",
            Self::BoolMap => "map(bool)",
        }
    }
}

/// Description of one provider option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDescriptor {
    /// Option name as written in the provider block.
    pub name: &'static str,
    /// Value kind.
    pub kind: OptionKind,
    /// True when resolution fails without a value.
    pub required: bool,
    /// Environment variable consulted when the option is absent.
    pub env_default: Option<&'static str>,
    /// Options that may not be set alongside this one.
    pub conflicts_with: &'static [&'static str],
    /// True when the value must not be displayed.
    pub sensitive: bool,
    /// Human-readable description.
    pub description: &'static str,
}

// ============================================================================
// SECTION: Descriptor Table
// ============================================================================

/// Every option accepted in the provider block, in documentation order.
pub const OPTION_DESCRIPTORS: &[OptionDescriptor] = &[
    OptionDescriptor {
        name: "address",
        kind: OptionKind::String,
        required: true,
        env_default: Some(NOMAD_ADDR_ENV),
        conflicts_with: &[],
        sensitive: false,
        description: "URL of the root of the target Nomad agent.",
    },
    OptionDescriptor {
        name: "region",
        kind: OptionKind::String,
        required: false,
        env_default: None,
        conflicts_with: &[],
        sensitive: false,
        description: "Region of the target Nomad agent.",
    },
    OptionDescriptor {
        name: "http_auth",
        kind: OptionKind::String,
        required: false,
        env_default: Some(NOMAD_HTTP_AUTH_ENV),
        conflicts_with: &[],
        sensitive: true,
        description: "HTTP basic auth configuration.",
    },
    OptionDescriptor {
        name: "ca_file",
        kind: OptionKind::String,
        required: false,
        env_default: Some(NOMAD_CACERT_ENV),
        conflicts_with: &["ca_pem"],
        sensitive: false,
        description: "A path to a PEM-encoded certificate authority used to verify the remote \
                      agent's certificate.",
    },
    OptionDescriptor {
        name: "ca_pem",
        kind: OptionKind::String,
        required: false,
        env_default: None,
        conflicts_with: &["ca_file"],
        sensitive: false,
        description: "PEM-encoded certificate authority used to verify the remote agent's \
                      certificate.",
    },
    OptionDescriptor {
        name: "cert_file",
        kind: OptionKind::String,
        required: false,
        env_default: Some(NOMAD_CLIENT_CERT_ENV),
        conflicts_with: &["cert_pem"],
        sensitive: false,
        description: "A path to a PEM-encoded certificate provided to the remote agent; requires \
                      use of key_file or key_pem.",
    },
    OptionDescriptor {
        name: "cert_pem",
        kind: OptionKind::String,
        required: false,
        env_default: None,
        conflicts_with: &["cert_file"],
        sensitive: false,
        description: "PEM-encoded certificate provided to the remote agent; requires use of \
                      key_file or key_pem.",
    },
    OptionDescriptor {
        name: "key_file",
        kind: OptionKind::String,
        required: false,
        env_default: Some(NOMAD_CLIENT_KEY_ENV),
        conflicts_with: &["key_pem"],
        sensitive: false,
        description: "A path to a PEM-encoded private key, required if cert_file or cert_pem is \
                      specified.",
    },
    OptionDescriptor {
        name: "key_pem",
        kind: OptionKind::String,
        required: false,
        env_default: None,
        conflicts_with: &["key_file"],
        sensitive: true,
        description: "PEM-encoded private key, required if cert_file or cert_pem is specified.",
    },
    OptionDescriptor {
        name: "secret_id",
        kind: OptionKind::String,
        required: false,
        env_default: Some(NOMAD_TOKEN_ENV),
        conflicts_with: &[],
        sensitive: true,
        description: "ACL token secret for API requests.",
    },
    OptionDescriptor {
        name: "headers",
        kind: OptionKind::HeaderList,
        required: false,
        env_default: None,
        conflicts_with: &[],
        sensitive: true,
        description: "The headers to send with each Nomad request.",
    },
    OptionDescriptor {
        name: "ignore_env_vars",
        kind: OptionKind::BoolMap,
        required: false,
        env_default: None,
        conflicts_with: &[],
        sensitive: false,
        description: "A set of environment variables that are ignored by the provider when \
                      configuring the Nomad API client.",
    },
    OptionDescriptor {
        name: "skip_verify",
        kind: OptionKind::Bool,
        required: false,
        env_default: Some(NOMAD_SKIP_VERIFY_ENV),
        conflicts_with: &[],
        sensitive: false,
        description: "Skip TLS verification on client side.",
    },
];

/// Looks up the descriptor for `name`.
#[must_use]
pub fn descriptor(name: &str) -> Option<&'static OptionDescriptor> {
    OPTION_DESCRIPTORS.iter().find(|descriptor| descriptor.name == name)
}

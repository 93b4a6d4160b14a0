// crates/nomad-provider-config/src/suppression.rs
// ============================================================================
// Module: Environment Suppression
// Description: Table of environment variables the resolver must ignore.
// Purpose: Stop inherited namespace/region variables from scoping the client.
// Dependencies: crate::context, crate::env, tracing
// ============================================================================

//! ## Overview
//! The `ignore_env_vars` option names variables whose environment-derived
//! values must be discarded. Only `NOMAD_NAMESPACE` and `NOMAD_REGION` have
//! an effect; other names are kept but never consulted. When the option is
//! empty inside a remote run, both recognized names are ignored by default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use tracing::debug;

use crate::context::ExecutionContext;
use crate::context::REMOTE_RUN_MARKER_ENV;
use crate::env::NOMAD_NAMESPACE_ENV;
use crate::env::NOMAD_REGION_ENV;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Variable names that suppression can act on.
pub const RECOGNIZED_ENV_VARS: [&str; 2] = [NOMAD_NAMESPACE_ENV, NOMAD_REGION_ENV];

// ============================================================================
// SECTION: Suppression Table
// ============================================================================

/// Per-resolution set of ignored environment variables.
///
/// # Invariants
/// - Computed once per resolution and never persisted.
/// - A name is ignored only when present with the value `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSuppression {
    /// Variable name to ignore flag.
    entries: BTreeMap<String, bool>,
}

impl EnvSuppression {
    /// Builds the table from the option value and execution context.
    #[must_use]
    pub fn determine(ignore_env_vars: &BTreeMap<String, bool>, context: ExecutionContext) -> Self {
        if ignore_env_vars.is_empty() && context.remote_run {
            debug!(
                marker = REMOTE_RUN_MARKER_ENV,
                "ignoring namespace and region environment variables inside remote run"
            );
            return Self::remote_run_defaults();
        }
        for name in ignore_env_vars.keys() {
            if !RECOGNIZED_ENV_VARS.contains(&name.as_str()) {
                debug!(name = %name, "ignore_env_vars entry has no effect");
            }
        }
        Self {
            entries: ignore_env_vars.clone(),
        }
    }

    /// Returns the table synthesized for remote runs.
    #[must_use]
    pub fn remote_run_defaults() -> Self {
        Self {
            entries: RECOGNIZED_ENV_VARS.iter().map(|name| ((*name).to_string(), true)).collect(),
        }
    }

    /// Returns true when `name` is marked as ignored.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.entries.get(name).copied().unwrap_or(false)
    }

    /// Returns true when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the raw entries in name order.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, bool> {
        &self.entries
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

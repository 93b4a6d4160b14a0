// crates/nomad-provider-config/src/context.rs
// ============================================================================
// Module: Execution Context
// Description: Explicit description of the ambient run environment.
// Purpose: Keep marker-variable detection out of the resolver core.
// Dependencies: crate::env
// ============================================================================

//! ## Overview
//! Two hosting environments change resolution: a managed remote run, whose
//! orchestrator may export its own namespace and region, and an acceptance
//! test run, which builds many clients back to back. Callers either build an
//! [`ExecutionContext`] directly or detect it from marker variables.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::env::EnvSource;

// ============================================================================
// SECTION: Marker Variables
// ============================================================================

/// Set (non-empty) inside a managed remote run.
pub const REMOTE_RUN_MARKER_ENV: &str = "TFC_RUN_ID";
/// Set (any value) while acceptance tests execute.
pub const ACCEPTANCE_MARKER_ENV: &str = "TF_ACC";

// ============================================================================
// SECTION: Context
// ============================================================================

/// Ambient execution context for a resolution.
///
/// The two markers are independent, so both may be active at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Running inside a managed remote run.
    pub remote_run: bool,
    /// Running under the acceptance test harness.
    pub acceptance: bool,
}

impl ExecutionContext {
    /// Plain execution: no markers active.
    pub const STANDARD: Self = Self {
        remote_run: false,
        acceptance: false,
    };

    /// Remote-run execution only.
    pub const REMOTE_RUN: Self = Self {
        remote_run: true,
        acceptance: false,
    };

    /// Acceptance-test execution only.
    pub const ACCEPTANCE: Self = Self {
        remote_run: false,
        acceptance: true,
    };

    /// Detects the context from marker variables.
    ///
    /// The remote-run marker counts only when non-empty; the acceptance
    /// marker counts whenever it is set.
    #[must_use]
    pub fn detect(env: &dyn EnvSource) -> Self {
        Self {
            remote_run: env.non_empty(REMOTE_RUN_MARKER_ENV).is_some(),
            acceptance: env.is_set(ACCEPTANCE_MARKER_ENV),
        }
    }
}

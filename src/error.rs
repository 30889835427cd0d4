// src/error.rs
//! Error taxonomy for the acquisition pipeline.
//!
//! Source-level variants are always absorbed at the client boundary (the caller
//! substitutes per-field defaults). `ReconciliationFailure` is absorbed by the
//! reconciler, which swaps in the static fallback model and raises a warning.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// Network error or non-2xx HTTP status.
    #[error("source '{source_name}' unavailable: {reason}")]
    SourceUnavailable {
        source_name: &'static str,
        reason: String,
    },

    #[error("source '{source_name}' timed out after {after_ms} ms")]
    Timeout {
        source_name: &'static str,
        after_ms: u64,
    },

    /// Body arrived but lacks the `records` structure we consult.
    #[error("source '{source_name}' returned a malformed response: {reason}")]
    MalformedResponse {
        source_name: &'static str,
        reason: String,
    },

    /// A normalized metric set violated its own contract during the merge.
    #[error("reconciliation failed: {0}")]
    ReconciliationFailure(String),
}

impl DashboardError {
    /// Short label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::SourceUnavailable { .. } => "unavailable",
            DashboardError::Timeout { .. } => "timeout",
            DashboardError::MalformedResponse { .. } => "malformed",
            DashboardError::ReconciliationFailure(_) => "reconciliation",
        }
    }
}

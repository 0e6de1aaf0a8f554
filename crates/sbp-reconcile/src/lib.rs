//! sbp-reconcile
//!
//! The reconciliation core: one-pass diff/apply of proxy broker
//! registrations ([`ReconciliationTask`]) and the per-plan access-visibility
//! state machine ([`AccessVisibilityReconciler`]).
//!
//! Processing is strictly sequential: one broker at a time, one plan at a
//! time within access reconciliation. That trades throughput for
//! deterministic error attribution and simple reasoning about partial
//! failure. Nothing is cached across passes; each pass recomputes its view
//! from the injected collaborators.

pub mod access;
pub mod task;
pub mod tracker;

pub use access::{AccessError, AccessVisibilityReconciler};
pub use task::{PassError, PassSummary, ReconciliationTask};
pub use tracker::{RunGuard, RunTracker};

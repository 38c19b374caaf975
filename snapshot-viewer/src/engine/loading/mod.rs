//! Startup loading pipeline for the snapshot sequence.
//!
//! Backdrop first, then the manifest, then every snapshot at once. The batch
//! is joined all-or-nothing; any failure is terminal for the session.

/// Backdrop cubemap request and failure policy.
pub mod backdrop_loader;

/// All-or-nothing join over per-snapshot load states.
pub mod batch_join;

/// Error taxonomy for startup failures.
pub mod error;

/// Manifest fetch or pattern expansion, ordering, and snapshot fan-out.
pub mod manifest_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;

/// Batch polling, scene selection and snapshot spawning.
pub mod snapshot_loader;

/// Instance readiness, warm-up frames and hand-over to the running viewer.
pub mod warm_up;

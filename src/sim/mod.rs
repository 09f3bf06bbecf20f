//! Discrete-event simulation core.

pub mod dispatch;
pub mod engine;
/// Time-ordered event queue with deterministic tie-breaking.
pub mod queue;
pub mod registry;
/// Post-run summary metrics.
pub mod report;
/// Memoized travel-cost computation.
pub mod spatial;

use thiserror::Error;

/// The one failure the controller surfaces to callers.
///
/// Lookup misses (unknown owner ids, dismiss targets that are already gone)
/// are benign: they degrade to no-ops and are reported through the observer
/// instead of the return value. Queue emptiness is typed so callers can
/// build "show next or fall back" chains on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("navigation queue is empty")]
    EmptyQueue,
}

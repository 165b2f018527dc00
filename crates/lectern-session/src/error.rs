//! Session error types.
//!
//! The taxonomy mirrors how each failure is allowed to propagate: signaling
//! failures surface to the consumer, recording and media failures are
//! absorbed after logging, and none of them may leave roster, share, or
//! message invariants violated.

use thiserror::Error;

/// Errors from session operations and collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The signaling collaborator rejected a join or leave.
    #[error("signaling failure: {0}")]
    Signaling(String),

    /// The recording service rejected or failed a request. Clears the
    /// pending flag, leaves the recording flag unchanged.
    #[error("recording request failed: {0}")]
    Recording(String),

    /// The media collaborator could not attach, subscribe, or detach a
    /// rendering target. Logged and skipped; roster stays authoritative.
    #[error("media attach failed: {0}")]
    MediaAttach(String),

    /// The session runtime has shut down and no longer accepts commands.
    #[error("session closed")]
    Closed,
}

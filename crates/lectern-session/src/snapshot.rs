//! Observable session state.
//!
//! [`SessionSnapshot`] is the immutable point-in-time view the coordinator
//! exposes; consumers never touch coordinator internals. [`SnapshotFeed`]
//! republishes snapshots over a watch channel so any number of consumers
//! (renderers, tests) can observe changes without shared mutation.

use lectern_core::{ChatMessage, ParticipantId, QualityBucket, QualityTier, RosterSnapshot, ShareState};
use serde::Serialize;
use tokio::sync::watch;

/// Session lifecycle phase.
///
/// `Joined` is the only phase in which roster, share, and message
/// mutations are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// Session not yet activated.
    NotJoined,
    /// Join call in flight.
    Joining,
    /// In the room; events are being applied.
    Joined,
    /// Leave call in flight; no further mutations accepted.
    Leaving,
    /// Session over. Snapshots remain queryable but are stale.
    Left,
}

/// User-visible notification from the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionNotice {
    /// The join call was rejected.
    JoinFailed {
        /// Collaborator-reported reason.
        reason: String,
    },
    /// We left the classroom.
    Left,
    /// The leave call was rejected; the session exited locally anyway.
    LeaveFailed {
        /// Collaborator-reported reason.
        reason: String,
    },
    /// A screen share started.
    ShareStarted {
        /// Identity of the sharer.
        sharer: ParticipantId,
    },
    /// A screen share ended.
    ShareEnded {
        /// Identity of the sharer that stopped.
        sharer: ParticipantId,
    },
}

/// Immutable point-in-time view of the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Lifecycle phase at snapshot time.
    pub phase: SessionPhase,
    /// Roster view, split by role.
    pub roster: RosterSnapshot,
    /// Screen-share state.
    pub share: ShareState,
    /// Full ordered chat log.
    pub messages: Vec<ChatMessage>,
    /// Latest raw quality tier.
    pub quality_tier: QualityTier,
    /// Display bucket for the latest tier.
    pub quality: QualityBucket,
    /// Whether the channel is being recorded.
    pub recording: bool,
    /// Whether a recording request is in flight.
    pub recording_pending: bool,
    /// Most recent user-visible notice, if any.
    pub notice: Option<SessionNotice>,
    /// Set once the session has left; the data is a last known view.
    pub stale: bool,
}

/// Watch-channel change feed of session snapshots.
///
/// The runtime owns the sender half; consumers hold cheap clones of the
/// receiver and either poll `borrow()` or await `changed()`.
#[derive(Debug)]
pub struct SnapshotFeed {
    tx: watch::Sender<SessionSnapshot>,
}

impl SnapshotFeed {
    /// Create a feed seeded with the initial snapshot.
    pub fn new(initial: SessionSnapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the current snapshot and wake subscribers.
    pub fn publish(&self, snapshot: SessionSnapshot) {
        // send_replace never fails even with zero subscribers.
        let _ = self.tx.send_replace(snapshot);
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}

//! Screen-share state machine.
//!
//! Tracks whether the local session is sharing, whether a remote share is
//! active, and whose. The share always renders into the single reserved
//! [`SHARE_SLOT`], never into a per-participant camera target; the tracker
//! is the only component allowed to direct media at that slot.
//!
//! The local toggle is a strict flip that does not consult remote share
//! state before acting, matching the signaling contract: conflicting
//! local/remote shares are resolved by whichever wire event lands last.

use serde::Serialize;

use crate::roster::{ParticipantId, StreamId};

/// The reserved stream slot screen-share content renders into.
pub const SHARE_SLOT: StreamId = 2;

/// Current screen-share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShareState {
    /// Nothing is being shared.
    Idle,
    /// This session is sharing its screen.
    LocalSharing,
    /// A remote participant is sharing.
    RemoteSharing {
        /// Identity of the remote sharer.
        sharer: ParticipantId,
    },
}

/// Media side effects the tracker asks the caller to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareEffect {
    /// Begin local capture and announce the share.
    StartLocal,
    /// Stop local capture and announce the end of the share.
    StopLocal,
    /// Attach local capture to the share slot.
    AttachLocal,
    /// Subscribe the share slot to a remote sharer's stream.
    SubscribeRemote {
        /// Identity of the remote sharer.
        sharer: ParticipantId,
    },
    /// Clear the share slot's rendering target.
    ClearSlot,
}

/// Screen-share state tracker.
#[derive(Debug, Clone, Copy)]
pub struct ShareTracker {
    state: ShareState,
}

impl Default for ShareTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ShareTracker {
    /// Create a tracker in the idle state.
    pub fn new() -> Self {
        Self { state: ShareState::Idle }
    }

    /// Current state.
    pub fn state(&self) -> ShareState {
        self.state
    }

    /// Flip the local share.
    ///
    /// `LocalSharing` stops; any other state starts. A remote share in
    /// progress is not consulted.
    pub fn toggle_local(&mut self) -> ShareEffect {
        match self.state() {
            ShareState::LocalSharing => {
                self.state = ShareState::Idle;
                ShareEffect::StopLocal
            },
            ShareState::Idle | ShareState::RemoteSharing { .. } => {
                self.state = ShareState::LocalSharing;
                ShareEffect::StartLocal
            },
        }
    }

    /// Wire `share-started` event.
    ///
    /// The local echo attaches capture to the slot; any other sharer moves
    /// to `RemoteSharing` regardless of prior state and subscribes the slot.
    pub fn on_started(&mut self, sharer: ParticipantId, own_id: ParticipantId) -> ShareEffect {
        if sharer == own_id {
            self.state = ShareState::LocalSharing;
            ShareEffect::AttachLocal
        } else {
            self.state = ShareState::RemoteSharing { sharer };
            ShareEffect::SubscribeRemote { sharer }
        }
    }

    /// Wire `share-ended` event.
    ///
    /// Always lands in `Idle` and clears the slot, even when nothing was
    /// known to be active.
    pub fn on_ended(&mut self) -> ShareEffect {
        self.state = ShareState::Idle;
        ShareEffect::ClearSlot
    }
}

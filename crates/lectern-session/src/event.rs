//! Session input events.
//!
//! [`SessionEvent`] is the single tagged union the coordinator ingests.
//! Events originate from three sources, all serialized onto one queue:
//!
//! - The signaling collaborator (participants, shares, chat).
//! - The media-quality collaborator (quality samples, engine errors).
//! - The runtime itself (join/leave completions, recording outcomes).

use lectern_core::{ParticipantId, QualityTier, Role, StreamId};

/// Events processed by the session coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A participant joined the room.
    ParticipantAdded {
        /// Session-unique identity.
        id: ParticipantId,
        /// Role in the classroom.
        role: Role,
        /// Name shown on the participant's tile.
        display_name: String,
        /// Camera stream handle. `None` while still pending.
        stream: Option<StreamId>,
    },

    /// A participant left the room.
    ParticipantRemoved {
        /// Session-unique identity.
        id: ParticipantId,
        /// Role the participant held.
        role: Role,
    },

    /// A screen share began.
    ShareStarted {
        /// Reserved share slot the content renders into.
        slot: StreamId,
        /// Identity of the sharer; may be our own echo.
        sharer: ParticipantId,
    },

    /// A screen share ended.
    ShareEnded {
        /// Reserved share slot that was in use.
        slot: StreamId,
        /// Identity of the sharer that stopped.
        sharer: ParticipantId,
    },

    /// A chat message arrived on the channel.
    ChatMessage {
        /// Message body.
        text: String,
        /// Sender identity.
        sender: ParticipantId,
        /// Sender display name.
        sender_name: String,
        /// Sender role.
        sender_role: Role,
        /// Wire timestamp in milliseconds.
        timestamp_ms: u64,
    },

    /// Periodic network quality sample. Only the latest is retained.
    NetworkQuality {
        /// Raw 0-6 quality tier.
        tier: QualityTier,
    },

    /// Non-fatal media engine error. Logged, never alters session state.
    MediaError {
        /// Engine error code.
        code: i32,
        /// Engine error description.
        message: String,
    },

    /// The outbound join call completed successfully.
    JoinSucceeded,

    /// The outbound join call was rejected.
    JoinFailed {
        /// Collaborator-reported reason.
        reason: String,
    },

    /// The outbound leave call completed successfully.
    LeaveSucceeded,

    /// The outbound leave call was rejected. Local state still leaves.
    LeaveFailed {
        /// Collaborator-reported reason.
        reason: String,
    },

    /// A delegated recording request resolved.
    RecordingFinished {
        /// `true` for a start request, `false` for a stop request.
        start: bool,
        /// Whether the recording service accepted the request.
        ok: bool,
    },
}

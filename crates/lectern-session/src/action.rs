//! Session side effects.
//!
//! The coordinator is a pure state machine: every event or command returns
//! a list of [`SessionAction`] instructions for the runtime to execute
//! against the external collaborators.

use lectern_core::{ParticipantId, StreamId};

/// Actions produced by the session coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Publish a fresh snapshot to subscribers.
    Publish,

    /// Issue a command to the signaling collaborator.
    Signal(SignalDirective),

    /// Direct the media collaborator at the share slot.
    Media(MediaDirective),

    /// Issue a fire-and-forget request to the recording service.
    Record(RecordingDirective),
}

/// Commands issued to the signaling collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalDirective {
    /// Join the session. The runtime reports the outcome back as a
    /// join-completion event.
    Join,
    /// Leave the session. Outcome reported back as a leave-completion
    /// event; local state leaves either way.
    Leave,
    /// Broadcast a chat message on the data channel.
    Broadcast {
        /// Message body, already validated non-blank.
        text: String,
    },
    /// Announce the start of the local screen share.
    StartSharing,
    /// Announce the end of the local screen share.
    StopSharing,
    /// Initialize the media data channel after a successful join.
    InitDataChannel,
    /// Reserve share resources at activation.
    PrepareSharing,
    /// Release share resources at teardown, before leaving.
    DestructSharing,
}

/// Rendering directives for the media collaborator.
///
/// All of them address the single reserved share slot; camera streams are
/// never routed through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDirective {
    /// Attach local capture to the share slot.
    AttachLocal {
        /// Target slot.
        slot: StreamId,
    },
    /// Subscribe the share slot to a remote sharer's stream.
    Subscribe {
        /// Identity of the remote sharer.
        sharer: ParticipantId,
        /// Target slot.
        slot: StreamId,
    },
    /// Clear the share slot's rendering target.
    Detach {
        /// Target slot.
        slot: StreamId,
    },
}

/// Requests to the delegated recording service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingDirective {
    /// Ask the service to start recording the channel.
    Start,
    /// Ask the service to stop recording the channel.
    Stop,
}

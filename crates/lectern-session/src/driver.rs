//! Collaborator traits at the session boundary.
//!
//! The coordinator never performs I/O; the runtime executes its actions
//! against these traits. Production wires them to the real signaling
//! client, media engine, and recording endpoint; tests substitute fakes.

use std::future::Future;

use lectern_core::{ParticipantId, StreamId};

use crate::error::SessionError;

/// The signaling collaborator: room membership, messaging, and share
/// announcements.
///
/// Only `join` and `leave` suspend; everything else is fire-and-forget
/// from the coordinator's point of view.
pub trait SignalingClient: Send {
    /// Join the session. Resolves once the collaborator accepts or
    /// rejects us.
    fn join(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Leave the session.
    fn leave(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Broadcast a chat message on the data channel.
    fn broadcast(&mut self, text: &str);

    /// Announce the start of the local screen share.
    fn start_sharing(&mut self);

    /// Announce the end of the local screen share.
    fn stop_sharing(&mut self);

    /// Initialize the media data channel after a successful join.
    fn init_data_channel(&mut self);

    /// Reserve share resources ahead of any share.
    fn prepare_sharing(&mut self);

    /// Release share resources at teardown.
    fn destruct_sharing(&mut self);
}

/// The media collaborator: rendering attachment for the share slot.
///
/// Failures are reported but never fatal; the roster remains the source
/// of truth independent of rendering success.
pub trait MediaEngine: Send {
    /// Attach local screen capture to the given slot.
    fn attach_local(&mut self, slot: StreamId) -> Result<(), SessionError>;

    /// Subscribe the given slot to a remote sharer's stream.
    fn subscribe_remote(
        &mut self,
        sharer: ParticipantId,
        slot: StreamId,
    ) -> Result<(), SessionError>;

    /// Clear the given slot's rendering target.
    fn detach(&mut self, slot: StreamId) -> Result<(), SessionError>;
}

/// Body of a delegated recording request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingRequest {
    /// Application id.
    pub app_id: String,
    /// Channel (classroom) name.
    pub channel: String,
    /// Our own identity.
    pub uid: ParticipantId,
}

/// The delegated recording service.
///
/// Requests are fire-and-forget for the session: the runtime spawns them
/// and feeds the boolean outcome back in as an event. `Clone` so each
/// in-flight request can own its own handle, like an HTTP client.
pub trait RecordingService: Clone + Send + Sync + 'static {
    /// Ask the service to start recording the channel.
    fn start(
        &self,
        request: RecordingRequest,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Ask the service to stop recording the channel.
    fn stop(
        &self,
        request: RecordingRequest,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;
}

//! Async session runtime.
//!
//! The runtime owns the [`Coordinator`] and drives it: consumer commands
//! and collaborator events are serialized onto channels and processed one
//! at a time, so no component state is ever mutated concurrently. Actions
//! returned by the coordinator are executed against the collaborator
//! traits; `Publish` actions push a fresh snapshot into the watch feed.
//!
//! Recording requests are the one exception to inline execution: they are
//! spawned fire-and-forget and their outcome re-enters the event queue,
//! so a slow recording endpoint never stalls event processing.

use tokio::sync::{mpsc, watch};

use crate::{
    action::{MediaDirective, RecordingDirective, SessionAction, SignalDirective},
    config::SessionConfig,
    coordinator::Coordinator,
    driver::{MediaEngine, RecordingRequest, RecordingService, SignalingClient},
    error::SessionError,
    event::SessionEvent,
    snapshot::{SessionPhase, SessionSnapshot, SnapshotFeed},
};

/// Queue depth for collaborator events.
const EVENT_QUEUE_DEPTH: usize = 64;

/// Queue depth for consumer commands.
const COMMAND_QUEUE_DEPTH: usize = 16;

/// Consumer-initiated commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Broadcast a chat message.
    SendMessage {
        /// Message body.
        text: String,
    },
    /// Flip the local screen share.
    ToggleShare,
    /// Start recording the channel.
    StartRecording,
    /// Stop recording the channel.
    StopRecording,
    /// Leave the classroom.
    Leave,
}

/// Consumer handle to a running session.
///
/// Cheap to clone; all clones talk to the same runtime.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    events: mpsc::Sender<SessionEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Broadcast a chat message.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.command(SessionCommand::SendMessage { text: text.into() }).await
    }

    /// Flip the local screen share.
    pub async fn toggle_share(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::ToggleShare).await
    }

    /// Start recording the channel.
    pub async fn start_recording(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::StartRecording).await
    }

    /// Stop recording the channel.
    pub async fn stop_recording(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::StopRecording).await
    }

    /// Leave the classroom.
    pub async fn leave(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::Leave).await
    }

    /// Sender for collaborator events.
    ///
    /// The signaling and media-quality collaborators push their wire
    /// events here; delivery order is preserved per sender.
    pub fn event_sender(&self) -> mpsc::Sender<SessionEvent> {
        self.events.clone()
    }

    /// Subscribe to snapshot changes.
    pub fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    async fn command(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands.send(command).await.map_err(|_| SessionError::Closed)
    }
}

/// Session runtime orchestrating coordinator and collaborators.
pub struct Runtime<S, M, R>
where
    S: SignalingClient,
    M: MediaEngine,
    R: RecordingService,
{
    coordinator: Coordinator,
    signaling: S,
    media: M,
    recorder: R,
    feed: SnapshotFeed,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
    commands_rx: mpsc::Receiver<SessionCommand>,
}

impl<S, M, R> Runtime<S, M, R>
where
    S: SignalingClient,
    M: MediaEngine,
    R: RecordingService,
{
    /// Create a runtime and the handle consumers use to reach it.
    pub fn new(
        config: SessionConfig,
        signaling: S,
        media: M,
        recorder: R,
    ) -> (Self, SessionHandle) {
        let coordinator = Coordinator::new(config);
        let feed = SnapshotFeed::new(coordinator.snapshot());
        let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);

        let handle = SessionHandle {
            commands: commands_tx,
            events: events_tx.clone(),
            snapshots: feed.subscribe(),
        };

        let runtime =
            Runtime { coordinator, signaling, media, recorder, feed, events_tx, events_rx, commands_rx };

        (runtime, handle)
    }

    /// Run the session to completion.
    ///
    /// Joins on entry, then serializes commands and events through the
    /// coordinator until the session reaches `Left`.
    pub async fn run(mut self) {
        let actions = self.coordinator.activate();
        self.execute(actions).await;

        while self.coordinator.phase() != SessionPhase::Left {
            let actions = tokio::select! {
                Some(command) = self.commands_rx.recv() => self.dispatch(command),
                Some(event) = self.events_rx.recv() => self.coordinator.handle(event),
                else => break,
            };
            self.execute(actions).await;
        }

        // Final state for late subscribers.
        self.feed.publish(self.coordinator.snapshot());
    }

    fn dispatch(&mut self, command: SessionCommand) -> Vec<SessionAction> {
        match command {
            SessionCommand::SendMessage { text } => self.coordinator.send_message(&text),
            SessionCommand::ToggleShare => self.coordinator.toggle_share(),
            SessionCommand::StartRecording => self.coordinator.start_recording(),
            SessionCommand::StopRecording => self.coordinator.stop_recording(),
            SessionCommand::Leave => self.coordinator.deactivate(),
        }
    }

    /// Execute actions, feeding any follow-up events straight back into
    /// the coordinator until the action list drains.
    async fn execute(&mut self, initial: Vec<SessionAction>) {
        let mut pending = initial;
        while !pending.is_empty() {
            for action in std::mem::take(&mut pending) {
                match action {
                    SessionAction::Publish => {
                        self.feed.publish(self.coordinator.snapshot());
                    },
                    SessionAction::Signal(directive) => {
                        if let Some(event) = self.signal(directive).await {
                            pending.extend(self.coordinator.handle(event));
                        }
                    },
                    SessionAction::Media(directive) => self.apply_media(directive),
                    SessionAction::Record(directive) => self.record(directive),
                }
            }
        }
    }

    /// Issue a signaling directive. Join and leave resolve to follow-up
    /// events; the rest complete immediately.
    async fn signal(&mut self, directive: SignalDirective) -> Option<SessionEvent> {
        match directive {
            SignalDirective::Join => Some(match self.signaling.join().await {
                Ok(()) => SessionEvent::JoinSucceeded,
                Err(error) => SessionEvent::JoinFailed { reason: error.to_string() },
            }),
            SignalDirective::Leave => Some(match self.signaling.leave().await {
                Ok(()) => SessionEvent::LeaveSucceeded,
                Err(error) => SessionEvent::LeaveFailed { reason: error.to_string() },
            }),
            SignalDirective::Broadcast { text } => {
                self.signaling.broadcast(&text);
                None
            },
            SignalDirective::StartSharing => {
                self.signaling.start_sharing();
                None
            },
            SignalDirective::StopSharing => {
                self.signaling.stop_sharing();
                None
            },
            SignalDirective::InitDataChannel => {
                self.signaling.init_data_channel();
                None
            },
            SignalDirective::PrepareSharing => {
                self.signaling.prepare_sharing();
                None
            },
            SignalDirective::DestructSharing => {
                self.signaling.destruct_sharing();
                None
            },
        }
    }

    /// Execute a media directive. Attach failures are logged and skipped;
    /// the roster stays authoritative regardless of rendering success.
    fn apply_media(&mut self, directive: MediaDirective) {
        let result = match directive {
            MediaDirective::AttachLocal { slot } => self.media.attach_local(slot),
            MediaDirective::Subscribe { sharer, slot } => self.media.subscribe_remote(sharer, slot),
            MediaDirective::Detach { slot } => self.media.detach(slot),
        };
        if let Err(error) = result {
            tracing::warn!(%error, ?directive, "media directive failed");
        }
    }

    /// Spawn a recording request. The outcome re-enters the event queue;
    /// if the session has left by then, the coordinator ignores it.
    fn record(&mut self, directive: RecordingDirective) {
        let config = self.coordinator.config();
        let request = RecordingRequest {
            app_id: config.app_id.clone(),
            channel: config.channel.clone(),
            uid: config.uid,
        };
        let recorder = self.recorder.clone();
        let events = self.events_tx.clone();
        let start = matches!(directive, RecordingDirective::Start);

        drop(tokio::spawn(async move {
            let result = if start {
                recorder.start(request).await
            } else {
                recorder.stop(request).await
            };
            let ok = match result {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!(%error, start, "recording request rejected");
                    false
                },
            };
            let _ = events.send(SessionEvent::RecordingFinished { start, ok }).await;
        }));
    }
}

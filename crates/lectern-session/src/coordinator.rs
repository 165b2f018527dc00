//! Session coordinator state machine.
//!
//! The [`Coordinator`] exclusively owns the roster, the screen-share
//! tracker, the chat log, and the latest quality sample. It is a pure
//! state machine: it consumes [`SessionEvent`] inputs and command calls,
//! mutates private state one input at a time, and returns
//! [`SessionAction`] instructions for the runtime to execute.
//!
//! # Lifecycle
//!
//! `NotJoined -> Joining -> Joined -> Leaving -> Left`. Only `Joined`
//! accepts roster/share/message mutations; events arriving outside that
//! window are discarded without panicking, since external collaborators
//! are not trusted to respect the lifecycle.

use lectern_core::{
    MessageLog, Participant, QualityTier, Roster, ShareEffect, ShareState, ShareTracker, SHARE_SLOT,
    quality,
};

use crate::{
    action::{MediaDirective, RecordingDirective, SessionAction, SignalDirective},
    config::SessionConfig,
    event::SessionEvent,
    snapshot::{SessionNotice, SessionPhase, SessionSnapshot},
};

/// Session coordinator.
///
/// No I/O dependencies; fully testable without a runtime.
#[derive(Debug)]
pub struct Coordinator {
    config: SessionConfig,
    phase: SessionPhase,
    roster: Roster,
    share: ShareTracker,
    log: MessageLog,
    quality_tier: QualityTier,
    recording: bool,
    recording_pending: bool,
    notice: Option<SessionNotice>,
}

impl Coordinator {
    /// Create a coordinator in `NotJoined` for the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        let log = MessageLog::new(config.uid);
        Self {
            config,
            phase: SessionPhase::NotJoined,
            roster: Roster::new(),
            share: ShareTracker::new(),
            log,
            // The quality indicator starts at "good" until a sample lands.
            quality_tier: 2,
            recording: false,
            recording_pending: false,
            notice: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Begin the session: join the room and reserve share resources.
    ///
    /// Only valid from `NotJoined`; anywhere else it is a logged no-op.
    pub fn activate(&mut self) -> Vec<SessionAction> {
        if self.phase != SessionPhase::NotJoined {
            tracing::warn!(phase = ?self.phase, "activate ignored outside NotJoined");
            return vec![];
        }
        self.phase = SessionPhase::Joining;
        vec![
            SessionAction::Signal(SignalDirective::Join),
            SessionAction::Signal(SignalDirective::PrepareSharing),
            SessionAction::Publish,
        ]
    }

    /// Process one event and return the actions it produces.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::JoinSucceeded => self.on_join_succeeded(),
            SessionEvent::JoinFailed { reason } => self.on_join_failed(reason),
            SessionEvent::LeaveSucceeded => self.on_leave_finished(None),
            SessionEvent::LeaveFailed { reason } => self.on_leave_finished(Some(reason)),
            SessionEvent::MediaError { code, message } => {
                tracing::error!(code, %message, "media engine error");
                vec![]
            },
            SessionEvent::RecordingFinished { start, ok } => self.on_recording_finished(start, ok),
            event => self.handle_room_event(event),
        }
    }

    /// Room-scoped events, accepted only while `Joined`.
    fn handle_room_event(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Joined {
            tracing::debug!(phase = ?self.phase, ?event, "event discarded outside Joined");
            return vec![];
        }

        match event {
            SessionEvent::ParticipantAdded { id, role, display_name, stream } => {
                self.roster.add(Participant { id, role, display_name, stream });
                vec![SessionAction::Publish]
            },
            SessionEvent::ParticipantRemoved { id, role } => {
                self.roster.remove(id, role);
                vec![SessionAction::Publish]
            },
            SessionEvent::ShareStarted { slot: _, sharer } => {
                let effect = self.share.on_started(sharer, self.config.uid);
                self.notice = Some(SessionNotice::ShareStarted { sharer });
                let mut actions = self.share_effect_actions(effect);
                actions.push(SessionAction::Publish);
                actions
            },
            SessionEvent::ShareEnded { slot: _, sharer } => {
                let effect = self.share.on_ended();
                self.notice = Some(SessionNotice::ShareEnded { sharer });
                let mut actions = self.share_effect_actions(effect);
                actions.push(SessionAction::Publish);
                actions
            },
            SessionEvent::ChatMessage { text, sender, sender_name, sender_role, timestamp_ms } => {
                match self.log.append(text, sender, sender_name, sender_role, timestamp_ms) {
                    Some(_) => vec![SessionAction::Publish],
                    None => vec![],
                }
            },
            SessionEvent::NetworkQuality { tier } => {
                self.quality_tier = tier;
                vec![SessionAction::Publish]
            },
            // Lifecycle and recording events are routed before this point.
            other => {
                tracing::debug!(?other, "unexpected event in room dispatch");
                vec![]
            },
        }
    }

    fn on_join_succeeded(&mut self) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Joining {
            tracing::debug!(phase = ?self.phase, "join result discarded");
            return vec![];
        }
        self.phase = SessionPhase::Joined;
        vec![SessionAction::Signal(SignalDirective::InitDataChannel), SessionAction::Publish]
    }

    fn on_join_failed(&mut self, reason: String) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Joining {
            tracing::debug!(phase = ?self.phase, "join result discarded");
            return vec![];
        }
        tracing::warn!(%reason, "join rejected by signaling");
        self.phase = SessionPhase::NotJoined;
        self.notice = Some(SessionNotice::JoinFailed { reason });
        vec![SessionAction::Publish]
    }

    /// Leave completion. Local state leaves on failure too, so consumers
    /// are never stuck waiting on a rejected leave.
    fn on_leave_finished(&mut self, failure: Option<String>) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Leaving {
            tracing::debug!(phase = ?self.phase, "leave result discarded");
            return vec![];
        }
        self.phase = SessionPhase::Left;
        self.notice = Some(match failure {
            Some(reason) => {
                tracing::warn!(%reason, "leave rejected by signaling, exiting locally");
                SessionNotice::LeaveFailed { reason }
            },
            None => SessionNotice::Left,
        });
        vec![SessionAction::Publish]
    }

    fn on_recording_finished(&mut self, start: bool, ok: bool) -> Vec<SessionAction> {
        if !matches!(self.phase, SessionPhase::Joined | SessionPhase::Leaving) {
            // A result landing after Left is simply ignored.
            tracing::debug!(phase = ?self.phase, "recording result discarded");
            return vec![];
        }
        self.recording_pending = false;
        if ok {
            self.recording = start;
        } else {
            tracing::warn!(start, "recording request failed");
        }
        vec![SessionAction::Publish]
    }

    /// Broadcast a chat message.
    ///
    /// Blank text is a silent no-op. The message is not appended locally;
    /// it comes back through the channel like everyone else's and locality
    /// is derived at append time.
    pub fn send_message(&mut self, text: &str) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Joined || text.trim().is_empty() {
            return vec![];
        }
        vec![SessionAction::Signal(SignalDirective::Broadcast { text: text.to_string() })]
    }

    /// Flip the local screen share.
    ///
    /// A strict toggle: it does not consult whether a remote share is
    /// already active before starting one.
    pub fn toggle_share(&mut self) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Joined {
            return vec![];
        }
        let effect = self.share.toggle_local();
        self.notice = Some(match effect {
            ShareEffect::StartLocal => SessionNotice::ShareStarted { sharer: self.config.uid },
            _ => SessionNotice::ShareEnded { sharer: self.config.uid },
        });
        let mut actions = self.share_effect_actions(effect);
        actions.push(SessionAction::Publish);
        actions
    }

    /// Ask the recording service to start recording.
    ///
    /// Ignored while another recording request is in flight.
    pub fn start_recording(&mut self) -> Vec<SessionAction> {
        self.recording_request(RecordingDirective::Start)
    }

    /// Ask the recording service to stop recording.
    ///
    /// Ignored while another recording request is in flight.
    pub fn stop_recording(&mut self) -> Vec<SessionAction> {
        self.recording_request(RecordingDirective::Stop)
    }

    fn recording_request(&mut self, directive: RecordingDirective) -> Vec<SessionAction> {
        if self.phase != SessionPhase::Joined || self.recording_pending {
            return vec![];
        }
        self.recording_pending = true;
        vec![SessionAction::Record(directive), SessionAction::Publish]
    }

    /// End the session.
    ///
    /// Teardown order matters: stop any active local share, release the
    /// share resources, then leave, so no share resource dangles after
    /// departure.
    pub fn deactivate(&mut self) -> Vec<SessionAction> {
        match self.phase {
            SessionPhase::NotJoined => {
                self.phase = SessionPhase::Left;
                vec![SessionAction::Publish]
            },
            SessionPhase::Joining | SessionPhase::Joined => {
                let mut actions = Vec::new();
                if self.share.state() == ShareState::LocalSharing {
                    let effect = self.share.toggle_local();
                    actions.extend(self.share_effect_actions(effect));
                }
                actions.push(SessionAction::Signal(SignalDirective::DestructSharing));
                actions.push(SessionAction::Signal(SignalDirective::Leave));
                actions.push(SessionAction::Publish);
                self.phase = SessionPhase::Leaving;
                actions
            },
            SessionPhase::Leaving | SessionPhase::Left => vec![],
        }
    }

    /// Translate a share effect into collaborator directives.
    fn share_effect_actions(&self, effect: ShareEffect) -> Vec<SessionAction> {
        match effect {
            ShareEffect::StartLocal => vec![
                SessionAction::Signal(SignalDirective::StartSharing),
                SessionAction::Media(MediaDirective::AttachLocal { slot: SHARE_SLOT }),
            ],
            ShareEffect::StopLocal => vec![
                SessionAction::Signal(SignalDirective::StopSharing),
                SessionAction::Media(MediaDirective::Detach { slot: SHARE_SLOT }),
            ],
            ShareEffect::AttachLocal => {
                vec![SessionAction::Media(MediaDirective::AttachLocal { slot: SHARE_SLOT })]
            },
            ShareEffect::SubscribeRemote { sharer } => {
                vec![SessionAction::Media(MediaDirective::Subscribe { sharer, slot: SHARE_SLOT })]
            },
            ShareEffect::ClearSlot => {
                vec![SessionAction::Media(MediaDirective::Detach { slot: SHARE_SLOT })]
            },
        }
    }

    /// Assemble an immutable snapshot of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            roster: self.roster.snapshot(),
            share: self.share.state(),
            messages: self.log.snapshot(),
            quality_tier: self.quality_tier,
            quality: quality::classify(self.quality_tier),
            recording: self.recording,
            recording_pending: self.recording_pending,
            notice: self.notice.clone(),
            stale: self.phase == SessionPhase::Left,
        }
    }
}

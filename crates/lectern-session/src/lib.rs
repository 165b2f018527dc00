//! Lectern session
//!
//! The session coordinator for a video classroom: ingests signaling and
//! media-quality events, owns the roster / screen-share / chat / quality
//! state from `lectern-core`, and exposes immutable snapshots over a
//! watch channel.
//!
//! # Architecture
//!
//! The coordinator is a pure state machine: it consumes [`SessionEvent`]
//! inputs and returns [`SessionAction`] instructions. The [`Runtime`]
//! executes those actions against the collaborator traits
//! ([`SignalingClient`], [`MediaEngine`], [`RecordingService`]) and
//! serializes all inputs onto one queue, so state is only ever mutated
//! one event at a time.
//!
//! # Components
//!
//! - [`Coordinator`]: the session state machine
//! - [`SessionEvent`] / [`SessionAction`]: inputs and side effects
//! - [`SessionSnapshot`] / [`SnapshotFeed`]: the consumer-facing view
//! - [`Runtime`] / [`SessionHandle`]: async orchestration and commands

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
mod coordinator;
mod driver;
mod error;
mod event;
mod runtime;
mod snapshot;

pub use action::{MediaDirective, RecordingDirective, SessionAction, SignalDirective};
pub use config::SessionConfig;
pub use coordinator::Coordinator;
pub use driver::{MediaEngine, RecordingRequest, RecordingService, SignalingClient};
pub use error::SessionError;
pub use event::SessionEvent;
pub use lectern_core::{
    ChatMessage, Participant, ParticipantId, QualityBucket, QualityTier, Role, RosterSnapshot,
    SHARE_SLOT, ShareState, StreamId,
};
pub use runtime::{Runtime, SessionCommand, SessionHandle};
pub use snapshot::{SessionNotice, SessionPhase, SessionSnapshot, SnapshotFeed};

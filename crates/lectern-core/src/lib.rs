//! Lectern core
//!
//! Pure domain state for a video-classroom session: the participant
//! roster, the screen-share state machine, the chat log, and the network
//! quality classifier. No I/O; every component here is a plain value type
//! the session coordinator owns and mutates one event at a time.
//!
//! # Components
//!
//! - [`Roster`]: role-split participant mapping with snapshot reads
//! - [`ShareTracker`]: Idle / LocalSharing / RemoteSharing machine
//! - [`MessageLog`]: append-only, sequence-ordered chat log
//! - [`quality::classify`]: raw 0-6 tier to display bucket

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chat;
mod error;
pub mod quality;
mod roster;
mod share;

pub use chat::{ChatMessage, MessageLog};
pub use error::RosterError;
pub use quality::{QualityBucket, QualityTier};
pub use roster::{Participant, ParticipantId, Role, Roster, RosterSnapshot, StreamId};
pub use share::{SHARE_SLOT, ShareEffect, ShareState, ShareTracker};

//! Participant roster.
//!
//! The roster is the authoritative mapping of participant identity to role,
//! display name, and stream handle, split into presenter and attendee sets.
//! It is owned exclusively by the session coordinator; consumers only ever
//! see [`RosterSnapshot`] values cloned out at read time.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::RosterError;

/// Session-unique participant identity.
pub type ParticipantId = u64;

/// Opaque handle to a media stream owned by the media engine.
pub type StreamId = u64;

/// Participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    /// Teacher-side participant.
    Presenter,
    /// Student-side participant.
    Attendee,
}

impl Role {
    /// Parse a wire role string.
    ///
    /// This is the boundary parse for signaling adapters: anything decoding
    /// wire payloads into session events resolves the role here before
    /// constructing the typed event. Unknown roles are a contract violation
    /// by the signaling collaborator and fail fast rather than being mapped
    /// to a default.
    pub fn from_wire(role: &str) -> Result<Self, RosterError> {
        match role {
            "presenter" | "teacher" => Ok(Self::Presenter),
            "attendee" | "student" => Ok(Self::Attendee),
            other => Err(RosterError::UnknownRole(other.to_string())),
        }
    }

    /// Canonical wire name for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Presenter => "presenter",
            Self::Attendee => "attendee",
        }
    }
}

/// A participant currently in the session.
///
/// Updated only by whole-value replacement; consumers never observe a
/// partially mutated participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Session-unique identity.
    pub id: ParticipantId,
    /// Role in the classroom.
    pub role: Role,
    /// Name shown on the participant's tile.
    pub display_name: String,
    /// Camera stream handle. `None` while the stream is still pending.
    pub stream: Option<StreamId>,
}

/// Role-split participant mapping.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    presenters: HashMap<ParticipantId, Participant>,
    attendees: HashMap<ParticipantId, Participant>,
    presenter_name: String,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a participant in the role-appropriate set.
    ///
    /// Re-adding an existing identity replaces its attributes (last write
    /// wins); the mapping guarantees no duplicate entries. Adding a
    /// presenter updates the derived presenter name.
    pub fn add(&mut self, participant: Participant) {
        match participant.role {
            Role::Presenter => {
                self.presenter_name = participant.display_name.clone();
                self.presenters.insert(participant.id, participant);
            },
            Role::Attendee => {
                self.attendees.insert(participant.id, participant);
            },
        }
    }

    /// Remove a participant from the role-appropriate set. No-op if absent.
    ///
    /// The derived presenter name is left untouched even when the removed
    /// participant is the presenter it was derived from; it reads as the
    /// last known presenter until another presenter is added.
    pub fn remove(&mut self, id: ParticipantId, role: Role) {
        match role {
            Role::Presenter => {
                self.presenters.remove(&id);
            },
            Role::Attendee => {
                self.attendees.remove(&id);
            },
        }
    }

    /// Look up a participant in either set.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.presenters.get(&id).or_else(|| self.attendees.get(&id))
    }

    /// Number of participants across both sets.
    pub fn len(&self) -> usize {
        self.presenters.len() + self.attendees.len()
    }

    /// Whether the roster has no participants.
    pub fn is_empty(&self) -> bool {
        self.presenters.is_empty() && self.attendees.is_empty()
    }

    /// Display name of the most recently added presenter.
    ///
    /// Empty until the first presenter joins.
    pub fn presenter_name(&self) -> &str {
        &self.presenter_name
    }

    /// Point-in-time copy of both sets for consumers.
    ///
    /// Entries are sorted by identity so repeated snapshots of the same
    /// state compare equal; consumers must not read meaning into the order.
    pub fn snapshot(&self) -> RosterSnapshot {
        let mut presenters: Vec<Participant> = self.presenters.values().cloned().collect();
        let mut attendees: Vec<Participant> = self.attendees.values().cloned().collect();
        presenters.sort_by_key(|p| p.id);
        attendees.sort_by_key(|p| p.id);

        RosterSnapshot { presenters, attendees, presenter_name: self.presenter_name.clone() }
    }
}

/// Immutable point-in-time view of the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterSnapshot {
    /// Presenters, sorted by identity.
    pub presenters: Vec<Participant>,
    /// Attendees, sorted by identity.
    pub attendees: Vec<Participant>,
    /// Display name of the most recently added presenter.
    pub presenter_name: String,
}

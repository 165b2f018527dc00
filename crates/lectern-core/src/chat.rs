//! Append-only chat message log.
//!
//! Messages are ordered by a strictly increasing per-process sequence
//! number assigned at append time, not by the wire timestamp: append order
//! equals display order even under sender clock skew.

use serde::Serialize;

use crate::roster::{ParticipantId, Role};

/// A chat message, immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Strictly increasing sort/display key assigned at append time.
    pub seq: u64,
    /// Message body.
    pub text: String,
    /// Sender identity.
    pub sender: ParticipantId,
    /// Sender display name as carried on the wire.
    pub sender_name: String,
    /// Sender role as carried on the wire.
    pub sender_role: Role,
    /// Wire timestamp in milliseconds. Informational only.
    pub timestamp_ms: u64,
    /// Whether the sender is this session's own identity.
    pub local: bool,
}

/// Time-ordered chat log for one session.
#[derive(Debug, Clone)]
pub struct MessageLog {
    own_id: ParticipantId,
    entries: Vec<ChatMessage>,
    next_seq: u64,
}

impl MessageLog {
    /// Create an empty log; `own_id` is used to derive message locality.
    pub fn new(own_id: ParticipantId) -> Self {
        Self { own_id, entries: Vec::new(), next_seq: 0 }
    }

    /// Append a message, returning its assigned sequence number.
    ///
    /// Empty or whitespace-only text is rejected and returns `None`.
    pub fn append(
        &mut self,
        text: String,
        sender: ParticipantId,
        sender_name: String,
        sender_role: Role,
        timestamp_ms: u64,
    ) -> Option<u64> {
        if text.trim().is_empty() {
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(ChatMessage {
            seq,
            text,
            sender,
            sender_name,
            sender_role,
            timestamp_ms,
            local: sender == self.own_id,
        });
        Some(seq)
    }

    /// Messages in append order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.entries
    }

    /// Point-in-time copy of the full ordered sequence.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.entries.clone()
    }

    /// Number of messages appended so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no messages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Session configuration.

use lectern_core::{ParticipantId, Role};

/// Static configuration for one classroom session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Application id presented to the recording service.
    pub app_id: String,
    /// Channel (classroom) name.
    pub channel: String,
    /// Our own session-unique identity.
    pub uid: ParticipantId,
    /// Our display name.
    pub display_name: String,
    /// Our role in the classroom.
    pub role: Role,
}

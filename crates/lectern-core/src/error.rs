//! Domain error types.

use thiserror::Error;

/// Errors from roster operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The signaling collaborator delivered a role string outside the
    /// presenter/attendee contract. Programmer error on the wire side;
    /// never mapped to a default role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

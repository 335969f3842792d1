//! Error types surfaced by the admin command layer and external collaborators.
//!
//! Nothing inside the ownership engine returns these: missing world data
//! degrades to "no change" instead.

use thiserror::Error;

use crate::components::MapId;

/// Admin command failures. No mutation has happened when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("wrong number of arguments: expected {expected}, found {found}")]
    WrongArgumentCount { expected: usize, found: usize },
    #[error("invalid map id: {0}")]
    InvalidMapId(String),
    #[error("no star for map {map_a} or map {map_b}")]
    StarNotFound { map_a: MapId, map_b: MapId },
    #[error("a hyperlane needs two different stars, got {map} twice")]
    SameStar { map: MapId },
}

/// An external collaborator (console push, forced regeneration) failed
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{collaborator} is unavailable")]
    Unavailable { collaborator: &'static str },
    #[error("{collaborator} failed: {reason}")]
    Failed {
        collaborator: &'static str,
        reason: String,
    },
}

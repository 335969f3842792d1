//! External collaborators: open starmap consoles and forced regeneration.

use hecs::World;

use crate::error::CollaboratorError;
use crate::starmap::StarmapView;

/// Receives the current starmap whenever it changes
pub trait ConsoleSink {
    fn refresh_starmap(&mut self, view: &StarmapView) -> Result<(), CollaboratorError>;
}

/// Rebuilds the star map layout from scratch. Best effort.
pub trait StarmapRegenerator {
    fn regenerate(&mut self, world: &mut World) -> Result<(), CollaboratorError>;
}

/// Keeps the last pushed view and counts pushes
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    pub refreshes: usize,
    pub last_view: Option<StarmapView>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsoleSink for ConsoleLog {
    fn refresh_starmap(&mut self, view: &StarmapView) -> Result<(), CollaboratorError> {
        self.refreshes += 1;
        self.last_view = Some(view.clone());
        Ok(())
    }
}

/// Regenerator for worlds whose layout never changes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegeneration;

impl StarmapRegenerator for NoRegeneration {
    fn regenerate(&mut self, _world: &mut World) -> Result<(), CollaboratorError> {
        Err(CollaboratorError::Unavailable {
            collaborator: "starmap regenerator",
        })
    }
}

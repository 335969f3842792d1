//! Systems - logic that reads world state and updates the ownership overlay

mod capture;
mod events;
mod ownership;

pub use capture::*;
pub use events::*;
pub use ownership::*;

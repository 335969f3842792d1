//! Generation - procedural creation of the galaxy and its layout

mod galaxy;
mod layout;
mod names;

pub use galaxy::*;
pub use layout::*;
pub use names::*;

//! Starmap Core - Galaxy Map Simulation
//!
//! Keeps the in-simulation galaxy map: star systems, the hyperlane graph
//! between them, and a live overlay of which faction owns each system and
//! which systems are being captured right now.
//!
//! # Architecture
//!
//! World state lives in a `hecs` ECS world:
//! - **Entities**: sectors, grids, capture markers, ownership banners
//! - **Components**: pure data (`Sector`, `Placement`, `CaptureMarker`, ...)
//! - **Systems**: the capture scan (every tick) and the ownership recompute
//!   (every 60 simulated seconds, or when a banner event arrives)
//!
//! The [`starmap::StarmapRegistry`] caches the star list and owns the
//! hyperlane graph; [`engine::GalaxyEngine`] ties everything together.
//!
//! # Example
//!
//! ```rust,no_run
//! use starmap_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut engine = GalaxyEngine::new(StarmapConfig::default());
//! let mut rng = rand::rngs::StdRng::seed_from_u64(13);
//! engine.generate(&mut rng);
//!
//! for line in run_line(&mut engine, "starmap_list") {
//!     println!("{}", line.fallback_text());
//! }
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod collaborators;
pub mod components;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod generation;
pub mod query;
pub mod starmap;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::collaborators::{ConsoleLog, ConsoleSink, StarmapRegenerator};
    pub use crate::components::*;
    pub use crate::config::StarmapConfig;
    pub use crate::console::{execute, run_line, AdminCommand, ConsoleMessage};
    pub use crate::engine::GalaxyEngine;
    pub use crate::error::{CollaboratorError, CommandError};
    pub use crate::starmap::{EdgeOverride, HyperlaneEdge, Star, StarmapRegistry, StarmapView};
}

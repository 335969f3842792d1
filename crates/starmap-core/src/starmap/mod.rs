//! Starmap registry - the cached star list and the hyperlane graph.

mod hyperlanes;
mod registry;

pub use hyperlanes::*;
pub use registry::*;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::components::{MapId, Sector, Vec2};

/// A travel-graph node: one star system as shown on the galaxy map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub map: MapId,
    pub name: String,
    pub position: Vec2,
    pub global_position: Vec2,
}

impl Star {
    pub fn new(map: MapId, name: impl Into<String>, position: Vec2, global_position: Vec2) -> Self {
        Self {
            map,
            name: name.into(),
            position,
            global_position,
        }
    }

    /// Stars without a galaxy position have not been laid out yet
    pub fn is_placed(&self) -> bool {
        self.global_position != Vec2::ZERO
    }
}

impl From<&Sector> for Star {
    fn from(sector: &Sector) -> Self {
        Self::new(
            sector.map,
            sector.name.clone(),
            sector.position,
            sector.global_position,
        )
    }
}

/// Ownership overlay as published alongside the star list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OwnershipOverlay {
    pub capturing_maps: Vec<MapId>,
    pub owner_by_map: BTreeMap<MapId, String>,
    pub color_override_by_map: BTreeMap<MapId, String>,
}

/// Everything an open starmap console needs to redraw
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StarmapView {
    pub stars: Vec<Star>,
    pub edges: Vec<HyperlaneEdge>,
    #[serde(flatten)]
    pub overlay: OwnershipOverlay,
}

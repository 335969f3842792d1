//! Sector components: star systems, grids, capture markers and banners.

use super::common::{MapId, Vec2};
use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Banner color used when a banner is spawned without one.
pub const DEFAULT_BANNER_COLOR: &str = "#96B089";

/// Sector component - one star system on the galaxy map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub map: MapId,
    pub name: String,
    /// Position in the sector's own layout space
    pub position: Vec2,
    /// Position on the galaxy map. Zero until the layout places it.
    pub global_position: Vec2,
}

impl Sector {
    pub fn new(map: MapId, name: impl Into<String>, position: Vec2) -> Self {
        Self {
            map,
            name: name.into(),
            position,
            global_position: Vec2::ZERO,
        }
    }

    pub fn with_global_position(mut self, global_position: Vec2) -> Self {
        self.global_position = global_position;
        self
    }

    /// Whether the layout has assigned this sector a spot on the galaxy map
    pub fn is_placed(&self) -> bool {
        self.global_position != Vec2::ZERO
    }
}

/// Where an entity sits: which system, which grid, and whether it is bolted down.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement {
    pub map: MapId,
    /// Parent grid entity, if any
    #[serde(skip)]
    pub grid: Option<Entity>,
    pub anchored: bool,
}

impl Placement {
    pub fn new(map: MapId) -> Self {
        Self {
            map,
            grid: None,
            anchored: false,
        }
    }

    pub fn on_grid(mut self, grid: Entity) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn anchored(mut self, anchored: bool) -> Self {
        self.anchored = anchored;
        self
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(MapId::NULLSPACE)
    }
}

/// Tags a grid with the station template it was built from.
///
/// A grid whose template id matches the configured control grid id is the
/// grid that decides who owns its system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationTemplate {
    pub id: String,
}

impl StationTemplate {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Capture marker - present on entities that can contest a system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMarker {
    pub capturing: bool,
    /// Display color while the capture runs
    pub color_hex: Option<String>,
}

impl CaptureMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(color_hex: Option<&str>) -> Self {
        Self {
            capturing: true,
            color_hex: color_hex.map(str::to_string),
        }
    }
}

/// Ownership banner - declares a faction's claim and display color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorBanner {
    pub faction: String,
    pub color_hex: String,
}

impl SectorBanner {
    pub fn new(faction: impl Into<String>) -> Self {
        Self {
            faction: faction.into(),
            color_hex: DEFAULT_BANNER_COLOR.to_string(),
        }
    }

    pub fn with_color(mut self, color_hex: impl Into<String>) -> Self {
        self.color_hex = color_hex.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_placement() {
        let sector = Sector::new(MapId(4), "Vega", Vec2::new(3.0, 4.0));
        assert!(!sector.is_placed());

        let placed = sector.with_global_position(Vec2::new(300.0, 400.0));
        assert!(placed.is_placed());
    }

    #[test]
    fn test_banner_defaults() {
        let banner = SectorBanner::new("Syndicate");
        assert_eq!(banner.color_hex, DEFAULT_BANNER_COLOR);

        let red = banner.with_color("#FF0000");
        assert_eq!(red.color_hex, "#FF0000");
        assert_eq!(red.faction, "Syndicate");
    }

    #[test]
    fn test_capture_marker() {
        let idle = CaptureMarker::new();
        assert!(!idle.capturing);

        let live = CaptureMarker::active(Some("#00FF00"));
        assert!(live.capturing);
        assert_eq!(live.color_hex.as_deref(), Some("#00FF00"));
    }
}

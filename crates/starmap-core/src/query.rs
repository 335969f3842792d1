//! World lookups used by the registry and the ownership engine.
//!
//! Everything the core needs to know about live world state goes through
//! [`SectorQuery`]. Lookups that find nothing return `None` or an empty list;
//! a missing control grid or banner is never an error.

use hecs::{Entity, World};

use crate::components::{non_blank, CaptureMarker, MapId, Placement, Sector, SectorBanner, StationTemplate};
use crate::starmap::Star;

/// A capture marker as seen in the world, with its grid context
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSighting {
    pub entity: Entity,
    pub map: MapId,
    pub grid: Option<Entity>,
    pub capturing: bool,
    pub color_hex: Option<String>,
}

/// An ownership banner as seen in the world, with grid context and anchor state
#[derive(Debug, Clone, PartialEq)]
pub struct BannerSighting {
    pub entity: Entity,
    pub map: MapId,
    pub grid: Option<Entity>,
    pub anchored: bool,
    pub faction: String,
    pub color_hex: String,
}

/// Resolved claim on a system: the owning faction and its display color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorClaim {
    pub faction: String,
    pub color_hex: Option<String>,
}

/// Query capability over live world state.
pub trait SectorQuery {
    /// Build a fresh star list, ordered by map id
    fn sector_stars(&self) -> Vec<Star>;

    /// All capture markers, active or not
    fn capture_sightings(&self) -> Vec<CaptureSighting>;

    /// All ownership banners, anchored or not
    fn banner_sightings(&self) -> Vec<BannerSighting>;

    /// The grid that decides ownership of `map`
    fn control_grid(&self, map: MapId) -> Option<Entity>;

    fn is_on_control_grid(&self, map: MapId, grid: Option<Entity>) -> bool {
        match (self.control_grid(map), grid) {
            (Some(control), Some(grid)) => control == grid,
            _ => false,
        }
    }

    /// Find the anchored banner with a non-blank faction on the control grid of `map`
    fn resolve_claim(&self, map: MapId) -> Option<SectorClaim> {
        let control = self.control_grid(map)?;
        self.banner_sightings()
            .into_iter()
            .filter(|b| b.grid == Some(control) && b.anchored)
            .find_map(|b| {
                let faction = non_blank(&b.faction)?.to_string();
                let color_hex = non_blank(&b.color_hex).map(str::to_string);
                Some(SectorClaim { faction, color_hex })
            })
    }
}

/// [`SectorQuery`] over a `hecs` world
pub struct EcsQuery<'w> {
    world: &'w World,
    control_grid_id: &'w str,
}

impl<'w> EcsQuery<'w> {
    pub fn new(world: &'w World, control_grid_id: &'w str) -> Self {
        Self {
            world,
            control_grid_id,
        }
    }
}

impl SectorQuery for EcsQuery<'_> {
    fn sector_stars(&self) -> Vec<Star> {
        let mut stars: Vec<Star> = self
            .world
            .query::<&Sector>()
            .iter()
            .map(|(_, sector)| Star::from(sector))
            .collect();
        stars.sort_by_key(|s| s.map);
        stars
    }

    fn capture_sightings(&self) -> Vec<CaptureSighting> {
        let mut sightings: Vec<CaptureSighting> = self
            .world
            .query::<(&CaptureMarker, &Placement)>()
            .iter()
            .map(|(entity, (marker, placement))| CaptureSighting {
                entity,
                map: placement.map,
                grid: placement.grid,
                capturing: marker.capturing,
                color_hex: marker.color_hex.clone(),
            })
            .collect();
        sightings.sort_by_key(|s| s.entity.id());
        sightings
    }

    fn banner_sightings(&self) -> Vec<BannerSighting> {
        let mut sightings: Vec<BannerSighting> = self
            .world
            .query::<(&SectorBanner, &Placement)>()
            .iter()
            .map(|(entity, (banner, placement))| BannerSighting {
                entity,
                map: placement.map,
                grid: placement.grid,
                anchored: placement.anchored,
                faction: banner.faction.clone(),
                color_hex: banner.color_hex.clone(),
            })
            .collect();
        sightings.sort_by_key(|s| s.entity.id());
        sightings
    }

    fn control_grid(&self, map: MapId) -> Option<Entity> {
        if map.is_nullspace() {
            return None;
        }
        self.world
            .query::<(&StationTemplate, &Placement)>()
            .iter()
            .filter(|(_, (template, placement))| {
                placement.map == map && template.id == self.control_grid_id
            })
            .map(|(entity, _)| entity)
            .min_by_key(|entity| entity.id())
    }
}

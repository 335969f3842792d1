//! Galaxy generation - spawns sectors and their control grids

use hecs::{Entity, World};
use rand::Rng;
use std::collections::HashSet;
use std::f32::consts::TAU;

use super::{generate_star_name, SectorLayoutRegenerator};
use crate::components::{MapId, Placement, Sector, StationTemplate, Vec2};
use crate::config::StarmapConfig;

/// Entities created by [`generate_galaxy`]
#[derive(Debug, Clone, Default)]
pub struct GalaxyLayout {
    pub maps: Vec<MapId>,
    pub sectors: Vec<Entity>,
    /// Control grid for each sector, same order as `sectors`
    pub control_grids: Vec<Entity>,
}

impl GalaxyLayout {
    pub fn control_grid_for(&self, map: MapId) -> Option<Entity> {
        self.maps
            .iter()
            .position(|m| *m == map)
            .and_then(|idx| self.control_grids.get(idx).copied())
    }
}

/// Generate a galaxy of sectors in the ECS world.
///
/// Configured special sectors are generated first, under their configured names.
/// Map ids run sequentially from `first_map_id`, skipping nullspace and
/// stopping where the id range ends.
pub fn generate_galaxy(world: &mut World, config: &StarmapConfig, rng: &mut impl Rng) -> GalaxyLayout {
    let mut layout = GalaxyLayout::default();
    let layouter = SectorLayoutRegenerator::from_config(config);
    let mut names: HashSet<String> = HashSet::new();
    let mut positions: Vec<Vec2> = Vec::new();

    let map_ids = (config.galaxy.first_map_id..=i32::MAX)
        .map(MapId)
        .filter(|map| !map.is_nullspace());

    for (idx, map) in (0..config.galaxy.star_count).zip(map_ids) {
        let name = match config.special_sectors.get(idx as usize) {
            Some(special) => special.id.clone(),
            None => generate_star_name(rng, &names),
        };
        names.insert(name.clone());

        let position = place_star(&positions, config, rng);
        positions.push(position);

        let mut sector = Sector::new(map, name, position);
        sector.global_position = layouter.layout_position(&sector);

        let sector_entity = world.spawn((sector,));
        let grid = world.spawn((
            StationTemplate::new(config.control_grid_id.clone()),
            Placement::new(map),
        ));

        layout.maps.push(map);
        layout.sectors.push(sector_entity);
        layout.control_grids.push(grid);
    }

    if layout.sectors.len() < config.galaxy.star_count as usize {
        log::warn!(
            "map ids exhausted after {} of {} sectors",
            layout.sectors.len(),
            config.galaxy.star_count
        );
    }
    log::info!("generated galaxy with {} sectors", layout.sectors.len());
    layout
}

/// Pick a spot between `star_distance_min` and `star_distance_max` from an
/// existing star, keeping clear of every other star when possible.
fn place_star(existing: &[Vec2], config: &StarmapConfig, rng: &mut impl Rng) -> Vec2 {
    let min = config.star_distance_min;
    let max = config.star_distance_max;
    if existing.is_empty() {
        // Keep off the origin; a zero galaxy position means "unplaced"
        return Vec2::new(max, max);
    }

    let mut candidate = existing[0];
    for _ in 0..32 {
        let anchor = existing[rng.gen_range(0..existing.len())];
        let angle = rng.gen_range(0.0..TAU);
        let distance = if max > min { rng.gen_range(min..=max) } else { min };
        candidate = anchor + Vec2::new(angle.cos(), angle.sin()) * distance;

        let clear = existing.iter().all(|p| p.distance(&candidate) >= min);
        if clear && candidate != Vec2::ZERO {
            return candidate;
        }
    }
    candidate
}

//! Galaxy layout - where each sector sits on the galaxy map.
//!
//! Also the default forced-regeneration collaborator: re-laying out every
//! sector from its local position and the configured special sectors.

use hecs::World;

use crate::collaborators::StarmapRegenerator;
use crate::components::{Sector, Vec2};
use crate::config::{SpecialSectorConfig, StarmapConfig};
use crate::error::CollaboratorError;

#[derive(Debug, Clone)]
pub struct SectorLayoutRegenerator {
    global_scale: f32,
    special_sectors: Vec<SpecialSectorConfig>,
}

impl SectorLayoutRegenerator {
    pub fn from_config(config: &StarmapConfig) -> Self {
        Self {
            global_scale: config.global_scale,
            special_sectors: config.special_sectors.clone(),
        }
    }

    /// Galaxy position for a sector: pinned if special, scaled otherwise
    pub fn layout_position(&self, sector: &Sector) -> Vec2 {
        self.special_sectors
            .iter()
            .find(|s| s.id == sector.name)
            .map(|s| s.position)
            .unwrap_or(sector.position * self.global_scale)
    }
}

impl StarmapRegenerator for SectorLayoutRegenerator {
    fn regenerate(&mut self, world: &mut World) -> Result<(), CollaboratorError> {
        let mut placed = 0;
        for (_entity, sector) in world.query_mut::<&mut Sector>() {
            sector.global_position = self.layout_position(sector);
            placed += 1;
        }
        if placed == 0 {
            return Err(CollaboratorError::Failed {
                collaborator: "sector layout",
                reason: "no sectors to lay out".to_string(),
            });
        }
        log::info!("laid out {} sectors", placed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::MapId;

    #[test]
    fn test_layout_scales_and_pins() {
        let config = StarmapConfig {
            global_scale: 10.0,
            special_sectors: vec![SpecialSectorConfig {
                id: "Frontier".to_string(),
                position: Vec2::new(-500.0, 250.0),
            }],
            ..Default::default()
        };
        let mut world = World::new();
        let plain = world.spawn((Sector::new(MapId(1), "Vega Prime", Vec2::new(3.0, 4.0)),));
        let pinned = world.spawn((Sector::new(MapId(2), "Frontier", Vec2::new(1.0, 1.0)),));

        let mut regenerator = SectorLayoutRegenerator::from_config(&config);
        regenerator.regenerate(&mut world).unwrap();

        let plain = world.get::<&Sector>(plain).unwrap();
        assert_eq!(plain.global_position, Vec2::new(30.0, 40.0));
        let pinned = world.get::<&Sector>(pinned).unwrap();
        assert_eq!(pinned.global_position, Vec2::new(-500.0, 250.0));
    }

    #[test]
    fn test_empty_world_fails() {
        let mut regenerator = SectorLayoutRegenerator::from_config(&StarmapConfig::default());
        assert!(regenerator.regenerate(&mut World::new()).is_err());
    }
}

//! Capture system - per-tick scan of active capture markers.
//!
//! Rebuilds the capturing set from scratch every tick and diffs it against
//! the previous one. A system that starts being captured gets a color locked
//! in; a system whose capture ended gets the color of its last recomputed owner
//! back, or loses its override when it has none.

use std::collections::{BTreeMap, BTreeSet};

use super::SectorOwnership;
use crate::components::{non_blank, MapId};
use crate::query::SectorQuery;

/// Systems that entered or left the capturing set this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureDiff {
    pub started: BTreeSet<MapId>,
    pub ended: BTreeSet<MapId>,
    pub colors_changed: bool,
}

impl CaptureDiff {
    pub fn changed(&self) -> bool {
        !self.started.is_empty() || !self.ended.is_empty() || self.colors_changed
    }
}

/// Scan capture markers and update the capturing set and sticky colors.
pub fn update_capturing(ownership: &mut SectorOwnership, query: &impl SectorQuery) -> CaptureDiff {
    let mut capturing = BTreeSet::new();
    let mut marker_colors: BTreeMap<MapId, String> = BTreeMap::new();

    for sighting in query.capture_sightings() {
        if !sighting.capturing || sighting.map.is_nullspace() {
            continue;
        }
        // Only markers touching the control grid count
        if !query.is_on_control_grid(sighting.map, sighting.grid) {
            continue;
        }
        capturing.insert(sighting.map);
        if let Some(color) = sighting.color_hex.as_deref().and_then(non_blank) {
            marker_colors.insert(sighting.map, color.to_string());
        }
    }

    let started: BTreeSet<MapId> = capturing.difference(&ownership.capturing).copied().collect();
    let ended: BTreeSet<MapId> = ownership.capturing.difference(&capturing).copied().collect();
    let mut colors_changed = false;

    for map in &started {
        let locked = marker_colors
            .get(map)
            .or_else(|| ownership.owner_color_by_map.get(map))
            .cloned();
        if let Some(color) = locked {
            colors_changed |= set_color(&mut ownership.color_override_by_map, *map, color);
        }
    }

    for map in &ended {
        match ownership.owner_color_by_map.get(map).cloned() {
            Some(color) => {
                colors_changed |= set_color(&mut ownership.color_override_by_map, *map, color);
            }
            None => {
                colors_changed |= ownership.color_override_by_map.remove(map).is_some();
            }
        }
    }

    ownership.capturing = capturing;

    let diff = CaptureDiff {
        started,
        ended,
        colors_changed,
    };
    if diff.changed() {
        log::debug!(
            "capture state changed: started {:?}, ended {:?}",
            diff.started,
            diff.ended
        );
    }
    diff
}

fn set_color(colors: &mut BTreeMap<MapId, String>, map: MapId, color: String) -> bool {
    match colors.get(&map) {
        Some(existing) if *existing == color => false,
        _ => {
            colors.insert(map, color);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CaptureMarker, Placement, Sector, StationTemplate, Vec2};
    use crate::query::EcsQuery;
    use hecs::{Entity, World};

    fn spawn_system(world: &mut World, map: i32) -> Entity {
        world.spawn((Sector::new(MapId(map), format!("S{}", map), Vec2::new(1.0, 1.0))
            .with_global_position(Vec2::new(map as f32 * 100.0, 50.0)),));
        world.spawn((StationTemplate::new("Beacon"), Placement::new(MapId(map))))
    }

    fn scan(world: &World, ownership: &mut SectorOwnership) -> CaptureDiff {
        update_capturing(ownership, &EcsQuery::new(world, "Beacon"))
    }

    #[test]
    fn test_marker_on_control_grid_starts_capture() {
        let mut world = World::new();
        let grid = spawn_system(&mut world, 1);
        world.spawn((
            CaptureMarker::active(Some("#00FF00")),
            Placement::new(MapId(1)).on_grid(grid),
        ));

        let mut ownership = SectorOwnership::new(60.0);
        let diff = scan(&world, &mut ownership);

        assert_eq!(diff.started, BTreeSet::from([MapId(1)]));
        assert!(ownership.is_capturing(MapId(1)));
        assert_eq!(ownership.color_of(MapId(1)), Some("#00FF00"));

        // Steady state produces no diff
        assert!(!scan(&world, &mut ownership).changed());
    }

    #[test]
    fn test_last_colored_marker_wins() {
        let mut world = World::new();
        let grid = spawn_system(&mut world, 1);
        world.spawn((
            CaptureMarker::active(Some("#111111")),
            Placement::new(MapId(1)).on_grid(grid),
        ));
        world.spawn((
            CaptureMarker::active(Some("#222222")),
            Placement::new(MapId(1)).on_grid(grid),
        ));
        // No color: does not erase the one before it
        world.spawn((CaptureMarker::active(None), Placement::new(MapId(1)).on_grid(grid)));

        let mut ownership = SectorOwnership::new(60.0);
        let diff = scan(&world, &mut ownership);
        assert_eq!(diff.started, BTreeSet::from([MapId(1)]));
        assert_eq!(ownership.color_of(MapId(1)), Some("#222222"));

        // Locked in for the rest of the capture
        world.spawn((
            CaptureMarker::active(Some("#333333")),
            Placement::new(MapId(1)).on_grid(grid),
        ));
        assert!(!scan(&world, &mut ownership).changed());
        assert_eq!(ownership.color_of(MapId(1)), Some("#222222"));
    }

    #[test]
    fn test_inactive_or_off_grid_markers_ignored() {
        let mut world = World::new();
        let grid = spawn_system(&mut world, 1);
        let stray = world.spawn((Placement::new(MapId(1)),));
        world.spawn((CaptureMarker::new(), Placement::new(MapId(1)).on_grid(grid)));
        world.spawn((CaptureMarker::active(None), Placement::new(MapId(1)).on_grid(stray)));
        world.spawn((CaptureMarker::active(None), Placement::new(MapId::NULLSPACE).on_grid(grid)));
        world.spawn((CaptureMarker::active(None), Placement::new(MapId(1))));

        let mut ownership = SectorOwnership::new(60.0);
        let diff = scan(&world, &mut ownership);
        assert!(!diff.changed());
        assert!(ownership.capturing_maps().is_empty());
    }

    #[test]
    fn test_colorless_capture_inherits_owner_color() {
        let mut world = World::new();
        let grid = spawn_system(&mut world, 1);
        let mut ownership = SectorOwnership::new(60.0);
        ownership.owner_by_map.insert(MapId(1), "Syndicate".to_string());
        ownership.owner_color_by_map.insert(MapId(1), "#FF0000".to_string());
        ownership.color_override_by_map.insert(MapId(1), "#FF0000".to_string());

        world.spawn((CaptureMarker::active(None), Placement::new(MapId(1)).on_grid(grid)));
        let diff = scan(&world, &mut ownership);

        assert!(diff.changed());
        assert!(!diff.colors_changed);
        assert_eq!(ownership.color_of(MapId(1)), Some("#FF0000"));
    }

    #[test]
    fn test_capture_end_restores_owner_color() {
        let mut world = World::new();
        let grid = spawn_system(&mut world, 1);
        let mut ownership = SectorOwnership::new(60.0);
        ownership.owner_color_by_map.insert(MapId(1), "#FF0000".to_string());

        let marker = world.spawn((
            CaptureMarker::active(Some("#0000FF")),
            Placement::new(MapId(1)).on_grid(grid),
        ));
        scan(&world, &mut ownership);
        assert_eq!(ownership.color_of(MapId(1)), Some("#0000FF"));

        world.despawn(marker).unwrap();
        let diff = scan(&world, &mut ownership);
        assert_eq!(diff.ended, BTreeSet::from([MapId(1)]));
        assert_eq!(ownership.color_of(MapId(1)), Some("#FF0000"));
    }

    #[test]
    fn test_capture_end_unowned_removes_override() {
        let mut world = World::new();
        let grid = spawn_system(&mut world, 1);
        let mut ownership = SectorOwnership::new(60.0);

        let marker = world.spawn((
            CaptureMarker::active(Some("#0000FF")),
            Placement::new(MapId(1)).on_grid(grid),
        ));
        scan(&world, &mut ownership);

        if let Ok(mut m) = world.get::<&mut CaptureMarker>(marker) {
            m.capturing = false;
        }
        let diff = scan(&world, &mut ownership);
        assert!(diff.colors_changed);
        assert!(ownership.color_overrides().is_empty());
        assert!(ownership.capturing_maps().is_empty());
    }
}

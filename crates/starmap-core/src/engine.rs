//! Galaxy engine - main entry point for running the starmap simulation

use std::sync::Arc;

use hecs::{Entity, World};
use rand::Rng;

use crate::collaborators::{ConsoleLog, ConsoleSink, StarmapRegenerator};
use crate::components::*;
use crate::config::StarmapConfig;
use crate::error::CollaboratorError;
use crate::generation::{generate_galaxy, GalaxyLayout, SectorLayoutRegenerator};
use crate::query::{EcsQuery, SectorQuery};
use crate::starmap::{Star, StarmapRegistry};
use crate::systems::*;

/// Main simulation engine, one per simulation instance
pub struct GalaxyEngine<S: ConsoleSink = ConsoleLog> {
    /// ECS world containing all entities
    pub world: World,
    /// Cached stars and hyperlanes
    pub registry: StarmapRegistry,
    /// Ownership, color and capture overlay
    pub ownership: SectorOwnership,
    /// Banner events waiting for the next tick
    pub events: SectorEventQueue,
    /// Generated galaxy, if any
    pub layout: Option<GalaxyLayout>,
    /// Simulation time in seconds since start
    sim_time: f64,
    time_scale: f32,
    config: StarmapConfig,
    consoles: S,
    regenerator: Box<dyn StarmapRegenerator>,
}

impl GalaxyEngine<ConsoleLog> {
    /// Create an empty simulation that records console pushes
    pub fn new(config: StarmapConfig) -> Self {
        Self::with_consoles(config, ConsoleLog::new())
    }
}

impl Default for GalaxyEngine<ConsoleLog> {
    fn default() -> Self {
        Self::new(StarmapConfig::default())
    }
}

impl<S: ConsoleSink> GalaxyEngine<S> {
    pub fn with_consoles(config: StarmapConfig, consoles: S) -> Self {
        Self {
            world: World::new(),
            registry: StarmapRegistry::new(&config),
            ownership: SectorOwnership::new(config.ownership_recompute_interval),
            events: SectorEventQueue::new(),
            layout: None,
            sim_time: 0.0,
            time_scale: 1.0,
            regenerator: Box::new(SectorLayoutRegenerator::from_config(&config)),
            config,
            consoles,
        }
    }

    /// Replace the forced-regeneration collaborator
    pub fn with_regenerator(mut self, regenerator: Box<dyn StarmapRegenerator>) -> Self {
        self.regenerator = regenerator;
        self
    }

    /// Generate a galaxy and build the first star snapshot
    pub fn generate(&mut self, rng: &mut impl Rng) {
        let layout = generate_galaxy(&mut self.world, &self.config, rng);
        self.layout = Some(layout);
        self.collect_stars_fresh(true);
    }

    /// Advance the simulation by `delta_seconds`.
    ///
    /// Order within a tick: rebuild a stale star snapshot, scan captures,
    /// handle banner events, then run the periodic ownership recompute. The
    /// recompute must see the capturing set this tick produced.
    pub fn update(&mut self, delta_seconds: f32) {
        let scaled_delta = delta_seconds * self.time_scale;
        self.sim_time += scaled_delta as f64;
        let mut refresh = false;

        if self.registry.is_stale() {
            let query = EcsQuery::new(&self.world, &self.config.control_grid_id);
            self.registry.collect_stars_fresh(&query, true);
            refresh = true;
        }

        let query = EcsQuery::new(&self.world, &self.config.control_grid_id);

        // Fast path: every tick
        let diff = update_capturing(&mut self.ownership, &query);
        refresh |= diff.changed();

        // Banner lifecycle events
        let events = self.events.drain();
        if events.iter().any(SectorEvent::requires_recompute) {
            log::debug!("{} banner events, recomputing ownership", events.len());
            let stars = self.registry.collect_stars();
            recompute_ownership(&mut self.ownership, &query, &stars);
            refresh = true;
        }

        // Slow path: every recompute interval
        if self.ownership.advance(scaled_delta) {
            let stars = self.registry.collect_stars();
            refresh |= recompute_ownership(&mut self.ownership, &query, &stars);
        }

        if refresh {
            self.refresh_consoles();
        }
    }

    /// The cached star snapshot
    pub fn collect_stars(&self) -> Arc<[Star]> {
        self.registry.collect_stars()
    }

    /// Rebuild the star list from the world, optionally replacing the cache
    pub fn collect_stars_fresh(&mut self, update_cache: bool) -> Arc<[Star]> {
        let query = EcsQuery::new(&self.world, &self.config.control_grid_id);
        self.registry.collect_stars_fresh(&query, update_cache)
    }

    /// Run a full ownership recompute outside the regular cadence
    pub fn recompute_ownership(&mut self) -> bool {
        let query = EcsQuery::new(&self.world, &self.config.control_grid_id);
        let stars = self.registry.collect_stars();
        recompute_ownership(&mut self.ownership, &query, &stars)
    }

    /// Push the current starmap and ownership overlay to open consoles
    pub fn refresh_consoles(&mut self) {
        self.registry
            .refresh_consoles(&mut self.consoles, self.ownership.overlay());
    }

    /// Ask the regeneration collaborator to rebuild the star map layout
    pub fn force_regeneration(&mut self) -> Result<(), CollaboratorError> {
        self.regenerator.regenerate(&mut self.world)
    }

    /// Resolve the control grid of a system
    pub fn control_grid(&self, map: MapId) -> Option<Entity> {
        EcsQuery::new(&self.world, &self.config.control_grid_id).control_grid(map)
    }

    /// Spawn a banner at an explicit placement
    pub fn spawn_banner(&mut self, banner: SectorBanner, placement: Placement) -> Entity {
        let map = placement.map;
        let entity = self.world.spawn((banner, placement));
        self.events.push(SectorEvent::BannerPlaced { banner: entity, map });
        entity
    }

    /// Anchor a banner on the control grid of `map`. `None` if the system has no control grid.
    pub fn plant_banner(&mut self, map: MapId, faction: &str, color_hex: Option<&str>) -> Option<Entity> {
        let grid = self.control_grid(map)?;
        let color = color_hex.unwrap_or(self.config.default_banner_color.as_str()).to_string();
        let banner = SectorBanner::new(faction).with_color(color);
        Some(self.spawn_banner(banner, Placement::new(map).on_grid(grid).anchored(true)))
    }

    pub fn remove_banner(&mut self, banner: Entity) -> bool {
        let map = match self.world.get::<&Placement>(banner) {
            Ok(placement) => placement.map,
            Err(_) => return false,
        };
        if self.world.despawn(banner).is_err() {
            return false;
        }
        self.events.push(SectorEvent::BannerRemoved { banner, map });
        true
    }

    /// Anchor or unanchor a banner. Returns false if nothing changed.
    pub fn set_banner_anchored(&mut self, banner: Entity, anchored: bool) -> bool {
        let map = match self.world.get::<&mut Placement>(banner) {
            Ok(mut placement) if placement.anchored != anchored => {
                placement.anchored = anchored;
                placement.map
            }
            _ => return false,
        };
        self.events.push(SectorEvent::BannerAnchorChanged {
            banner,
            map,
            anchored,
        });
        true
    }

    /// Spawn a capture marker at an explicit placement
    pub fn spawn_capture_marker(&mut self, marker: CaptureMarker, placement: Placement) -> Entity {
        self.world.spawn((marker, placement))
    }

    /// Start capturing `map` from its control grid. `None` if the system has no control grid.
    pub fn start_capture(&mut self, map: MapId, color_hex: Option<&str>) -> Option<Entity> {
        let grid = self.control_grid(map)?;
        Some(self.spawn_capture_marker(
            CaptureMarker::active(color_hex),
            Placement::new(map).on_grid(grid),
        ))
    }

    pub fn set_capturing(&mut self, marker: Entity, capturing: bool) -> bool {
        match self.world.get::<&mut CaptureMarker>(marker) {
            Ok(mut m) => {
                m.capturing = capturing;
                true
            }
            Err(_) => false,
        }
    }

    pub fn config(&self) -> &StarmapConfig {
        &self.config
    }

    pub fn consoles(&self) -> &S {
        &self.consoles
    }

    pub fn consoles_mut(&mut self) -> &mut S {
        &mut self.consoles
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn star_count(&self) -> usize {
        self.registry.collect_stars().len()
    }
}

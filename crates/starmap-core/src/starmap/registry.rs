//! Starmap registry - authoritative cache of stars and hyperlanes.
//!
//! The star snapshot is an `Arc<[Star]>` replaced in a single assignment, so
//! a reader holding the previous snapshot keeps a complete list while a
//! refresh builds the next one. Hyperlane overrides live in the graph and
//! survive every snapshot rebuild.

use std::sync::Arc;

use super::{
    natural_hyperlanes, EdgeOverride, HyperlaneAddOutcome, HyperlaneBlockOutcome, HyperlaneEdge,
    HyperlaneGraph, OwnershipOverlay, Star, StarmapView,
};
use crate::collaborators::ConsoleSink;
use crate::components::MapId;
use crate::config::StarmapConfig;
use crate::query::SectorQuery;

pub struct StarmapRegistry {
    snapshot: Arc<[Star]>,
    /// Set until the first cache-updating collect, and by an invalidating override clear
    stale: bool,
    hyperlanes: HyperlaneGraph,
    hyperlane_neighbors: usize,
    hyperlane_max_distance: f32,
}

impl StarmapRegistry {
    pub fn new(config: &StarmapConfig) -> Self {
        Self {
            snapshot: Arc::from(Vec::new()),
            stale: true,
            hyperlanes: HyperlaneGraph::new(),
            hyperlane_neighbors: config.hyperlane_neighbors,
            hyperlane_max_distance: config.hyperlane_max_distance,
        }
    }

    /// The cached snapshot. Never rebuilds.
    pub fn collect_stars(&self) -> Arc<[Star]> {
        Arc::clone(&self.snapshot)
    }

    /// Build a star list from live world state.
    ///
    /// With `update_cache`, the new list replaces the snapshot and the
    /// natural hyperlanes are regenerated from it.
    pub fn collect_stars_fresh(&mut self, query: &impl SectorQuery, update_cache: bool) -> Arc<[Star]> {
        let stars: Arc<[Star]> = Arc::from(query.sector_stars());
        if update_cache {
            let natural = natural_hyperlanes(&stars, self.hyperlane_neighbors, self.hyperlane_max_distance);
            log::debug!(
                "starmap snapshot rebuilt: {} stars, {} natural hyperlanes",
                stars.len(),
                natural.len()
            );
            self.hyperlanes.replace_natural(natural);
            self.snapshot = Arc::clone(&stars);
            self.stale = false;
        }
        stars
    }

    /// Whether the next read should be preceded by a rebuild
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn contains(&self, map: MapId) -> bool {
        self.snapshot.iter().any(|s| s.map == map)
    }

    pub fn star(&self, map: MapId) -> Option<&Star> {
        self.snapshot.iter().find(|s| s.map == map)
    }

    pub fn add_hyperlane(&mut self, a: MapId, b: MapId) -> HyperlaneAddOutcome {
        let outcome = self.hyperlanes.add(a, b);
        log::info!("hyperlane {} <-> {}: {:?}", a, b, outcome);
        outcome
    }

    /// True only when a new ForcedOpen edge was inserted
    pub fn try_add_hyperlane(&mut self, a: MapId, b: MapId) -> bool {
        self.add_hyperlane(a, b) == HyperlaneAddOutcome::Added
    }

    pub fn block_hyperlane(&mut self, a: MapId, b: MapId) -> HyperlaneBlockOutcome {
        let outcome = self.hyperlanes.block(a, b);
        log::info!("hyperlane {} <-> {} blocked: {:?}", a, b, outcome);
        outcome
    }

    /// True when an open edge was closed. False means only a block marker was
    /// recorded, or nothing at all for a self-loop (`a == b`).
    pub fn try_block_hyperlane(&mut self, a: MapId, b: MapId) -> bool {
        self.block_hyperlane(a, b) == HyperlaneBlockOutcome::Removed
    }

    pub fn clear_hyperlane_overrides(&mut self, invalidate_cache: bool) {
        let cleared = self.hyperlanes.clear_overrides();
        log::info!("cleared {} hyperlane overrides", cleared);
        if invalidate_cache {
            self.invalidate();
        }
    }

    pub fn hyperlane_state(&self, a: MapId, b: MapId) -> Option<EdgeOverride> {
        self.hyperlanes.state(a, b)
    }

    /// Open edges, sorted by pair
    pub fn edges(&self) -> Vec<HyperlaneEdge> {
        self.hyperlanes.edges()
    }

    pub fn hyperlanes(&self) -> &HyperlaneGraph {
        &self.hyperlanes
    }

    pub fn view(&self, overlay: OwnershipOverlay) -> StarmapView {
        StarmapView {
            stars: self.snapshot.to_vec(),
            edges: self.edges(),
            overlay,
        }
    }

    /// Push the current snapshot to open consoles. Failures are logged and dropped.
    pub fn refresh_consoles(&self, sink: &mut dyn ConsoleSink, overlay: OwnershipOverlay) {
        let view = self.view(overlay);
        if let Err(err) = sink.refresh_starmap(&view) {
            log::warn!("starmap console refresh failed: {}", err);
        }
    }
}

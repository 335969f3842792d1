//! Ownership system - periodic full recompute of who owns each system.
//!
//! Ownership is slow on purpose: a banner swap only shows up after the next
//! full recompute, which damps flicker from banners being moved around.
//! Systems under capture keep whatever color the capture system locked in.

use std::collections::{BTreeMap, BTreeSet};

use crate::components::MapId;
use crate::query::SectorQuery;
use crate::starmap::{OwnershipOverlay, Star};

/// Ownership overlay state (singleton, stored in engine)
#[derive(Debug, Clone)]
pub struct SectorOwnership {
    pub(crate) owner_by_map: BTreeMap<MapId, String>,
    pub(crate) color_override_by_map: BTreeMap<MapId, String>,
    /// Owner colors from the last full recompute, capturing systems included
    pub(crate) owner_color_by_map: BTreeMap<MapId, String>,
    pub(crate) capturing: BTreeSet<MapId>,
    accumulator: f32,
    interval: f32,
}

impl SectorOwnership {
    pub fn new(interval: f32) -> Self {
        Self {
            owner_by_map: BTreeMap::new(),
            color_override_by_map: BTreeMap::new(),
            owner_color_by_map: BTreeMap::new(),
            capturing: BTreeSet::new(),
            accumulator: 0.0,
            interval,
        }
    }

    pub fn owner_by_map(&self) -> &BTreeMap<MapId, String> {
        &self.owner_by_map
    }

    pub fn color_overrides(&self) -> &BTreeMap<MapId, String> {
        &self.color_override_by_map
    }

    pub fn capturing_maps(&self) -> &BTreeSet<MapId> {
        &self.capturing
    }

    pub fn owner_of(&self, map: MapId) -> Option<&str> {
        self.owner_by_map.get(&map).map(String::as_str)
    }

    pub fn color_of(&self, map: MapId) -> Option<&str> {
        self.color_override_by_map.get(&map).map(String::as_str)
    }

    pub fn is_capturing(&self, map: MapId) -> bool {
        self.capturing.contains(&map)
    }

    /// Add simulated time. Returns true when a full recompute is due.
    ///
    /// The accumulator resets to zero when it fires; overshoot is dropped.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        self.accumulator += delta_seconds;
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    pub fn overlay(&self) -> OwnershipOverlay {
        OwnershipOverlay {
            capturing_maps: self.capturing.iter().copied().collect(),
            owner_by_map: self.owner_by_map.clone(),
            color_override_by_map: self.color_override_by_map.clone(),
        }
    }
}

/// Rescan banners for every placed star and rebuild ownership and colors.
///
/// Returns true if any owner or color entry was added, removed or changed.
pub fn recompute_ownership(
    ownership: &mut SectorOwnership,
    query: &impl SectorQuery,
    stars: &[Star],
) -> bool {
    let mut owners = BTreeMap::new();
    let mut colors = BTreeMap::new();

    for star in stars.iter().filter(|s| s.is_placed()) {
        if let Some(claim) = query.resolve_claim(star.map) {
            owners.insert(star.map, claim.faction);
            if let Some(color) = claim.color_hex {
                colors.insert(star.map, color);
            }
        }
    }

    let mut changed = owners != ownership.owner_by_map;
    ownership.owner_by_map = owners;

    // Capturing systems keep their sticky color
    let before = ownership.color_override_by_map.clone();
    let capturing = &ownership.capturing;
    ownership
        .color_override_by_map
        .retain(|map, _| colors.contains_key(map) || capturing.contains(map));
    for (map, color) in &colors {
        if !capturing.contains(map) {
            ownership.color_override_by_map.insert(*map, color.clone());
        }
    }
    changed |= before != ownership.color_override_by_map;

    ownership.owner_color_by_map = colors;

    if changed {
        log::debug!(
            "ownership recomputed: {} owned, {} colored",
            ownership.owner_by_map.len(),
            ownership.color_override_by_map.len()
        );
    }
    changed
}

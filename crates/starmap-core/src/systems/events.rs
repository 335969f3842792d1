//! Sector events - banner lifecycle notifications
//!
//! Banner changes are queued as typed events and drained once per tick.
//! Each drained batch that touches a real system triggers one bounded full
//! ownership recompute; there is no incremental diffing per banner.

use hecs::Entity;

use crate::components::MapId;

/// Something happened to an ownership banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorEvent {
    /// A banner entered the world
    BannerPlaced { banner: Entity, map: MapId },
    /// A banner left the world
    BannerRemoved { banner: Entity, map: MapId },
    /// A banner was anchored or unanchored
    BannerAnchorChanged {
        banner: Entity,
        map: MapId,
        anchored: bool,
    },
}

impl SectorEvent {
    pub fn map(&self) -> MapId {
        match self {
            SectorEvent::BannerPlaced { map, .. }
            | SectorEvent::BannerRemoved { map, .. }
            | SectorEvent::BannerAnchorChanged { map, .. } => *map,
        }
    }

    pub fn banner(&self) -> Entity {
        match self {
            SectorEvent::BannerPlaced { banner, .. }
            | SectorEvent::BannerRemoved { banner, .. }
            | SectorEvent::BannerAnchorChanged { banner, .. } => *banner,
        }
    }

    /// Whether handling this event calls for an ownership recompute
    pub fn requires_recompute(&self) -> bool {
        match self {
            // Anchoring changes matter wherever they happen
            SectorEvent::BannerAnchorChanged { .. } => true,
            SectorEvent::BannerPlaced { map, .. } | SectorEvent::BannerRemoved { map, .. } => {
                !map.is_nullspace()
            }
        }
    }
}

/// Pending sector events (singleton, stored in engine)
#[derive(Debug, Clone, Default)]
pub struct SectorEventQueue {
    pending: Vec<SectorEvent>,
}

impl SectorEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SectorEvent) {
        self.pending.push(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<SectorEvent> {
        std::mem::take(&mut self.pending)
    }
}

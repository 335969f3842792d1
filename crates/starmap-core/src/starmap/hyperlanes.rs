//! Hyperlane graph - undirected edges between systems with admin overrides.
//!
//! Natural edges are regenerated from the star list. Overrides are kept in a
//! separate table so a regeneration never loses them: a ForcedBlocked record
//! hides the natural edge for its pair, a ForcedOpen record adds one.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::Star;
use crate::components::MapId;

/// Unordered pair of systems. Always stored as (smaller, larger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HyperlaneKey {
    a: MapId,
    b: MapId,
}

impl HyperlaneKey {
    /// Normalize a pair. Returns `None` for a self-loop.
    pub fn new(a: MapId, b: MapId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { a, b }),
            std::cmp::Ordering::Greater => Some(Self { a: b, b: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn a(&self) -> MapId {
        self.a
    }

    pub fn b(&self) -> MapId {
        self.b
    }

    pub fn touches(&self, map: MapId) -> bool {
        self.a == map || self.b == map
    }
}

/// How an edge record came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeOverride {
    /// Generated from star positions
    Natural,
    /// Added by an admin
    ForcedOpen,
    /// Removed by an admin; suppresses the natural edge
    ForcedBlocked,
}

/// One edge record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HyperlaneEdge {
    pub a: MapId,
    pub b: MapId,
    pub state: EdgeOverride,
}

impl HyperlaneEdge {
    pub fn key(&self) -> Option<HyperlaneKey> {
        HyperlaneKey::new(self.a, self.b)
    }

    /// Whether ships can travel along this edge
    pub fn is_open(&self) -> bool {
        self.state != EdgeOverride::ForcedBlocked
    }
}

/// Result of an admin request to open an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyperlaneAddOutcome {
    Added,
    /// A natural or forced-open edge already connects the pair
    AlreadyExists,
    /// A block marker holds the pair closed until overrides are cleared
    Blocked,
    SelfLoop,
}

/// Result of an admin request to close an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HyperlaneBlockOutcome {
    /// An open edge existed and is now blocked
    Removed,
    /// Nothing was open; only a block marker was recorded
    BlockedOnly,
}

/// Undirected hyperlane graph with override semantics
#[derive(Debug, Clone, Default)]
pub struct HyperlaneGraph {
    natural: BTreeSet<HyperlaneKey>,
    overrides: BTreeMap<HyperlaneKey, EdgeOverride>,
}

impl HyperlaneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record for a pair, if any
    pub fn state(&self, a: MapId, b: MapId) -> Option<EdgeOverride> {
        let key = HyperlaneKey::new(a, b)?;
        self.state_of(&key)
    }

    fn state_of(&self, key: &HyperlaneKey) -> Option<EdgeOverride> {
        if let Some(state) = self.overrides.get(key) {
            return Some(*state);
        }
        self.natural.contains(key).then_some(EdgeOverride::Natural)
    }

    /// Whether an open edge (natural or forced) connects the pair
    pub fn is_connected(&self, a: MapId, b: MapId) -> bool {
        matches!(
            self.state(a, b),
            Some(EdgeOverride::Natural | EdgeOverride::ForcedOpen)
        )
    }

    pub fn add(&mut self, a: MapId, b: MapId) -> HyperlaneAddOutcome {
        let Some(key) = HyperlaneKey::new(a, b) else {
            return HyperlaneAddOutcome::SelfLoop;
        };
        match self.state_of(&key) {
            Some(EdgeOverride::Natural | EdgeOverride::ForcedOpen) => {
                HyperlaneAddOutcome::AlreadyExists
            }
            Some(EdgeOverride::ForcedBlocked) => HyperlaneAddOutcome::Blocked,
            None => {
                self.overrides.insert(key, EdgeOverride::ForcedOpen);
                HyperlaneAddOutcome::Added
            }
        }
    }

    /// Record a ForcedBlocked override for the pair. A self-loop is a no-op
    /// and reports `BlockedOnly`.
    pub fn block(&mut self, a: MapId, b: MapId) -> HyperlaneBlockOutcome {
        let Some(key) = HyperlaneKey::new(a, b) else {
            return HyperlaneBlockOutcome::BlockedOnly;
        };
        let was_open = matches!(
            self.state_of(&key),
            Some(EdgeOverride::Natural | EdgeOverride::ForcedOpen)
        );
        self.overrides.insert(key, EdgeOverride::ForcedBlocked);
        if was_open {
            HyperlaneBlockOutcome::Removed
        } else {
            HyperlaneBlockOutcome::BlockedOnly
        }
    }

    /// Drop every ForcedOpen and ForcedBlocked record
    pub fn clear_overrides(&mut self) -> usize {
        let cleared = self.overrides.len();
        self.overrides.clear();
        cleared
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Swap in a freshly generated natural edge set
    pub fn replace_natural(&mut self, natural: BTreeSet<HyperlaneKey>) {
        self.natural = natural;
    }

    /// Every record, one per pair, blocked ones included
    pub fn records(&self) -> Vec<HyperlaneEdge> {
        let keys: BTreeSet<&HyperlaneKey> = self.natural.iter().chain(self.overrides.keys()).collect();
        keys.into_iter()
            .filter_map(|key| {
                self.state_of(key).map(|state| HyperlaneEdge {
                    a: key.a,
                    b: key.b,
                    state,
                })
            })
            .collect()
    }

    /// Open edges only, sorted by pair
    pub fn edges(&self) -> Vec<HyperlaneEdge> {
        self.records().into_iter().filter(HyperlaneEdge::is_open).collect()
    }

    /// Systems directly reachable from `map`
    pub fn neighbors(&self, map: MapId) -> Vec<MapId> {
        self.edges()
            .into_iter()
            .filter_map(|e| {
                if e.a == map {
                    Some(e.b)
                } else if e.b == map {
                    Some(e.a)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Connect each placed star to its nearest placed neighbors.
///
/// Candidates farther than `max_distance` are never linked. Equal distances
/// are broken by map id so the result only depends on the star list.
pub fn natural_hyperlanes(stars: &[Star], neighbors: usize, max_distance: f32) -> BTreeSet<HyperlaneKey> {
    let placed: Vec<&Star> = stars.iter().filter(|s| s.is_placed()).collect();
    let max_sq = max_distance * max_distance;
    let mut lanes = BTreeSet::new();

    for star in &placed {
        let mut candidates: Vec<(f32, MapId)> = placed
            .iter()
            .filter(|other| other.map != star.map)
            .map(|other| (star.global_position.distance_squared(&other.global_position), other.map))
            .filter(|(dist_sq, _)| *dist_sq <= max_sq)
            .collect();
        candidates.sort_by(|x, y| {
            x.0.partial_cmp(&y.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(x.1.cmp(&y.1))
        });

        for (_, other) in candidates.into_iter().take(neighbors) {
            if let Some(key) = HyperlaneKey::new(star.map, other) {
                lanes.insert(key);
            }
        }
    }

    lanes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;

    fn star(map: i32, x: f32, y: f32) -> Star {
        Star::new(MapId(map), format!("S{}", map), Vec2::ZERO, Vec2::new(x, y))
    }

    #[test]
    fn test_key_is_unordered() {
        assert_eq!(HyperlaneKey::new(MapId(2), MapId(1)), HyperlaneKey::new(MapId(1), MapId(2)));
        assert_eq!(HyperlaneKey::new(MapId(3), MapId(3)), None);
    }

    #[test]
    fn test_add_then_add_again() {
        let mut graph = HyperlaneGraph::new();
        assert_eq!(graph.add(MapId(1), MapId(2)), HyperlaneAddOutcome::Added);
        assert_eq!(graph.add(MapId(1), MapId(2)), HyperlaneAddOutcome::AlreadyExists);
        assert_eq!(graph.add(MapId(2), MapId(1)), HyperlaneAddOutcome::AlreadyExists);
        assert_eq!(graph.records().len(), 1);
        assert_eq!(graph.state(MapId(2), MapId(1)), Some(EdgeOverride::ForcedOpen));
    }

    #[test]
    fn test_add_over_natural_edge() {
        let mut graph = HyperlaneGraph::new();
        graph.replace_natural(HyperlaneKey::new(MapId(1), MapId(2)).into_iter().collect());
        assert_eq!(graph.add(MapId(1), MapId(2)), HyperlaneAddOutcome::AlreadyExists);
        assert_eq!(graph.override_count(), 0);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = HyperlaneGraph::new();
        assert_eq!(graph.add(MapId(1), MapId(1)), HyperlaneAddOutcome::SelfLoop);
        assert_eq!(graph.block(MapId(1), MapId(1)), HyperlaneBlockOutcome::BlockedOnly);
        assert!(graph.records().is_empty());
        assert_eq!(graph.override_count(), 0);
    }

    #[test]
    fn test_block_existing_and_missing() {
        let mut graph = HyperlaneGraph::new();
        graph.replace_natural(HyperlaneKey::new(MapId(1), MapId(2)).into_iter().collect());

        assert_eq!(graph.block(MapId(2), MapId(1)), HyperlaneBlockOutcome::Removed);
        assert_eq!(graph.state(MapId(1), MapId(2)), Some(EdgeOverride::ForcedBlocked));
        assert!(!graph.is_connected(MapId(1), MapId(2)));

        assert_eq!(graph.block(MapId(1), MapId(3)), HyperlaneBlockOutcome::BlockedOnly);
        assert_eq!(graph.state(MapId(1), MapId(3)), Some(EdgeOverride::ForcedBlocked));
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_block_suppresses_regenerated_natural_edge() {
        let mut graph = HyperlaneGraph::new();
        graph.block(MapId(1), MapId(2));
        graph.replace_natural(HyperlaneKey::new(MapId(1), MapId(2)).into_iter().collect());

        assert!(!graph.is_connected(MapId(1), MapId(2)));
        assert_eq!(graph.records().len(), 1);
    }

    #[test]
    fn test_add_after_block_stays_blocked() {
        let mut graph = HyperlaneGraph::new();
        graph.block(MapId(1), MapId(2));
        assert_eq!(graph.add(MapId(1), MapId(2)), HyperlaneAddOutcome::Blocked);
        assert!(!graph.is_connected(MapId(1), MapId(2)));
    }

    #[test]
    fn test_clear_overrides_is_idempotent() {
        let mut graph = HyperlaneGraph::new();
        graph.replace_natural(HyperlaneKey::new(MapId(1), MapId(2)).into_iter().collect());
        graph.block(MapId(1), MapId(2));
        graph.add(MapId(2), MapId(3));

        graph.clear_overrides();
        let once = graph.records();
        graph.clear_overrides();
        assert_eq!(graph.records(), once);
        assert_eq!(
            once,
            vec![HyperlaneEdge {
                a: MapId(1),
                b: MapId(2),
                state: EdgeOverride::Natural
            }]
        );
    }

    #[test]
    fn test_neighbors() {
        let mut graph = HyperlaneGraph::new();
        graph.add(MapId(1), MapId(2));
        graph.add(MapId(3), MapId(1));
        graph.block(MapId(1), MapId(4));
        assert_eq!(graph.neighbors(MapId(1)), vec![MapId(2), MapId(3)]);
    }

    #[test]
    fn test_natural_hyperlanes_nearest_within_range() {
        let stars = vec![
            star(1, 0.0, 10.0),
            star(2, 100.0, 10.0),
            star(3, 200.0, 10.0),
            star(4, 5000.0, 10.0),
            // Unplaced stars never get lanes
            star(5, 0.0, 0.0),
        ];
        let lanes = natural_hyperlanes(&stars, 1, 1200.0);

        assert!(lanes.contains(&HyperlaneKey::new(MapId(1), MapId(2)).unwrap()));
        assert!(lanes.contains(&HyperlaneKey::new(MapId(2), MapId(3)).unwrap()));
        assert!(!lanes.iter().any(|k| k.touches(MapId(4))));
        assert!(!lanes.iter().any(|k| k.touches(MapId(5))));
    }
}

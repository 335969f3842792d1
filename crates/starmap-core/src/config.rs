//! Starmap configuration: hyperlane generation, galaxy layout and ownership cadence.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::components::{MapId, Vec2, DEFAULT_BANNER_COLOR};

/// Environment variable pointing at a JSON config file
pub const CONFIG_PATH_ENV: &str = "STARMAP_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarmapConfig {
    /// Longest distance a natural hyperlane may span
    pub hyperlane_max_distance: f32,
    /// How many nearest neighbors each star links to
    pub hyperlane_neighbors: usize,
    pub star_distance_min: f32,
    pub star_distance_max: f32,
    /// Sector layout space to galaxy space
    pub global_scale: f32,
    /// Seconds of simulated time between full ownership recomputes
    pub ownership_recompute_interval: f32,
    /// Station template id of the grid that decides ownership
    pub control_grid_id: String,
    pub default_banner_color: String,
    pub special_sectors: Vec<SpecialSectorConfig>,
    pub galaxy: GalaxyConfig,
}

impl Default for StarmapConfig {
    fn default() -> Self {
        Self {
            hyperlane_max_distance: 1200.0,
            hyperlane_neighbors: 3,
            star_distance_min: 5.0,
            star_distance_max: 15.0,
            global_scale: 100.0,
            ownership_recompute_interval: 60.0,
            control_grid_id: "Beacon".to_string(),
            default_banner_color: DEFAULT_BANNER_COLOR.to_string(),
            special_sectors: Vec::new(),
            galaxy: GalaxyConfig::default(),
        }
    }
}

/// A sector pinned to a fixed galaxy position
#[derive(Debug, Clone, Deserialize)]
pub struct SpecialSectorConfig {
    pub id: String,
    #[serde(default)]
    pub position: Vec2,
}

/// Procedural galaxy generation parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub seed: u64,
    pub star_count: u32,
    /// First map id handed out; map ids are sequential from here
    pub first_map_id: i32,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            seed: 13,
            star_count: 12,
            first_map_id: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum StarmapConfigError {
    #[error("failed to parse starmap config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read starmap config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid starmap config: {0}")]
    Invalid(String),
}

impl StarmapConfig {
    pub fn from_json_str(json: &str) -> Result<Self, StarmapConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, StarmapConfigError> {
        let json = fs::read_to_string(path).map_err(|source| StarmapConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load from `STARMAP_CONFIG_PATH`, or fall back to defaults when unset.
    pub fn load_from_env() -> Result<Self, StarmapConfigError> {
        match env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("loading starmap config from {}", path.display());
                Self::load_from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), StarmapConfigError> {
        if self.ownership_recompute_interval <= 0.0 {
            return Err(StarmapConfigError::Invalid(
                "ownership_recompute_interval must be positive".to_string(),
            ));
        }
        if self.star_distance_min > self.star_distance_max {
            return Err(StarmapConfigError::Invalid(format!(
                "star_distance_min {} exceeds star_distance_max {}",
                self.star_distance_min, self.star_distance_max
            )));
        }
        if self.control_grid_id.trim().is_empty() {
            return Err(StarmapConfigError::Invalid(
                "control_grid_id must not be blank".to_string(),
            ));
        }
        // Map 0 is nullspace
        if self.galaxy.first_map_id <= 0 {
            return Err(StarmapConfigError::Invalid(format!(
                "galaxy.first_map_id must be positive, got {}",
                self.galaxy.first_map_id
            )));
        }
        if self.galaxy.last_map_id().is_none() {
            return Err(StarmapConfigError::Invalid(format!(
                "{} stars from map {} overflow the map id range",
                self.galaxy.star_count, self.galaxy.first_map_id
            )));
        }
        Ok(())
    }
}

impl GalaxyConfig {
    /// Map id of the star at `index`, if it fits in the id range
    pub fn map_id_at(&self, index: u32) -> Option<MapId> {
        i32::try_from(index)
            .ok()
            .and_then(|offset| self.first_map_id.checked_add(offset))
            .map(MapId)
    }

    /// Map id of the last generated star. `None` on overflow.
    pub fn last_map_id(&self) -> Option<MapId> {
        match self.star_count {
            0 => Some(MapId(self.first_map_id)),
            count => self.map_id_at(count - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StarmapConfig::default();
        assert_eq!(config.hyperlane_neighbors, 3);
        assert_eq!(config.hyperlane_max_distance, 1200.0);
        assert_eq!(config.ownership_recompute_interval, 60.0);
        assert_eq!(config.control_grid_id, "Beacon");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = StarmapConfig::from_json_str(
            r#"{
                "hyperlane_neighbors": 2,
                "special_sectors": [{ "id": "Frontier", "position": { "x": 10.0, "y": 20.0 } }],
                "galaxy": { "star_count": 4 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.hyperlane_neighbors, 2);
        assert_eq!(config.hyperlane_max_distance, 1200.0);
        assert_eq!(config.galaxy.star_count, 4);
        assert_eq!(config.galaxy.seed, 13);
        assert_eq!(config.special_sectors[0].id, "Frontier");
        assert_eq!(config.special_sectors[0].position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            StarmapConfig::from_json_str(r#"{ "ownership_recompute_interval": 0.0 }"#),
            Err(StarmapConfigError::Invalid(_))
        ));
        assert!(matches!(
            StarmapConfig::from_json_str(r#"{ "star_distance_min": 20.0 }"#),
            Err(StarmapConfigError::Invalid(_))
        ));
        assert!(matches!(
            StarmapConfig::from_json_str("{ not json"),
            Err(StarmapConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_map_ids() {
        for json in [
            r#"{ "galaxy": { "first_map_id": 0 } }"#,
            r#"{ "galaxy": { "first_map_id": -4, "star_count": 3 } }"#,
            r#"{ "galaxy": { "first_map_id": 2147483647, "star_count": 2 } }"#,
            r#"{ "galaxy": { "first_map_id": 1, "star_count": 4294967295 } }"#,
        ] {
            assert!(
                matches!(StarmapConfig::from_json_str(json), Err(StarmapConfigError::Invalid(_))),
                "accepted {}",
                json
            );
        }

        let edge = StarmapConfig::from_json_str(
            r#"{ "galaxy": { "first_map_id": 2147483646, "star_count": 2 } }"#,
        )
        .unwrap();
        assert_eq!(edge.galaxy.last_map_id(), Some(MapId(i32::MAX)));
    }

    #[test]
    fn test_map_id_at() {
        let galaxy = GalaxyConfig {
            first_map_id: i32::MAX - 1,
            ..Default::default()
        };
        assert_eq!(galaxy.map_id_at(0), Some(MapId(i32::MAX - 1)));
        assert_eq!(galaxy.map_id_at(1), Some(MapId(i32::MAX)));
        assert_eq!(galaxy.map_id_at(2), None);
        assert_eq!(galaxy.map_id_at(u32::MAX), None);
    }

    #[test]
    fn test_missing_file() {
        let result = StarmapConfig::load_from_path(Path::new("/nonexistent/starmap.json"));
        assert!(matches!(result, Err(StarmapConfigError::Read { .. })));
    }
}

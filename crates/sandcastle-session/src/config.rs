use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use sandcastle_geom::{GridFrame, Vec3};
use sandcastle_shapes::{DecorationKind, ShapeId};

use crate::event::OperationMode;

/// Session tunables. Every key is optional in TOML; missing keys take the defaults below.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Side of the square build zone, in tiles. Also the column depth.
    pub grid_size: usize,
    pub tile_size: f32,
    /// World position of the zone's (0, 0, 0) corner.
    pub origin: [f32; 3],
    pub enforce_rules_for_positioning: bool,
    /// Subtract tool reach handed to the support check.
    pub max_hole_size: i32,
    /// Minimum session time between two accepted undo/redo requests.
    pub repeat_interval_secs: f32,
    pub mode: OperationMode,
    pub shape: ShapeId,
    pub decoration: DecorationKind,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            tile_size: 1.0,
            origin: [0.0, 0.0, 0.0],
            enforce_rules_for_positioning: false,
            max_hole_size: 2,
            repeat_interval_secs: 0.2,
            mode: OperationMode::Add,
            shape: ShapeId::Cube1x1,
            decoration: DecorationKind::Flag,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: SessionConfig = toml::from_str(s)?;
        if cfg.grid_size == 0 {
            return Err("grid_size must be at least 1".into());
        }
        if !(cfg.tile_size > 0.0) {
            return Err(format!("tile_size must be positive, got {}", cfg.tile_size).into());
        }
        if cfg.max_hole_size < 1 || cfg.max_hole_size as usize > cfg.grid_size {
            return Err(format!(
                "max_hole_size must be within 1..={}, got {}",
                cfg.grid_size, cfg.max_hole_size
            )
            .into());
        }
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn frame(&self) -> GridFrame {
        GridFrame::new(Vec3::from_array(self.origin), self.tile_size)
    }

    /// Support-check radius in whole tiles, never wider than the grid.
    #[inline]
    pub fn removal_radius(&self) -> i32 {
        let cap = i32::try_from(self.grid_size).unwrap_or(i32::MAX);
        ((self.tile_size * self.max_hole_size as f32) as i32).min(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(SessionConfig::from_toml_str("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg = SessionConfig::from_toml_str(
            r#"
            grid_size = 16
            enforce_rules_for_positioning = true
            shape = "cylinder_3x1"
            decoration = "starfish"
            mode = "subtract"
        "#,
        )
        .unwrap();
        assert_eq!(cfg.grid_size, 16);
        assert!(cfg.enforce_rules_for_positioning);
        assert_eq!(cfg.shape, ShapeId::Cylinder3x1);
        assert_eq!(cfg.decoration, DecorationKind::Starfish);
        assert_eq!(cfg.mode, OperationMode::Subtract);
        assert_eq!(cfg.max_hole_size, 2);
    }

    #[test]
    fn degenerate_sizes_are_rejected() {
        assert!(SessionConfig::from_toml_str("grid_size = 0").is_err());
        assert!(SessionConfig::from_toml_str("tile_size = 0.0").is_err());
        assert!(SessionConfig::from_toml_str("max_hole_size = 0").is_err());
        assert!(SessionConfig::from_toml_str("max_hole_size = -3").is_err());
        assert!(SessionConfig::from_toml_str("max_hole_size = 100000").is_err());
        assert!(SessionConfig::from_toml_str("grid_size = 4\nmax_hole_size = 4").is_ok());
    }

    #[test]
    fn removal_radius_scales_with_tile() {
        let cfg = SessionConfig {
            tile_size: 2.0,
            ..SessionConfig::default()
        };
        assert_eq!(cfg.removal_radius(), 4);
        assert_eq!(SessionConfig::default().removal_radius(), 2);
        let huge = SessionConfig {
            tile_size: 1.0e6,
            ..SessionConfig::default()
        };
        assert_eq!(huge.removal_radius(), 10);
    }
}

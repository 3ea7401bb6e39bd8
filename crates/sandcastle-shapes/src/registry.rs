use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::ShapesConfig;
use super::types::{ShapeError, ShapeId, ShapeSpec};

/// Shape id -> spec, indexed directly by the id.
#[derive(Clone, Debug)]
pub struct ShapeRegistry {
    specs: [ShapeSpec; ShapeId::COUNT],
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ShapeRegistry {
    pub fn builtin() -> Self {
        Self {
            specs: ShapeId::ALL.map(ShapeSpec::builtin),
        }
    }

    #[inline]
    pub fn get(&self, id: ShapeId) -> &ShapeSpec {
        &self.specs[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeSpec> {
        self.specs.iter()
    }

    pub fn from_config(cfg: ShapesConfig) -> Result<Self, ShapeError> {
        let mut reg = Self::builtin();
        for def in cfg.shapes {
            let id: ShapeId = def.name.parse()?;
            let spec = &mut reg.specs[id.index()];
            if let Some(size) = def.size {
                if size.contains(&0) {
                    return Err(ShapeError::InvalidExtent { shape: id, size });
                }
                spec.size = size;
            }
            if let Some(fill) = def.fill {
                spec.fill = fill;
            }
            if let Some(category) = def.category {
                spec.category = category;
            }
        }
        Ok(reg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ShapesConfig = toml::from_str(s)?;
        Ok(Self::from_config(cfg)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

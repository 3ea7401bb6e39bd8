use serde::Deserialize;

use crate::types::{FootprintFill, ShapeCategory};

/// `shapes.toml`: a list of `[[shape]]` tables overriding the built-in entries.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct ShapesConfig {
    #[serde(rename = "shape", default)]
    pub shapes: Vec<ShapeDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeDef {
    pub name: String,
    pub size: Option<[u32; 3]>,
    pub fill: Option<FootprintFill>,
    pub category: Option<ShapeCategory>,
}

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Every shape the builder can place. Discriminants group shapes by base size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum ShapeId {
    // 1x1 base
    #[serde(rename = "cube_1x1")]
    Cube1x1 = 0,
    #[serde(rename = "sphere_1x1")]
    Sphere1x1 = 1,
    #[serde(rename = "blob_1x1")]
    Blob1x1 = 2,
    // 3x3 base
    #[serde(rename = "blob_3x1")]
    Blob3x1 = 100,
    #[serde(rename = "cube_3x1")]
    Cube3x1 = 101,
    #[serde(rename = "cylinder_3x1")]
    Cylinder3x1 = 102,
    #[serde(rename = "sphere_3x3")]
    Sphere3x3 = 103,
}

impl ShapeId {
    pub const ALL: [ShapeId; 7] = [
        ShapeId::Cube1x1,
        ShapeId::Sphere1x1,
        ShapeId::Blob1x1,
        ShapeId::Blob3x1,
        ShapeId::Cube3x1,
        ShapeId::Cylinder3x1,
        ShapeId::Sphere3x3,
    ];
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index into [`ShapeId::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ShapeId::Cube1x1 => 0,
            ShapeId::Sphere1x1 => 1,
            ShapeId::Blob1x1 => 2,
            ShapeId::Blob3x1 => 3,
            ShapeId::Cube3x1 => 4,
            ShapeId::Cylinder3x1 => 5,
            ShapeId::Sphere3x3 => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeId::Cube1x1 => "cube_1x1",
            ShapeId::Sphere1x1 => "sphere_1x1",
            ShapeId::Blob1x1 => "blob_1x1",
            ShapeId::Blob3x1 => "blob_3x1",
            ShapeId::Cube3x1 => "cube_3x1",
            ShapeId::Cylinder3x1 => "cylinder_3x1",
            ShapeId::Sphere3x3 => "sphere_3x3",
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeId {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| ShapeError::UnknownShape(s.to_string()))
    }
}

/// How the footprint box is filled: the whole square, or a plus-shaped ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintFill {
    Diagonal,
    Cross,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeCategory {
    Normal,
    /// Also stacks one extra voxel on the center cell, one level above the footprint.
    WideBase,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShapeSpec {
    pub id: ShapeId,
    /// Size in tiles (x, y, z).
    pub size: [u32; 3],
    pub fill: FootprintFill,
    pub category: ShapeCategory,
}

impl ShapeSpec {
    pub fn builtin(id: ShapeId) -> Self {
        let (size, fill, category) = match id {
            ShapeId::Cube1x1 | ShapeId::Sphere1x1 | ShapeId::Blob1x1 => {
                ([1, 1, 1], FootprintFill::Diagonal, ShapeCategory::Normal)
            }
            ShapeId::Blob3x1 | ShapeId::Cube3x1 => {
                ([3, 1, 3], FootprintFill::Diagonal, ShapeCategory::Normal)
            }
            ShapeId::Cylinder3x1 => ([3, 1, 3], FootprintFill::Cross, ShapeCategory::Normal),
            ShapeId::Sphere3x3 => ([3, 2, 3], FootprintFill::Diagonal, ShapeCategory::WideBase),
        };
        Self {
            id,
            size,
            fill,
            category,
        }
    }

    /// Footprint radii in tiles along x and z.
    #[inline]
    pub fn half_extents(&self) -> (i32, i32) {
        ((self.size[0] / 2) as i32, (self.size[2] / 2) as i32)
    }

    #[inline]
    pub fn is_cross_shaped(&self) -> bool {
        self.fill == FootprintFill::Cross
    }

    #[inline]
    pub fn is_wide_base(&self) -> bool {
        self.category == ShapeCategory::WideBase
    }

    /// The same shape turned by `quarter_turns` x 90 degrees about Y.
    pub fn rotated(&self, quarter_turns: u8) -> ShapeSpec {
        let mut out = *self;
        if quarter_turns % 2 == 1 {
            out.size.swap(0, 2);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    UnknownShape(String),
    InvalidExtent { shape: ShapeId, size: [u32; 3] },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::UnknownShape(name) => write!(f, "unknown shape '{}'", name),
            ShapeError::InvalidExtent { shape, size } => {
                write!(f, "shape {} has an empty size {:?}", shape, size)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

//! Minimal geometry types shared by the build crates (no engine dependency).
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// World placement handed to the rendering side: position, yaw around Y, and the up axis
/// (decorations lean onto the surface they were dropped on).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Transform {
    pub position: Vec3,
    pub yaw_deg: f32,
    pub up: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl Transform {
    #[inline]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw_deg: 0.0,
            up: Vec3::UP,
        }
    }

    /// Adds `deg` to the yaw, wrapped into `[0, 360)`.
    pub fn rotated(self, deg: f32) -> Self {
        Self {
            yaw_deg: (self.yaw_deg + deg).rem_euclid(360.0),
            ..self
        }
    }

    pub fn with_up(self, normal: Vec3) -> Self {
        let up = normal.normalized();
        Self {
            up: if up == Vec3::ZERO { Vec3::UP } else { up },
            ..self
        }
    }

    /// Yaw snapped to the nearest multiple of 90 degrees, as 0..4.
    #[inline]
    pub fn quarter_turns(&self) -> u8 {
        ((self.yaw_deg / 90.0).round() as i64).rem_euclid(4) as u8
    }
}

/// Maps world space onto the build grid. Tiles are `tile_size` wide and tall, the grid's
/// (0, 0, 0) slot starts at `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridFrame {
    pub origin: Vec3,
    pub tile_size: f32,
}

impl Default for GridFrame {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            tile_size: 1.0,
        }
    }
}

impl GridFrame {
    pub fn new(origin: Vec3, tile_size: f32) -> Self {
        Self { origin, tile_size }
    }

    /// (x, level, z) slot containing `p`. Floors, so points left of the origin land on
    /// negative indices instead of folding onto 0.
    #[inline]
    pub fn voxel_index(&self, p: Vec3) -> (i32, i32, i32) {
        let local = (p - self.origin) / self.tile_size;
        (
            local.x.floor() as i32,
            local.y.floor() as i32,
            local.z.floor() as i32,
        )
    }

    /// Center of the tile at (x, z), at the bottom of slot `level`.
    #[inline]
    pub fn cell_center(&self, x: i32, level: i32, z: i32) -> Vec3 {
        let t = self.tile_size;
        self.origin + Vec3::new((x as f32 + 0.5) * t, level as f32 * t, (z as f32 + 0.5) * t)
    }
}

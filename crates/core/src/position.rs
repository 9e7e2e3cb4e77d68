//! Positions used to place command sources in the world.

use std::fmt;

/// Integer anchor position of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a new block position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Centre point of the block (`+0.5` on every axis).
    pub fn center(self) -> Vec3 {
        Vec3::new(
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Continuous world-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Vec3 {
    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new position.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared euclidean distance to `other`.
    pub fn distance_squared(self, other: Vec3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Floor every axis to the containing block.
    pub fn block(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

/// Orientation as a pitch/yaw pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Pitch (x rotation).
    pub pitch: f32,
    /// Yaw (y rotation).
    pub yaw: f32,
}

impl Rotation {
    /// Facing straight ahead along the default axis.
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_center_is_offset_by_half() {
        let center = BlockPos::new(3, -2, 10).center();
        assert_eq!(center, Vec3::new(3.5, -1.5, 10.5));
    }

    #[test]
    fn vec3_floors_to_containing_block() {
        assert_eq!(Vec3::new(-0.25, 64.9, 7.0).block(), BlockPos::new(-1, 64, 7));
    }

    #[test]
    fn distance_squared_matches_axis_deltas() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(2.0, 3.0, 6.0);
        assert_eq!(a.distance_squared(b), 49.0);
    }
}

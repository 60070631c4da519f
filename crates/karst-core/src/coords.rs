//! Coordinate system for the voxel world.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World position in voxel coordinates.
///
/// Identifies one unit-cube cell. Chunk anchors use the same type, constrained
/// to multiples of the chunk edge length on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl WorldPos {
    /// Create a new world position
    #[inline]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Position offset by the given deltas
    #[inline]
    pub const fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Per-axis absolute distance to another position
    #[inline]
    pub const fn axis_distance(self, other: Self) -> [i64; 3] {
        [
            (self.x - other.x).abs(),
            (self.y - other.y).abs(),
            (self.z - other.z).abs(),
        ]
    }

    /// Convert to floating point Vec3
    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl From<Vec3> for WorldPos {
    fn from(v: Vec3) -> Self {
        Self::new(v.x.floor() as i64, v.y.floor() as i64, v.z.floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn offset_adds_componentwise() {
        let pos = WorldPos::new(10, -20, 30);
        assert_eq!(pos.offset(1, -2, 3), WorldPos::new(11, -22, 33));
    }

    #[test]
    fn axis_distance_is_absolute() {
        let a = WorldPos::new(-8, 0, 16);
        let b = WorldPos::new(8, 0, -16);
        assert_eq!(a.axis_distance(b), [16, 0, 32]);
        assert_eq!(b.axis_distance(a), [16, 0, 32]);
    }

    #[test]
    fn from_vec3_floors() {
        let pos = WorldPos::from(Vec3::new(1.9, -0.1, 0.0));
        assert_eq!(pos, WorldPos::new(1, -1, 0));
    }

    #[test]
    fn to_vec3_roundtrip() {
        let v = WorldPos::new(3, -5, 7).to_vec3();
        assert_relative_eq!(v.x, 3.0);
        assert_relative_eq!(v.y, -5.0);
        assert_relative_eq!(v.z, 7.0);
    }
}

//! Core voxel types.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Classification of a single voxel cell.
///
/// Block ID 0 is reserved for air (empty space). The representation stays 16
/// bits wide so chunk storage remains dense as more variants are added; the
/// mesher only ever asks whether a block is solid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Block(pub u16);

impl Block {
    /// Air block (empty space)
    pub const AIR: Self = Self(0);
    /// Stone block
    pub const STONE: Self = Self(1);

    /// Returns true if this block is air (empty)
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this block is solid (not air)
    #[inline]
    pub const fn is_solid(self) -> bool {
        self.0 != 0
    }
}

/// Vertex layout handed to the render sink.
///
/// Position and normal, three floats each, tightly packed for an interleaved
/// attribute buffer. Positions are chunk-local; the chunk anchor is supplied
/// to the sink as a translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Create a new vertex
    #[inline]
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_air() {
        assert!(Block::AIR.is_air());
        assert!(!Block::AIR.is_solid());
    }

    #[test]
    fn block_solid() {
        assert!(!Block::STONE.is_air());
        assert!(Block::STONE.is_solid());
    }

    #[test]
    fn block_default_is_air() {
        assert!(Block::default().is_air());
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 6 * 4);
    }
}

//! Chunk data structure for voxel world storage.

use karst_core::coords::WorldPos;
use karst_core::error::{Error, Result};
use karst_core::sink::MeshHandle;
use karst_core::types::Block;

use crate::field::TerrainField;
use crate::mesh::{self, MeshData};

/// Chunk dimensions in blocks per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkExtents {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl ChunkExtents {
    /// Equal extents on all axes.
    #[inline]
    pub const fn cubic(edge: u32) -> Self {
        Self {
            width: edge,
            height: edge,
            depth: edge,
        }
    }

    /// Total cell count.
    #[inline]
    pub const fn volume(self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Half extent per axis, used to center chunks on their anchor.
    #[inline]
    pub const fn half(self) -> [i64; 3] {
        [
            (self.width / 2) as i64,
            (self.height / 2) as i64,
            (self.depth / 2) as i64,
        ]
    }

    /// Reject zero-sized chunks.
    pub fn validate(self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(Error::InvalidConfig(format!(
                "chunk extents must be positive, got {}x{}x{}",
                self.width, self.height, self.depth
            )));
        }
        Ok(())
    }
}

/// One fixed-size region of the voxel world.
///
/// Owns its block array, the mesh derived from it, and (once uploaded) the
/// sink handle for the resident buffers. Blocks are filled once at creation;
/// the mesh is rebuilt from them into fresh buffers and swapped in whole, so
/// a half-built mesh is never observable. The handle is surrendered exactly
/// once, when the streamer unloads the chunk.
pub struct Chunk {
    anchor: WorldPos,
    extents: ChunkExtents,
    blocks: Vec<Block>,
    mesh: MeshData,
    gpu: Option<MeshHandle>,
}

impl Chunk {
    /// Generate a chunk at `anchor`, filling every cell from the field and
    /// building the initial mesh.
    pub fn generate(
        anchor: WorldPos,
        extents: ChunkExtents,
        field: &TerrainField,
    ) -> Result<Self> {
        extents.validate()?;

        let mut blocks = Vec::with_capacity(extents.volume());
        let half = extents.half();
        for z in 0..extents.depth {
            for y in 0..extents.height {
                for x in 0..extents.width {
                    let pos = anchor.offset(
                        x as i64 - half[0],
                        y as i64 - half[1],
                        z as i64 - half[2],
                    );
                    blocks.push(field.classify(pos));
                }
            }
        }

        let mut chunk = Self {
            anchor,
            extents,
            blocks,
            mesh: MeshData::default(),
            gpu: None,
        };
        chunk.rebuild_mesh(field);
        Ok(chunk)
    }

    /// Build a chunk from an existing block array.
    ///
    /// The array must be in index order, x varying fastest
    /// (`x + y*width + z*width*height`).
    pub fn from_blocks(
        anchor: WorldPos,
        extents: ChunkExtents,
        blocks: Vec<Block>,
        field: &TerrainField,
    ) -> Result<Self> {
        extents.validate()?;
        if blocks.len() != extents.volume() {
            return Err(Error::InvalidConfig(format!(
                "block array length {} does not match extents volume {}",
                blocks.len(),
                extents.volume()
            )));
        }

        let mut chunk = Self {
            anchor,
            extents,
            blocks,
            mesh: MeshData::default(),
            gpu: None,
        };
        chunk.rebuild_mesh(field);
        Ok(chunk)
    }

    /// Anchor world coordinate (the chunk's center).
    #[inline]
    pub const fn anchor(&self) -> WorldPos {
        self.anchor
    }

    /// Chunk dimensions in blocks.
    #[inline]
    pub const fn extents(&self) -> ChunkExtents {
        self.extents
    }

    #[inline]
    fn index(&self, x: u32, y: u32, z: u32) -> usize {
        debug_assert!(x < self.extents.width);
        debug_assert!(y < self.extents.height);
        debug_assert!(z < self.extents.depth);
        x as usize
            + y as usize * self.extents.width as usize
            + z as usize * self.extents.width as usize * self.extents.height as usize
    }

    /// Block at local cell (x, y, z).
    #[inline]
    pub fn block(&self, x: u32, y: u32, z: u32) -> Block {
        self.blocks[self.index(x, y, z)]
    }

    /// Absolute world position of the cell at local (x, y, z).
    ///
    /// Chunks are centered on their anchor: anchor + local - half extent.
    #[inline]
    pub fn block_world_pos(&self, x: u32, y: u32, z: u32) -> WorldPos {
        let half = self.extents.half();
        self.anchor.offset(
            x as i64 - half[0],
            y as i64 - half[1],
            z as i64 - half[2],
        )
    }

    /// Check if this chunk is empty (all air).
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    /// The current mesh buffers.
    #[inline]
    pub const fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Replace the mesh with one rebuilt from the current block array.
    pub fn rebuild_mesh(&mut self, field: &TerrainField) {
        let mesh = mesh::build(self, field);
        self.mesh = mesh;
    }

    /// Handle of the uploaded mesh buffers, if any.
    #[inline]
    pub const fn gpu(&self) -> Option<MeshHandle> {
        self.gpu
    }

    pub(crate) fn attach_gpu(&mut self, handle: MeshHandle) {
        debug_assert!(self.gpu.is_none(), "chunk already holds a mesh handle");
        self.gpu = Some(handle);
    }

    pub(crate) fn take_gpu(&mut self) -> Option<MeshHandle> {
        self.gpu.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_validation() {
        assert!(ChunkExtents::cubic(8).validate().is_ok());
        assert!(ChunkExtents::cubic(0).validate().is_err());
        assert!(ChunkExtents {
            width: 4,
            height: 0,
            depth: 4
        }
        .validate()
        .is_err());
    }

    #[test]
    fn generate_fills_volume() {
        let field = TerrainField::with_seed(42);
        let chunk =
            Chunk::generate(WorldPos::new(0, 0, 0), ChunkExtents::cubic(8), &field).unwrap();
        assert_eq!(chunk.extents().volume(), 512);
    }

    #[test]
    fn blocks_match_field() {
        let field = TerrainField::with_seed(42);
        let chunk =
            Chunk::generate(WorldPos::new(8, 0, -8), ChunkExtents::cubic(8), &field).unwrap();

        for z in 0..8 {
            for y in 0..8 {
                for x in 0..8 {
                    let pos = chunk.block_world_pos(x, y, z);
                    assert_eq!(
                        chunk.block(x, y, z),
                        field.classify(pos),
                        "mismatch at local ({x}, {y}, {z})"
                    );
                }
            }
        }
    }

    #[test]
    fn blocks_centered_on_anchor() {
        let field = TerrainField::with_seed(0);
        let chunk =
            Chunk::generate(WorldPos::new(0, 0, 0), ChunkExtents::cubic(8), &field).unwrap();

        assert_eq!(chunk.block_world_pos(0, 0, 0), WorldPos::new(-4, -4, -4));
        assert_eq!(chunk.block_world_pos(7, 7, 7), WorldPos::new(3, 3, 3));
        assert_eq!(chunk.block_world_pos(4, 4, 4), WorldPos::new(0, 0, 0));
    }

    #[test]
    fn from_blocks_rejects_wrong_length() {
        let field = TerrainField::with_seed(0);
        let result = Chunk::from_blocks(
            WorldPos::new(0, 0, 0),
            ChunkExtents::cubic(2),
            vec![Block::STONE; 7],
            &field,
        );
        assert!(result.is_err());
    }

    #[test]
    fn sky_chunk_is_empty_with_empty_mesh() {
        let field = TerrainField::with_seed(42);
        let chunk = Chunk::generate(WorldPos::new(0, 1000, 0), ChunkExtents::cubic(8), &field)
            .unwrap();

        assert!(chunk.is_empty());
        assert!(chunk.mesh().vertices.is_empty());
        assert!(chunk.mesh().indices.is_empty());
    }
}

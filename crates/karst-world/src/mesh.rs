//! Chunk mesh construction via per-face visibility culling.
//!
//! Every solid cell contributes one quad per face whose neighboring cell is
//! non-solid; faces between two solid cells are never emitted. Neighbors are
//! resolved from the cell's absolute world position: inside the chunk through
//! the block array, across the border through a fresh field query, so edge
//! faces cull correctly without access to the neighboring chunk. Adjacent
//! coplanar faces are not merged.

use karst_core::types::MeshVertex;

use crate::chunk::Chunk;
use crate::field::TerrainField;

/// CPU-side mesh buffers for one chunk.
///
/// Vertex positions are chunk-local; indices form a triangle list. Every
/// emitted face contributes exactly 4 vertices and 6 indices.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of quads in the mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Geometry for one of the six axis-aligned cube faces.
struct FaceSpec {
    /// Unit offset to the neighboring cell.
    neighbor: [i64; 3],
    /// Outward normal shared by all four vertices.
    normal: [f32; 3],
    /// Corner offsets from the cell center.
    corners: [[f32; 3]; 4],
    /// Triangle winding within the quad. Hand-picked per face: the +X/+Y/+Z
    /// faces wind one way and the -X/-Y/-Z faces the other, which keeps a
    /// single front-face culling convention valid for every face.
    winding: [u32; 6],
}

const FACES: [FaceSpec; 6] = [
    // +X
    FaceSpec {
        neighbor: [1, 0, 0],
        normal: [1.0, 0.0, 0.0],
        corners: [
            [0.5, -0.5, 0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
        ],
        winding: [0, 1, 2, 0, 2, 3],
    },
    // -X
    FaceSpec {
        neighbor: [-1, 0, 0],
        normal: [-1.0, 0.0, 0.0],
        corners: [
            [-0.5, -0.5, 0.5],
            [-0.5, -0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, 0.5, 0.5],
        ],
        winding: [0, 2, 1, 0, 3, 2],
    },
    // +Y
    FaceSpec {
        neighbor: [0, 1, 0],
        normal: [0.0, 1.0, 0.0],
        corners: [
            [-0.5, 0.5, 0.5],
            [0.5, 0.5, 0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
        ],
        winding: [0, 1, 2, 0, 2, 3],
    },
    // -Y
    FaceSpec {
        neighbor: [0, -1, 0],
        normal: [0.0, -1.0, 0.0],
        corners: [
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, -0.5, -0.5],
            [-0.5, -0.5, -0.5],
        ],
        winding: [0, 2, 1, 0, 3, 2],
    },
    // +Z
    FaceSpec {
        neighbor: [0, 0, 1],
        normal: [0.0, 0.0, 1.0],
        corners: [
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ],
        winding: [0, 1, 2, 0, 2, 3],
    },
    // -Z
    FaceSpec {
        neighbor: [0, 0, -1],
        normal: [0.0, 0.0, -1.0],
        corners: [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
        ],
        winding: [0, 2, 1, 0, 3, 2],
    },
];

/// Build the mesh for a chunk's current block array.
///
/// The result is complete before the caller swaps it in, so no partially
/// built mesh is ever observable through the chunk.
pub fn build(chunk: &Chunk, field: &TerrainField) -> MeshData {
    let extents = chunk.extents();
    let half = extents.half();
    let mut mesh = MeshData::default();

    for z in 0..extents.depth {
        for y in 0..extents.height {
            for x in 0..extents.width {
                if chunk.block(x, y, z).is_air() {
                    continue;
                }

                let world = chunk.block_world_pos(x, y, z);
                let center = [
                    (x as i64 - half[0]) as f32,
                    (y as i64 - half[1]) as f32,
                    (z as i64 - half[2]) as f32,
                ];

                for face in &FACES {
                    let nx = x as i64 + face.neighbor[0];
                    let ny = y as i64 + face.neighbor[1];
                    let nz = z as i64 + face.neighbor[2];

                    let neighbor_solid = if nx >= 0
                        && ny >= 0
                        && nz >= 0
                        && nx < extents.width as i64
                        && ny < extents.height as i64
                        && nz < extents.depth as i64
                    {
                        chunk.block(nx as u32, ny as u32, nz as u32).is_solid()
                    } else {
                        let neighbor_pos = world.offset(
                            face.neighbor[0],
                            face.neighbor[1],
                            face.neighbor[2],
                        );
                        field.classify(neighbor_pos).is_solid()
                    };

                    if neighbor_solid {
                        continue;
                    }

                    let base = mesh.vertices.len() as u32;
                    for corner in &face.corners {
                        mesh.vertices.push(MeshVertex::new(
                            [
                                center[0] + corner[0],
                                center[1] + corner[1],
                                center[2] + corner[2],
                            ],
                            face.normal,
                        ));
                    }
                    for &i in &face.winding {
                        mesh.indices.push(base + i);
                    }
                }
            }
        }
    }

    mesh
}

//! Terrain generation, meshing and chunk streaming for the Karst renderer.

pub mod chunk;
pub mod field;
pub mod mesh;
pub mod streaming;

pub use chunk::{Chunk, ChunkExtents};
pub use field::{FieldConfig, TerrainField};
pub use mesh::MeshData;
pub use streaming::{ChunkStreamer, StreamUpdate, StreamingConfig, ViewSnapshot};

/// World seed for procedural generation.
pub type WorldSeed = u64;

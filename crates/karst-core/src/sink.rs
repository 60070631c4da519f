//! Render sink boundary.
//!
//! The core hands finished vertex/index buffers to an external sink and stores
//! the returned handle with the owning chunk. A handle is released exactly
//! once, when the streamer unloads its chunk; the sink never reaches back into
//! the core.

use hashbrown::HashMap;

use crate::coords::WorldPos;
use crate::error::{Error, Result};
use crate::types::MeshVertex;

/// Opaque identifier for sink-resident mesh buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Destination for finished chunk meshes.
///
/// Implementations wrap a GPU API (buffer creation, attribute setup, draw
/// submission). Buffer acquisition may fail; the core propagates such failures
/// upward without retrying.
pub trait RenderSink {
    /// Upload one chunk's mesh and return a handle to the resident buffers.
    ///
    /// `anchor` is the translation applied at draw time; vertex positions are
    /// chunk-local. Indices form a triangle list into `vertices`.
    fn upload(
        &mut self,
        anchor: WorldPos,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Result<MeshHandle>;

    /// Release buffers previously returned by [`RenderSink::upload`].
    fn release(&mut self, handle: MeshHandle);
}

/// Buffer sizes tracked for one live upload.
#[derive(Clone, Copy, Debug)]
struct BufferStats {
    vertices: usize,
    indices: usize,
}

/// Sink that validates and tracks uploads without touching a GPU.
///
/// Used by the walkthrough app and by tests. `upload` enforces the mesh
/// contract (index bounds, quad-multiple buffer lengths) the way a strict
/// driver would, and the release counters let tests assert that every handle
/// is released exactly once.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    next_handle: u64,
    live: HashMap<u64, BufferStats>,
    uploads: usize,
    releases: usize,
    stray_releases: usize,
}

impl HeadlessSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently live buffer pairs.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total vertices across live buffers.
    pub fn live_vertices(&self) -> usize {
        self.live.values().map(|s| s.vertices).sum()
    }

    /// Total indices across live buffers.
    pub fn live_indices(&self) -> usize {
        self.live.values().map(|s| s.indices).sum()
    }

    /// Total successful uploads over the sink's lifetime.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Total releases of live handles.
    pub fn releases(&self) -> usize {
        self.releases
    }

    /// Releases of unknown or already-released handles. Always zero when the
    /// ownership discipline holds.
    pub fn stray_releases(&self) -> usize {
        self.stray_releases
    }
}

impl RenderSink for HeadlessSink {
    fn upload(
        &mut self,
        _anchor: WorldPos,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Result<MeshHandle> {
        if vertices.len() % 4 != 0 {
            return Err(Error::Sink(format!(
                "vertex count {} is not a multiple of 4",
                vertices.len()
            )));
        }
        if indices.len() % 6 != 0 {
            return Err(Error::Sink(format!(
                "index count {} is not a multiple of 6",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(Error::Sink(format!(
                "index {bad} out of bounds for {} vertices",
                vertices.len()
            )));
        }

        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(
            handle.0,
            BufferStats {
                vertices: vertices.len(),
                indices: indices.len(),
            },
        );
        self.uploads += 1;
        Ok(handle)
    }

    fn release(&mut self, handle: MeshHandle) {
        if self.live.remove(&handle.0).is_some() {
            self.releases += 1;
        } else {
            self.stray_releases += 1;
        }
    }
}
